use std::{ops::Range, sync::Arc};

use shared::domain::Hero;

use crate::service::HeroApi;

/// Zero-based slice of the full list shown on the summary view.
pub const SUMMARY_RANGE: Range<usize> = 1..5;

pub struct DashboardController {
    api: Arc<dyn HeroApi>,
    heroes: Vec<Hero>,
}

impl DashboardController {
    pub fn new(api: Arc<dyn HeroApi>) -> Self {
        Self {
            api,
            heroes: Vec::new(),
        }
    }

    pub async fn activate(&mut self) {
        self.heroes = summary_slice(self.api.list_all().await);
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }
}

fn summary_slice(heroes: Vec<Hero>) -> Vec<Hero> {
    heroes
        .into_iter()
        .skip(SUMMARY_RANGE.start)
        .take(SUMMARY_RANGE.len())
        .collect()
}
