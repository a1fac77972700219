use std::sync::Arc;

use shared::domain::{Hero, NewHero};
use tokio::task::JoinHandle;

use crate::{
    messages::MessageLog,
    service::{HeroApi, HeroRef},
};

/// The full, editable hero list.
pub struct HeroesController {
    api: Arc<dyn HeroApi>,
    messages: MessageLog,
    heroes: Vec<Hero>,
    selected: Option<Hero>,
}

impl HeroesController {
    pub fn new(api: Arc<dyn HeroApi>, messages: MessageLog) -> Self {
        Self {
            api,
            messages,
            heroes: Vec::new(),
            selected: None,
        }
    }

    pub async fn activate(&mut self) {
        self.heroes = self.api.list_all().await;
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    pub fn selected(&self) -> Option<&Hero> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, hero: &Hero) {
        self.messages
            .add(format!("HeroesComponent: Selected hero id={}", hero.id));
        self.selected = Some(hero.clone());
    }

    /// Creates a hero from `name` and appends it once the backend returns it.
    /// Blank names are ignored.
    pub async fn add(&mut self, name: &str) -> Option<&Hero> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let hero = self.api.create(NewHero::new(name)).await?;
        self.heroes.push(hero);
        self.heroes.last()
    }

    /// Drops `hero` from the local list right away, then deletes it on the
    /// backend in the background. A failed delete is not rolled back.
    pub fn delete(&mut self, hero: &Hero) -> JoinHandle<bool> {
        self.heroes.retain(|h| h.id != hero.id);
        if self.selected.as_ref().is_some_and(|s| s.id == hero.id) {
            self.selected = None;
        }
        let api = Arc::clone(&self.api);
        let target = HeroRef::from(hero);
        tokio::spawn(async move { api.delete(target).await })
    }
}
