use std::sync::Arc;

use shared::domain::{Hero, HeroId};

use crate::{
    router::{Location, RouteParams},
    service::HeroApi,
};

pub struct HeroDetailController {
    api: Arc<dyn HeroApi>,
    location: Location,
    hero_id: HeroId,
    hero: Option<Hero>,
}

impl HeroDetailController {
    /// A missing or non-numeric `id` parameter resolves to [`HeroId::UNASSIGNED`].
    pub fn new(api: Arc<dyn HeroApi>, location: Location, params: &RouteParams) -> Self {
        Self {
            api,
            location,
            hero_id: parse_hero_id(params.get("id")),
            hero: None,
        }
    }

    pub fn hero_id(&self) -> HeroId {
        self.hero_id
    }

    pub fn hero(&self) -> Option<&Hero> {
        self.hero.as_ref()
    }

    pub async fn load(&mut self) {
        if !self.hero_id.is_assigned() {
            return;
        }
        self.hero = self.api.get_by_id(self.hero_id).await;
    }

    /// Edits the loaded hero's name locally; nothing is sent until [`save`](Self::save).
    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        match self.hero.as_mut() {
            Some(hero) => {
                hero.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Sends the loaded hero to the backend and steps back, whatever the
    /// outcome. `None` when no hero is loaded, otherwise the update result.
    pub async fn save(&mut self) -> Option<bool> {
        let hero = self.hero.as_ref()?;
        let updated = self.api.update(hero).await;
        self.go_back();
        Some(updated)
    }

    pub fn go_back(&self) -> Option<String> {
        self.location.back()
    }
}

fn parse_hero_id(raw: Option<&str>) -> HeroId {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .map_or(HeroId::UNASSIGNED, HeroId)
}
