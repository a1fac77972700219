use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::domain::{Hero, HeroId, NewHero};
use tokio::sync::{Mutex, Notify};

use crate::service::{HeroApi, HeroRef};

/// In-process [`HeroApi`] that records every call and can be slowed down or
/// held at a gate.
pub(crate) struct FakeHeroApi {
    heroes: Mutex<Vec<Hero>>,
    calls: Mutex<Vec<String>>,
    search_delays: HashMap<String, Duration>,
    delete_gate: Option<Arc<Notify>>,
    fail_writes: bool,
}

impl FakeHeroApi {
    pub(crate) fn new(heroes: Vec<Hero>) -> Self {
        Self {
            heroes: Mutex::new(heroes),
            calls: Mutex::new(Vec::new()),
            search_delays: HashMap::new(),
            delete_gate: None,
            fail_writes: false,
        }
    }

    pub(crate) fn seeded() -> Self {
        Self::new(storage::default_heroes())
    }

    pub(crate) fn with_search_delay(mut self, term: &str, delay: Duration) -> Self {
        self.search_delays.insert(term.to_string(), delay);
        self
    }

    pub(crate) fn with_delete_gate(mut self, gate: Arc<Notify>) -> Self {
        self.delete_gate = Some(gate);
        self
    }

    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn stored(&self) -> Vec<Hero> {
        self.heroes.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl HeroApi for FakeHeroApi {
    async fn list_all(&self) -> Vec<Hero> {
        self.record("list".to_string()).await;
        self.heroes.lock().await.clone()
    }

    async fn get_by_id(&self, id: HeroId) -> Option<Hero> {
        self.record(format!("get:{id}")).await;
        self.heroes
            .lock()
            .await
            .iter()
            .find(|hero| hero.id == id)
            .cloned()
    }

    async fn search(&self, term: &str) -> Vec<Hero> {
        if term.trim().is_empty() {
            return Vec::new();
        }
        self.record(format!("search:{term}")).await;
        if let Some(delay) = self.search_delays.get(term) {
            tokio::time::sleep(*delay).await;
        }
        let needle = term.to_lowercase();
        self.heroes
            .lock()
            .await
            .iter()
            .filter(|hero| hero.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    async fn create(&self, hero: NewHero) -> Option<Hero> {
        self.record(format!("create:{}", hero.name)).await;
        if self.fail_writes {
            return None;
        }
        let mut heroes = self.heroes.lock().await;
        let created = Hero::new(storage::gen_id(&heroes), hero.name);
        heroes.push(created.clone());
        Some(created)
    }

    async fn update(&self, hero: &Hero) -> bool {
        self.record(format!("update:{}", hero.id)).await;
        if self.fail_writes {
            return false;
        }
        let mut heroes = self.heroes.lock().await;
        match heroes.iter_mut().find(|h| h.id == hero.id) {
            Some(stored) => {
                stored.name = hero.name.clone();
                true
            }
            None => false,
        }
    }

    async fn delete(&self, target: HeroRef) -> bool {
        let id = target.id();
        self.record(format!("delete:{id}")).await;
        if let Some(gate) = &self.delete_gate {
            gate.notified().await;
        }
        if self.fail_writes {
            return false;
        }
        let mut heroes = self.heroes.lock().await;
        let before = heroes.len();
        heroes.retain(|hero| hero.id != id);
        heroes.len() != before
    }
}
