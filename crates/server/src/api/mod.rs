//! Hero operations behind the HTTP routes, independent of axum.

use std::time::Duration;

use shared::{
    domain::{Hero, HeroId, NewHero},
    error::ApiError,
};
use storage::{default_heroes, HeroStore};
use tracing::{debug, info};

#[derive(Clone)]
pub struct ApiContext {
    pub store: HeroStore,
    /// Artificial latency applied before every hero operation.
    pub response_delay: Duration,
}

impl ApiContext {
    pub fn new(store: HeroStore) -> Self {
        Self {
            store,
            response_delay: Duration::ZERO,
        }
    }

    pub fn with_response_delay(mut self, response_delay: Duration) -> Self {
        self.response_delay = response_delay;
        self
    }

    async fn simulate_latency(&self) {
        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }
    }
}

/// Lists every hero, or only those whose name contains `name` when it is given.
pub async fn list_heroes(ctx: &ApiContext, name: Option<&str>) -> Result<Vec<Hero>, ApiError> {
    ctx.simulate_latency().await;
    let heroes = match name {
        Some(term) => ctx.store.search(term).await.map_err(internal)?,
        None => ctx.store.list().await.map_err(internal)?,
    };
    debug!(count = heroes.len(), term = ?name, "listed heroes");
    Ok(heroes)
}

pub async fn get_hero(ctx: &ApiContext, id: HeroId) -> Result<Hero, ApiError> {
    ctx.simulate_latency().await;
    ctx.store
        .get(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| hero_not_found(id))
}

pub async fn create_hero(ctx: &ApiContext, new_hero: NewHero) -> Result<Hero, ApiError> {
    ctx.simulate_latency().await;
    ensure_name(&new_hero.name)?;
    let hero = ctx.store.insert(&new_hero).await.map_err(internal)?;
    info!(hero_id = hero.id.0, name = %hero.name, "created hero");
    Ok(hero)
}

pub async fn update_hero(ctx: &ApiContext, hero: Hero) -> Result<(), ApiError> {
    ctx.simulate_latency().await;
    if !hero.id.is_assigned() {
        return Err(ApiError::validation("hero id must be assigned"));
    }
    ensure_name(&hero.name)?;
    if !ctx.store.update(&hero).await.map_err(internal)? {
        return Err(hero_not_found(hero.id));
    }
    info!(hero_id = hero.id.0, name = %hero.name, "updated hero");
    Ok(())
}

pub async fn delete_hero(ctx: &ApiContext, id: HeroId) -> Result<(), ApiError> {
    ctx.simulate_latency().await;
    if !ctx.store.delete(id).await.map_err(internal)? {
        return Err(hero_not_found(id));
    }
    info!(hero_id = id.0, "deleted hero");
    Ok(())
}

/// Restores the default collection, dropping every change made so far.
pub async fn reset_heroes(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store
        .reset(&default_heroes())
        .await
        .map_err(internal)?;
    info!("reset hero collection to defaults");
    Ok(())
}

fn ensure_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("hero name cannot be blank"));
    }
    Ok(())
}

fn hero_not_found(id: HeroId) -> ApiError {
    ApiError::not_found(format!("hero id={id} not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
