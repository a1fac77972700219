use serde::{Deserialize, Serialize};

use crate::domain::HeroId;

pub const HEROES_ROUTE: &str = "/api/heroes";
pub const HERO_BY_ID_ROUTE: &str = "/api/heroes/:id";
pub const RESET_ROUTE: &str = "/commands/resetDb";
pub const HEALTH_ROUTE: &str = "/healthz";

pub fn hero_route(id: HeroId) -> String {
    format!("{HEROES_ROUTE}/{}", id.0)
}

/// Query string of `GET /api/heroes`; a present `name` turns the listing into a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroQuery {
    #[serde(default)]
    pub name: Option<String>,
}
