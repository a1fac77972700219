//! Client side of the hero registry: the access service, the search stream,
//! the view controllers and the route table that ties them together.

use std::time::Duration;

pub mod app;
pub mod controllers;
pub mod error;
pub mod messages;
pub mod router;
pub mod search;
pub mod service;

pub use app::{App, Screen};
pub use controllers::{DashboardController, HeroDetailController, HeroesController};
pub use error::ClientError;
pub use messages::MessageLog;
pub use router::{Location, RouteError, RouteParams, RouteTable, View};
pub use search::{HeroSearch, SearchState};
pub use service::{HeroApi, HeroRef, HeroService};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    /// Quiet period the search stream waits for before issuing a query.
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
