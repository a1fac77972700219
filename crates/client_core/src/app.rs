use std::sync::Arc;

use tracing::info;

use crate::{
    controllers::{DashboardController, HeroDetailController, HeroesController},
    error::ClientError,
    messages::MessageLog,
    router::{Location, RouteError, RouteTable, View},
    search::HeroSearch,
    service::{HeroApi, HeroService},
    ClientConfig,
};

/// An activated view, ready to be shown.
pub enum Screen {
    Summary(DashboardController),
    List(HeroesController),
    Detail(HeroDetailController),
}

impl Screen {
    pub fn view(&self) -> View {
        match self {
            Self::Summary(_) => View::Summary,
            Self::List(_) => View::List,
            Self::Detail(_) => View::Detail,
        }
    }
}

/// Composition root: owns the route table and the collaborators every
/// controller receives explicitly.
pub struct App {
    api: Arc<dyn HeroApi>,
    routes: RouteTable,
    location: Location,
    messages: MessageLog,
    config: ClientConfig,
}

impl App {
    pub fn new(api: Arc<dyn HeroApi>, messages: MessageLog, config: ClientConfig) -> Self {
        Self {
            api,
            routes: RouteTable::standard(),
            location: Location::new(),
            messages,
            config,
        }
    }

    /// Wires a [`HeroService`] pointed at `config.server_url`.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let messages = MessageLog::new();
        let service = HeroService::new(&config.server_url, messages.clone())?;
        Ok(Self::new(Arc::new(service), messages, config))
    }

    pub fn api(&self) -> Arc<dyn HeroApi> {
        Arc::clone(&self.api)
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Resolves `path`, records it in the history and activates its controller.
    pub async fn navigate(&self, path: &str) -> Result<Screen, RouteError> {
        let resolved = self.routes.resolve(path)?;
        info!(path = %resolved.path, view = ?resolved.view, "navigating");
        self.location.navigate(resolved.path.clone());

        let screen = match resolved.view {
            View::Summary => {
                let mut controller = DashboardController::new(self.api());
                controller.activate().await;
                Screen::Summary(controller)
            }
            View::List => {
                let mut controller = HeroesController::new(self.api(), self.messages.clone());
                controller.activate().await;
                Screen::List(controller)
            }
            View::Detail => {
                let mut controller =
                    HeroDetailController::new(self.api(), self.location.clone(), &resolved.params);
                controller.load().await;
                Screen::Detail(controller)
            }
        };
        Ok(screen)
    }

    /// Starts a search stream using the configured debounce window.
    pub fn search(&self) -> HeroSearch {
        HeroSearch::spawn(self.api(), self.config.search_debounce)
    }
}
