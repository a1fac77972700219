use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Hero, HeroId, NewHero},
    error::ApiError,
    protocol::HEROES_ROUTE,
};
use tracing::{debug, error};
use url::Url;

use crate::{error::ClientError, messages::MessageLog};

/// Hero access operations used by the controllers.
///
/// Implementations never fail towards the caller: a failed read yields an
/// empty collection or `None`, a failed write yields `false` or `None`.
#[async_trait]
pub trait HeroApi: Send + Sync {
    async fn list_all(&self) -> Vec<Hero>;
    async fn get_by_id(&self, id: HeroId) -> Option<Hero>;
    /// Blank terms resolve to an empty collection without contacting the backend.
    async fn search(&self, term: &str) -> Vec<Hero>;
    async fn create(&self, hero: NewHero) -> Option<Hero>;
    async fn update(&self, hero: &Hero) -> bool;
    async fn delete(&self, target: HeroRef) -> bool;
}

/// Delete target: a bare id or a hero value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroRef {
    Id(HeroId),
    Hero(Hero),
}

impl HeroRef {
    pub fn id(&self) -> HeroId {
        match self {
            Self::Id(id) => *id,
            Self::Hero(hero) => hero.id,
        }
    }
}

impl From<HeroId> for HeroRef {
    fn from(value: HeroId) -> Self {
        Self::Id(value)
    }
}

impl From<Hero> for HeroRef {
    fn from(value: Hero) -> Self {
        Self::Hero(value)
    }
}

impl From<&Hero> for HeroRef {
    fn from(value: &Hero) -> Self {
        Self::Hero(value.clone())
    }
}

/// [`HeroApi`] over the backend's REST surface.
pub struct HeroService {
    http: Client,
    heroes_url: Url,
    messages: MessageLog,
}

impl HeroService {
    pub fn new(server_url: &str, messages: MessageLog) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url, messages)
    }

    pub fn with_client(
        http: Client,
        server_url: &str,
        messages: MessageLog,
    ) -> Result<Self, ClientError> {
        let invalid = |source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        };
        let mut base = Url::parse(server_url).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let heroes_url = base
            .join(HEROES_ROUTE.trim_start_matches('/'))
            .map_err(invalid)?;
        Ok(Self {
            http,
            heroes_url,
            messages,
        })
    }

    pub fn heroes_url(&self) -> &Url {
        &self.heroes_url
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    fn hero_url(&self, id: HeroId) -> Url {
        let mut url = self.heroes_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    fn log(&self, message: &str) {
        self.messages.add(format!("HeroService: {message}"));
    }

    /// The one failure path: log the operation and hand back `fallback`.
    fn handle_error<T>(&self, operation: &str, err: ClientError, fallback: T) -> T {
        error!(operation, status = ?err.status(), error = %err, "hero request failed");
        self.log(&format!("{operation} failed: {err}"));
        fallback
    }

    async fn fetch_heroes(&self, term: Option<&str>) -> Result<Vec<Hero>, ClientError> {
        let mut request = self.http.get(self.heroes_url.clone());
        if let Some(term) = term {
            request = request.query(&[("name", term)]);
        }
        let response = ensure_success(request.send().await?).await?;
        Ok(response.json::<Vec<Hero>>().await?)
    }

    async fn fetch_hero(&self, id: HeroId) -> Result<Hero, ClientError> {
        let response = ensure_success(self.http.get(self.hero_url(id)).send().await?).await?;
        Ok(response.json::<Hero>().await?)
    }

    async fn post_hero(&self, hero: &NewHero) -> Result<Hero, ClientError> {
        let response = ensure_success(
            self.http
                .post(self.heroes_url.clone())
                .json(hero)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json::<Hero>().await?)
    }

    async fn put_hero(&self, hero: &Hero) -> Result<(), ClientError> {
        ensure_success(
            self.http
                .put(self.heroes_url.clone())
                .json(hero)
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn delete_hero(&self, id: HeroId) -> Result<(), ClientError> {
        ensure_success(self.http.delete(self.hero_url(id)).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl HeroApi for HeroService {
    async fn list_all(&self) -> Vec<Hero> {
        match self.fetch_heroes(None).await {
            Ok(heroes) => {
                self.log("fetched heroes");
                heroes
            }
            Err(err) => self.handle_error("getHeroes", err, Vec::new()),
        }
    }

    async fn get_by_id(&self, id: HeroId) -> Option<Hero> {
        match self.fetch_hero(id).await {
            Ok(hero) => {
                self.log(&format!("fetched hero id={id}"));
                Some(hero)
            }
            Err(err) => self.handle_error(&format!("getHero id={id}"), err, None),
        }
    }

    async fn search(&self, term: &str) -> Vec<Hero> {
        if term.trim().is_empty() {
            debug!("blank search term; skipping request");
            return Vec::new();
        }
        match self.fetch_heroes(Some(term)).await {
            Ok(heroes) => {
                if heroes.is_empty() {
                    self.log(&format!("no heroes matching \"{term}\""));
                } else {
                    self.log(&format!("found heroes matching \"{term}\""));
                }
                heroes
            }
            Err(err) => self.handle_error("searchHeroes", err, Vec::new()),
        }
    }

    async fn create(&self, hero: NewHero) -> Option<Hero> {
        match self.post_hero(&hero).await {
            Ok(created) => {
                self.log(&format!("added hero w/ id={}", created.id));
                Some(created)
            }
            Err(err) => self.handle_error("addHero", err, None),
        }
    }

    async fn update(&self, hero: &Hero) -> bool {
        match self.put_hero(hero).await {
            Ok(()) => {
                self.log(&format!("updated hero id={}", hero.id));
                true
            }
            Err(err) => self.handle_error("updateHero", err, false),
        }
    }

    async fn delete(&self, target: HeroRef) -> bool {
        let id = target.id();
        match self.delete_hero(id).await {
            Ok(()) => {
                self.log(&format!("deleted hero id={id}"));
                true
            }
            Err(err) => self.handle_error("deleteHero", err, false),
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiError>(&body)
        .map(|api_error| format!(" ({})", api_error.message))
        .unwrap_or_default();
    Err(ClientError::Status {
        url,
        status,
        detail,
    })
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
