//! Path-to-view table and the navigation history behind "go back".

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;
use tracing::debug;

const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Summary,
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    View(View),
    Redirect(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NotFound(String),
    #[error("too many redirects resolving '{0}'")]
    RedirectLoop(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route {
    segments: Vec<Segment>,
    target: RouteTarget,
}

impl Route {
    fn parse(pattern: &str, target: RouteTarget) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { segments, target }
    }

    fn matches(&self, parts: &[&str]) -> Option<RouteParams> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = RouteParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.0.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

/// Named values captured from `:param` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub view: View,
    /// Path after redirects, without leading or trailing slashes.
    pub path: String,
    pub params: RouteParams,
}

/// Ordered pattern table; the first matching route wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `""` redirects to `summary`; `list` and `detail/:id` complete the table.
    pub fn standard() -> Self {
        Self::new()
            .with_redirect("", "summary")
            .with_route("summary", View::Summary)
            .with_route("list", View::List)
            .with_route("detail/:id", View::Detail)
    }

    pub fn with_route(mut self, pattern: &str, view: View) -> Self {
        self.routes
            .push(Route::parse(pattern, RouteTarget::View(view)));
        self
    }

    pub fn with_redirect(mut self, pattern: &str, to: impl Into<String>) -> Self {
        self.routes
            .push(Route::parse(pattern, RouteTarget::Redirect(to.into())));
        self
    }

    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute, RouteError> {
        let mut current = normalize(path);
        for _ in 0..=MAX_REDIRECTS {
            let parts: Vec<&str> = split_path(&current).collect();
            let (route, params) = self
                .routes
                .iter()
                .find_map(|route| route.matches(&parts).map(|params| (route, params)))
                .ok_or_else(|| RouteError::NotFound(current.clone()))?;
            match &route.target {
                RouteTarget::View(view) => {
                    return Ok(ResolvedRoute {
                        view: *view,
                        path: current,
                        params,
                    })
                }
                RouteTarget::Redirect(to) => {
                    debug!(from = %current, to = %to, "following redirect");
                    current = normalize(to);
                }
            }
        }
        Err(RouteError::RedirectLoop(normalize(path)))
    }
}

fn normalize(path: &str) -> String {
    split_path(path).collect::<Vec<_>>().join("/")
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
}

/// Navigation history shared between the composition root and the controllers
/// that need to step back.
#[derive(Debug, Clone, Default)]
pub struct Location {
    history: Arc<Mutex<Vec<String>>>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `path` unless it is already the current entry.
    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.last() != Some(&path) {
            history.push(path);
        }
    }

    /// Steps back one entry and returns the new current path. The first entry
    /// is never popped.
    pub fn back(&self) -> Option<String> {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() > 1 {
            history.pop();
        }
        history.last().cloned()
    }

    pub fn path(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn depth(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
