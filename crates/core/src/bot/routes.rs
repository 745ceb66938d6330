use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::ChatEvent;

static DOWNLOAD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/download_|http)").expect("download pattern is valid"));

type Predicate = Box<dyn Fn(&ChatEvent) -> bool + Send + Sync>;

/// What to do with an event once a route matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Reply with the welcome text.
    Start,
    /// Search and answer the inline query.
    InlineSearch,
    /// Single or bulk download.
    Download,
    /// Search and reply with a text block.
    TextSearch,
}

/// A named `(predicate, action)` pair.
pub struct Route {
    pub name: &'static str,
    pub action: RouteAction,
    predicate: Predicate,
}

impl Route {
    pub fn matches(&self, event: &ChatEvent) -> bool {
        (self.predicate)(event)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish()
    }
}

/// Ordered routes; the first matching route wins.
#[derive(Debug, Default)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route.
    pub fn route(
        mut self,
        name: &'static str,
        predicate: impl Fn(&ChatEvent) -> bool + Send + Sync + 'static,
        action: RouteAction,
    ) -> Self {
        self.routes.push(Route {
            name,
            action,
            predicate: Box::new(predicate),
        });
        self
    }

    /// The bot's routes: `/start`, inline queries, download commands and
    /// links, then plain-text search. Downloads come before search so a
    /// pasted link is not searched for.
    pub fn standard() -> Self {
        Self::new()
            .route(
                "start",
                |event| matches!(event, ChatEvent::Command { name, .. } if name == "start"),
                RouteAction::Start,
            )
            .route(
                "inline",
                |event| matches!(event, ChatEvent::InlineQuery { .. }),
                RouteAction::InlineSearch,
            )
            .route(
                "download",
                |event| event.text().is_some_and(|t| DOWNLOAD_PATTERN.is_match(t)),
                RouteAction::Download,
            )
            .route(
                "search",
                |event| matches!(event, ChatEvent::Text { .. }),
                RouteAction::TextSearch,
            )
    }

    pub fn resolve(&self, event: &ChatEvent) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(event))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
