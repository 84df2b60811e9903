//! Ambient request context and the collaborator seams rendering depends on.
//!
//! Nothing here is read from global state: the current route, its parameters
//! and the authenticated subject travel in a [`RequestContext`] that callers
//! hand to every render.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::RouteError;
use crate::parser::{Ability, NavigationItem};

/// Route parameters keyed by placeholder name
pub type RouteParams = Map<String, Value>;

/// Authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            abilities: Vec::new(),
        }
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.extend(abilities.into_iter().map(Into::into));
        self
    }
}

/// The current request as seen by a render call
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub current_route: Option<String>,
    pub current_route_params: RouteParams,
    pub subject: Option<Subject>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_route(mut self, route: impl Into<String>) -> Self {
        self.current_route = Some(route.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.current_route_params.insert(name.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.current_route_params = params;
        self
    }

    pub fn acting_as(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }
}

/// Turns route names into URLs
pub trait RouteResolver: Send + Sync {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError>;

    fn exists(&self, route: &str) -> bool;
}

/// Decides whether a subject holds an ability
pub trait PermissionChecker: Send + Sync {
    fn check(&self, subject: &Subject, ability: &str, argument: Option<&Value>) -> bool;
}

/// Maps symbolic icon names to their rendered form
pub trait IconResolver: Send + Sync {
    /// Falls back to the name itself when nothing is known about the icon
    fn resolve(&self, name: &str) -> String;
}

/// Icon resolver that always returns the name
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainIcons;

impl IconResolver for PlainIcons {
    fn resolve(&self, name: &str) -> String {
        name.to_string()
    }
}

/// The three injected services a render needs
#[derive(Clone)]
pub struct Collaborators {
    pub routes: Arc<dyn RouteResolver>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub icons: Arc<dyn IconResolver>,
}

impl Collaborators {
    pub fn new(
        routes: Arc<dyn RouteResolver>,
        permissions: Arc<dyn PermissionChecker>,
        icons: Arc<dyn IconResolver>,
    ) -> Self {
        Self {
            routes,
            permissions,
            icons,
        }
    }

    /// Resolves a route, degrading to `#` so a broken link never breaks a page
    pub fn url_for(&self, route: &str, params: &RouteParams) -> String {
        match self.routes.resolve(route, params) {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!(route, error = %err, "route resolution failed, using placeholder");
                "#".to_string()
            }
        }
    }

    /// Evaluates a `can` requirement; no subject means no access
    pub fn allows(&self, ability: &Ability, context: &RequestContext) -> bool {
        let Some(subject) = &context.subject else {
            return false;
        };
        self.permissions
            .check(subject, &ability.name, ability.argument.as_ref())
    }

    /// An item without a `can` requirement is always permitted
    pub fn permits(&self, item: &NavigationItem, context: &RequestContext) -> bool {
        item.can
            .as_ref()
            .map_or(true, |ability| self.allows(ability, context))
    }
}
