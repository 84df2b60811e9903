use std::sync::Arc;

use crate::breadcrumbs::BreadcrumbResolver;
use crate::context::{Collaborators, RequestContext, RouteParams};
use crate::error::{NavigationError, Result};
use crate::icons::IconCache;
use crate::parser::{BreadcrumbNode, DisplayNode, NavigationConfig, NavigationItem};
use crate::permissions::AbilityGate;
use crate::tree::TreeBuilder;

/// One named navigation tree bound to its services
pub struct Navigation<'r> {
    name: &'r str,
    items: &'r [NavigationItem],
    services: &'r Collaborators,
}

impl<'r> Navigation<'r> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn items(&self) -> &[NavigationItem] {
        self.items
    }

    /// Display tree; `route_params` fill URL placeholders
    pub fn to_tree(&self, route_params: &RouteParams, context: &RequestContext) -> Vec<DisplayNode> {
        TreeBuilder::new(self.name, self.services, context).build(self.items, route_params, None)
    }

    /// Trail to `route`, empty when the route is not in this tree
    pub fn breadcrumbs(
        &self,
        route: &str,
        route_params: &RouteParams,
        context: &RequestContext,
    ) -> Vec<BreadcrumbNode> {
        BreadcrumbResolver::new(self.name, self.services, context)
            .find_path(self.items, route, route_params)
            .unwrap_or_default()
    }
}

/// Named navigation trees in configuration order
pub struct NavigationRegistry {
    navigations: Vec<(String, Vec<NavigationItem>)>,
    services: Collaborators,
}

impl NavigationRegistry {
    pub fn new(navigations: Vec<(String, Vec<NavigationItem>)>, services: Collaborators) -> Self {
        Self {
            navigations,
            services,
        }
    }

    /// Registry over a loaded configuration, its route table and an icon cache
    pub fn from_config(config: NavigationConfig, icons: IconCache) -> Self {
        let services = Collaborators::new(
            Arc::new(config.routes),
            Arc::new(AbilityGate),
            Arc::new(icons),
        );
        Self::new(config.navigations, services)
    }

    /// Replaces a same-named tree or appends a new one
    pub fn with_navigation(mut self, name: impl Into<String>, items: Vec<NavigationItem>) -> Self {
        let name = name.into();
        match self.navigations.iter_mut().find(|(candidate, _)| *candidate == name) {
            Some((_, existing)) => *existing = items,
            None => self.navigations.push((name, items)),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.navigations.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|candidate| candidate == name)
    }

    /// Unknown names give an empty navigation
    pub fn get<'r>(&'r self, name: &'r str) -> Navigation<'r> {
        let items = self
            .navigations
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default();
        Navigation {
            name,
            items,
            services: &self.services,
        }
    }

    pub fn try_get<'r>(&'r self, name: &'r str) -> Result<Navigation<'r>> {
        if !self.contains(name) {
            return Err(NavigationError::NavigationNotFound(name.to_string()));
        }
        Ok(self.get(name))
    }

    pub fn navigations(&self) -> impl Iterator<Item = Navigation<'_>> {
        self.navigations.iter().map(|(name, items)| Navigation {
            name,
            items,
            services: &self.services,
        })
    }

    /// Breadcrumbs for `route_name`, or the current route when absent.
    ///
    /// With a `name` only that tree is searched; otherwise trees are tried in
    /// configuration order and the first non-empty trail wins.
    pub fn breadcrumbs(
        &self,
        name: Option<&str>,
        route_name: Option<&str>,
        context: &RequestContext,
    ) -> Vec<BreadcrumbNode> {
        let Some(route) = route_name.or(context.current_route.as_deref()) else {
            return Vec::new();
        };
        let params = &context.current_route_params;

        match name {
            Some(name) => self.get(name).breadcrumbs(route, params, context),
            None => self
                .navigations()
                .map(|navigation| navigation.breadcrumbs(route, params, context))
                .find(|trail| !trail.is_empty())
                .unwrap_or_default(),
        }
    }
}
