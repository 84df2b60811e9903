//! Navigation trees generated from route metadata.
//!
//! Routes opt in by listing themselves under `routes.navigation` with an
//! optional label, parent route and sort order. A [`RouteNavigation`] turns
//! that flat list into nested links and decorates them from per-route maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::parser::NavigationItem;

/// Trailing route segments that name an action rather than a page
const ACTION_SUFFIXES: &[&str] = &[
    "index", "show", "edit", "create", "store", "update", "destroy",
];

/// Navigation metadata attached to one named route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub route: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl RouteMeta {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            label: None,
            parent: None,
            order: 0,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }
}

/// Builds links from [`RouteMeta`] entries
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteNavigation {
    /// Only routes below this one become top-level items
    pub parent: Option<String>,
    pub icons: BTreeMap<String, String>,
    pub methods: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, Map<String, Value>>,
    pub exclude: Vec<String>,
}

type Grouped<'m> = BTreeMap<Option<String>, Vec<&'m RouteMeta>>;

impl RouteNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn under(parent: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::default()
        }
    }

    pub fn with_icons<I, K, V>(mut self, icons: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.icons
            .extend(icons.into_iter().map(|(route, icon)| (route.into(), icon.into())));
        self
    }

    pub fn with_methods<I, K, V>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.methods
            .extend(methods.into_iter().map(|(route, method)| (route.into(), method.into())));
        self
    }

    pub fn with_attributes(mut self, route: impl Into<String>, attributes: Map<String, Value>) -> Self {
        self.attributes.entry(route.into()).or_default().extend(attributes);
        self
    }

    pub fn exclude<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(routes.into_iter().map(Into::into));
        self
    }

    /// Nested links for `routes`, siblings sorted by `order`.
    ///
    /// Routes without a parent hang off [`RouteNavigation::parent`], which is
    /// itself never an item. Routes whose parent is excluded, unknown or part
    /// of a cycle are unreachable and left out.
    pub fn build(&self, routes: &[RouteMeta]) -> Vec<NavigationItem> {
        let mut selected: Vec<&RouteMeta> = routes
            .iter()
            .filter(|meta| !self.exclude.contains(&meta.route))
            .filter(|meta| self.parent.as_ref() != Some(&meta.route))
            .collect();
        selected.sort_by_key(|meta| meta.order);

        let mut grouped: Grouped<'_> = BTreeMap::new();
        for meta in selected {
            let parent = meta.parent.clone().or_else(|| self.parent.clone());
            grouped.entry(parent).or_default().push(meta);
        }

        self.build_level(&self.parent, &grouped)
    }

    /// Generated links followed by `existing`; on a shared top-level route
    /// the existing item wins
    pub fn merge_with(&self, routes: &[RouteMeta], existing: Vec<NavigationItem>) -> Vec<NavigationItem> {
        let mut merged: Vec<NavigationItem> = self
            .build(routes)
            .into_iter()
            .filter(|generated| {
                !existing
                    .iter()
                    .any(|item| item.route.is_some() && item.route == generated.route)
            })
            .collect();
        merged.extend(existing);
        merged
    }

    fn build_level(&self, parent: &Option<String>, grouped: &Grouped<'_>) -> Vec<NavigationItem> {
        grouped
            .get(parent)
            .map(|siblings| siblings.iter().map(|meta| self.build_item(meta, grouped)).collect())
            .unwrap_or_default()
    }

    fn build_item(&self, meta: &RouteMeta, grouped: &Grouped<'_>) -> NavigationItem {
        let label = meta
            .label
            .clone()
            .unwrap_or_else(|| label_from_route(&meta.route));
        let mut item = NavigationItem::link(label).route(meta.route.clone());

        if let Some(icon) = self.icons.get(&meta.route) {
            item = item.icon(icon.clone());
        }
        if let Some(method) = self.methods.get(&meta.route) {
            item = item.method(method.clone());
        }
        if let Some(attributes) = self.attributes.get(&meta.route) {
            item.attributes
                .extend(attributes.iter().map(|(key, value)| (key.clone(), value.clone())));
        }

        let key = Some(meta.route.clone());
        if grouped.contains_key(&key) {
            item = item.children(self.build_level(&key, grouped));
        }

        item
    }
}

/// `users.roles.index` becomes `Users Roles`, `user-profile_page` becomes
/// `User Profile Page`
pub fn label_from_route(route: &str) -> String {
    let base = match route.rsplit_once('.') {
        Some((head, action)) if ACTION_SUFFIXES.contains(&action) => head,
        _ => route,
    };

    base.replace(['.', '-', '_'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
