use serde_json::Map;
use tracing::warn;

use crate::context::{Collaborators, RequestContext, RouteParams};
use crate::matching;
use crate::parser::{DisplayNode, ItemType, Label, NavigationItem, OUTPUT_KEYS, RESERVED_KEYS};

/// Builds the display tree of one navigation for one request
pub struct TreeBuilder<'a> {
    name: &'a str,
    services: &'a Collaborators,
    context: &'a RequestContext,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(name: &'a str, services: &'a Collaborators, context: &'a RequestContext) -> Self {
        Self {
            name,
            services,
            context,
        }
    }

    pub fn build(
        &self,
        items: &[NavigationItem],
        route_params: &RouteParams,
        parent_id: Option<&str>,
    ) -> Vec<DisplayNode> {
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| self.build_item(item, index, route_params, parent_id))
            .collect()
    }

    fn build_item(
        &self,
        item: &NavigationItem,
        index: usize,
        route_params: &RouteParams,
        parent_id: Option<&str>,
    ) -> Option<DisplayNode> {
        if !self.passes_gates(item) {
            return None;
        }

        let id = match parent_id {
            Some(parent) => format!("{}-{}", parent, index),
            None => format!("nav-{}-{}", self.name, index),
        };

        if item.breadcrumb_only {
            return None;
        }

        match item.item_type {
            ItemType::Separator => Some(DisplayNode {
                id,
                node_type: ItemType::Separator,
                label: None,
                url: None,
                method: None,
                icon: None,
                is_active: None,
                children: None,
                attributes: Map::new(),
            }),
            _ if self.needs_breadcrumb_context(item, &id) => None,
            ItemType::Section => self.build_section(item, id, route_params),
            ItemType::Link => Some(self.build_link(item, id, route_params)),
        }
    }

    /// `visible` then `can`; either failing hides the whole subtree
    fn passes_gates(&self, item: &NavigationItem) -> bool {
        if let Some(visible) = &item.visible {
            if !visible.evaluate() {
                return false;
            }
        }

        self.services.permits(item, self.context)
    }

    /// Wildcard params and dynamic labels only make sense on a matched route
    fn needs_breadcrumb_context(&self, item: &NavigationItem, id: &str) -> bool {
        let unsafe_item = item.has_wildcard_params() || item.has_dynamic_label();
        if unsafe_item && cfg!(debug_assertions) {
            warn!(
                navigation = self.name,
                id,
                route = item.route.as_deref().unwrap_or_default(),
                "item with wildcard params or a dynamic label should be breadcrumbOnly; skipping"
            );
        }
        unsafe_item
    }

    fn build_section(
        &self,
        item: &NavigationItem,
        id: String,
        route_params: &RouteParams,
    ) -> Option<DisplayNode> {
        let children = match &item.children {
            Some(configured) => {
                let built = self.build(configured, route_params, Some(&id));
                if built.is_empty() && !configured.is_empty() {
                    return None;
                }
                built
            }
            None => Vec::new(),
        };

        Some(DisplayNode {
            id,
            node_type: ItemType::Section,
            label: self.text_label(item),
            url: None,
            method: None,
            icon: None,
            is_active: None,
            children: Some(children),
            attributes: self.pass_through(item),
        })
    }

    fn build_link(&self, item: &NavigationItem, id: String, route_params: &RouteParams) -> DisplayNode {
        let url = match (&item.route, &item.url) {
            (Some(route), _) => Some(self.services.url_for(route, route_params)),
            (None, Some(url)) => Some(url.clone()),
            (None, None) => None,
        };

        let children = match &item.children {
            Some(children) => self.build(children, route_params, Some(&id)),
            None => Vec::new(),
        };

        DisplayNode {
            label: self.text_label(item),
            url,
            method: item.method.clone(),
            icon: item.icon.as_deref().map(|name| self.services.icons.resolve(name)),
            is_active: Some(matching::is_active(item, self.context)),
            children: Some(children),
            attributes: self.pass_through(item),
            node_type: ItemType::Link,
            id,
        }
    }

    fn text_label(&self, item: &NavigationItem) -> Option<String> {
        match &item.label {
            Some(Label::Text(text)) => Some(text.clone()),
            Some(Label::Dynamic(_)) => None,
            None => {
                warn!(navigation = self.name, "navigation item without a label");
                None
            }
        }
    }

    fn pass_through(&self, item: &NavigationItem) -> Map<String, serde_json::Value> {
        item.attributes
            .iter()
            .filter(|(key, _)| {
                !OUTPUT_KEYS.contains(&key.as_str()) && !RESERVED_KEYS.contains(&key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
