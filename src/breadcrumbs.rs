use std::borrow::Cow;

use crate::context::{Collaborators, RequestContext, RouteParams};
use crate::matching;
use crate::parser::{BreadcrumbNode, Label, NavigationItem};

/// Path entry whose label is not evaluated yet
struct PendingCrumb<'i> {
    id: String,
    label: Option<&'i Label>,
    route: Option<&'i str>,
    url: Option<String>,
}

/// Finds the root-to-target trail of a navigation tree.
///
/// Search is depth-first in configuration order and stops at the first
/// match. Dynamic labels are evaluated only for the winning path, once each.
pub struct BreadcrumbResolver<'a> {
    name: &'a str,
    services: &'a Collaborators,
    context: &'a RequestContext,
}

impl<'a> BreadcrumbResolver<'a> {
    pub fn new(name: &'a str, services: &'a Collaborators, context: &'a RequestContext) -> Self {
        Self {
            name,
            services,
            context,
        }
    }

    /// `None` when the tree was searched and `target_route` is not in it
    pub fn find_path(
        &self,
        items: &[NavigationItem],
        target_route: &str,
        route_params: &RouteParams,
    ) -> Option<Vec<BreadcrumbNode>> {
        let mut path = Vec::new();
        self.search(items, target_route, route_params, &mut path, None)
    }

    fn search<'i>(
        &self,
        items: &'i [NavigationItem],
        target_route: &str,
        route_params: &RouteParams,
        path: &mut Vec<PendingCrumb<'i>>,
        parent_id: Option<&str>,
    ) -> Option<Vec<BreadcrumbNode>> {
        for (index, item) in items.iter().enumerate() {
            // A forbidden resource must not leak its name through a trail
            if !self.services.permits(item, self.context) {
                continue;
            }

            let id = match parent_id {
                Some(parent) => format!("{}-{}", parent, index),
                None => format!("nav-{}-{}", self.name, index),
            };

            if item.nav_only || item.item_type.is_structural() {
                if let Some(children) = &item.children {
                    if let Some(found) =
                        self.search(children, target_route, route_params, path, Some(&id))
                    {
                        return Some(found);
                    }
                }
                continue;
            }

            path.push(self.tentative(item, id.clone(), route_params));

            if matching::matches_route(item, target_route, route_params) {
                return Some(self.materialize(path, route_params));
            }

            if let Some(children) = &item.children {
                if let Some(found) = self.search(children, target_route, route_params, path, Some(&id)) {
                    return Some(found);
                }
            }

            path.pop();
        }

        None
    }

    fn tentative<'i>(
        &self,
        item: &'i NavigationItem,
        id: String,
        route_params: &RouteParams,
    ) -> PendingCrumb<'i> {
        let url = match (&item.route, &item.url) {
            (Some(route), _) => {
                let params = self.url_params(item, route_params);
                Some(self.services.url_for(route, &params))
            }
            (None, Some(url)) => Some(url.clone()),
            (None, None) => None,
        };

        PendingCrumb {
            id,
            label: item.label.as_ref(),
            route: item.route.as_deref(),
            url,
        }
    }

    fn url_params<'p>(&self, item: &NavigationItem, route_params: &'p RouteParams) -> Cow<'p, RouteParams> {
        match &item.params {
            Some(constraints) if item.breadcrumb_only && item.has_wildcard_params() => {
                Cow::Owned(matching::substitute_wildcards(
                    constraints,
                    &self.context.current_route_params,
                    route_params,
                ))
            }
            _ => Cow::Borrowed(route_params),
        }
    }

    fn materialize(&self, path: &[PendingCrumb<'_>], route_params: &RouteParams) -> Vec<BreadcrumbNode> {
        path.iter()
            .map(|crumb| BreadcrumbNode {
                id: crumb.id.clone(),
                label: crumb
                    .label
                    .map(|label| matching::resolve_label(label, route_params))
                    .unwrap_or_default(),
                route: crumb.route.map(str::to_string),
                url: crumb.url.clone(),
            })
            .collect()
    }
}
