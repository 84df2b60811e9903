//! Route matching shared by the display tree and breadcrumb traversals.
//!
//! Active state and breadcrumb matching must agree on what "this item is the
//! current page" means, so both go through [`matches_route`].

use serde_json::Value;

use crate::context::{RequestContext, RouteParams};
use crate::parser::{Label, LabelArgument, NavigationItem, ParamConstraint, ParamConstraints};

/// Route key of a parameter value: models expose `routeKey` or `id`
pub fn route_key(value: &Value) -> Value {
    match value {
        Value::Object(model) => model
            .get("routeKey")
            .or_else(|| model.get("id"))
            .cloned()
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// String form of a parameter as it would appear in a URL
pub fn param_string(value: &Value) -> String {
    match route_key(value) {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Compares by route key so `5`, `"5"` and `{"id": 5}` are the same user
pub fn values_equal(expected: &Value, actual: &Value) -> bool {
    expected == actual || param_string(expected) == param_string(actual)
}

pub fn params_match(constraints: Option<&ParamConstraints>, actual: &RouteParams) -> bool {
    let Some(constraints) = constraints else {
        return true;
    };
    constraints.iter().all(|(name, constraint)| {
        match (constraint, actual.get(name)) {
            (_, None) | (_, Some(Value::Null)) => false,
            (ParamConstraint::Any, Some(_)) => true,
            (ParamConstraint::Exact(expected), Some(value)) => values_equal(expected, value),
        }
    })
}

/// Whether `item` stands for exactly `route` with these parameters
pub fn matches_route(item: &NavigationItem, route: &str, params: &RouteParams) -> bool {
    item.route.as_deref() == Some(route) && params_match(item.params.as_ref(), params)
}

/// `users` is an ancestor of `users.roles.index`, but not of `users_archive`
pub fn is_route_descendant(ancestor: &str, route: &str) -> bool {
    route.len() > ancestor.len()
        && route.starts_with(ancestor)
        && route[ancestor.len()..].starts_with('.')
}

/// Active if the item is the current page, an ancestor route of it, or has
/// an active child. Children count even when they are never displayed.
pub fn is_active(item: &NavigationItem, context: &RequestContext) -> bool {
    let Some(current) = context.current_route.as_deref() else {
        return false;
    };
    is_active_for(item, current, &context.current_route_params)
}

fn is_active_for(item: &NavigationItem, current: &str, params: &RouteParams) -> bool {
    if let Some(route) = item.route.as_deref() {
        if matches_route(item, current, params) || is_route_descendant(route, current) {
            return true;
        }
    }

    item.children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|child| is_active_for(child, current, params))
}

/// Parameters for a `breadcrumbOnly` item's URL: declared wildcards take the
/// current request's values, exact constraints their literal value.
pub fn substitute_wildcards(
    constraints: &ParamConstraints,
    current: &RouteParams,
    base: &RouteParams,
) -> RouteParams {
    let mut resolved = base.clone();
    for (name, constraint) in constraints {
        let value = match constraint {
            ParamConstraint::Any => current.get(name).or_else(|| base.get(name)).map(route_key),
            ParamConstraint::Exact(value) => Some(value.clone()),
        };
        if let Some(value) = value {
            resolved.insert(name.clone(), value);
        }
    }
    resolved
}

/// A lone model parameter is passed as-is; anything else gets the whole map
pub fn label_argument(params: &RouteParams) -> LabelArgument<'_> {
    let mut models = params.values().filter(|value| value.is_object());
    match (models.next(), models.next()) {
        (Some(model), None) => LabelArgument::Model(model),
        _ => LabelArgument::Params(params),
    }
}

pub fn resolve_label(label: &Label, params: &RouteParams) -> String {
    match label {
        Label::Text(text) => text.clone(),
        Label::Dynamic(label_fn) => label_fn(label_argument(params)),
    }
}
