use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::RouteParams;

/// Configuration keys consumed as control metadata, never passed through
pub const RESERVED_KEYS: &[&str] = &[
    "label",
    "type",
    "route",
    "url",
    "params",
    "icon",
    "method",
    "visible",
    "can",
    "breadcrumbOnly",
    "navOnly",
    "children",
];

/// Keys owned by the rendered node; a configured value would shadow them
pub const OUTPUT_KEYS: &[&str] = &["id", "isActive"];

/// Marker for a parameter that accepts any present value
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Link,
    Section,
    Separator,
}

impl ItemType {
    /// Normalizes a configured type name, folding separator aliases
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "link" => Some(ItemType::Link),
            "section" => Some(ItemType::Section),
            "separator" | "divider" | "spacer" | "break" => Some(ItemType::Separator),
            _ => None,
        }
    }

    /// Sections and separators only group or split other items
    pub fn is_structural(&self) -> bool {
        !matches!(self, ItemType::Link)
    }
}

/// Argument handed to a dynamic label
#[derive(Debug, Clone, Copy)]
pub enum LabelArgument<'a> {
    /// The single model-like parameter of the route
    Model(&'a Value),
    /// Every route parameter, keyed by name
    Params(&'a RouteParams),
}

impl<'a> LabelArgument<'a> {
    /// Reads a field of the model, or a parameter by name
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self {
            LabelArgument::Model(model) => model.get(key),
            LabelArgument::Params(params) => params.get(key),
        }
    }

    /// Like [`LabelArgument::get`] but for string fields
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }
}

pub type LabelFn = Arc<dyn Fn(LabelArgument<'_>) -> String + Send + Sync>;

#[derive(Clone)]
pub enum Label {
    Text(String),
    /// Evaluated only once the item sits on a matched breadcrumb path
    Dynamic(LabelFn),
}

impl Label {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Label::Dynamic(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Label::Text(text) => Some(text),
            Label::Dynamic(_) => None,
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Label::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::Text(text)
    }
}

pub type VisibilityFn = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Visibility {
    Literal(bool),
    Predicate(VisibilityFn),
}

impl Visibility {
    pub fn evaluate(&self) -> bool {
        match self {
            Visibility::Literal(visible) => *visible,
            Visibility::Predicate(predicate) => predicate(),
        }
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Literal(visible) => f.debug_tuple("Literal").field(visible).finish(),
            Visibility::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Permission requirement, optionally scoped to an argument
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub name: String,
    pub argument: Option<Value>,
}

impl Ability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    pub fn with_argument(name: impl Into<String>, argument: Value) -> Self {
        Self {
            name: name.into(),
            argument: Some(argument),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamConstraint {
    /// Satisfied by any present value
    Any,
    /// Satisfied only by an equal value
    Exact(Value),
}

impl ParamConstraint {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(ref s) if s == WILDCARD => ParamConstraint::Any,
            other => ParamConstraint::Exact(other),
        }
    }
}

pub type ParamConstraints = BTreeMap<String, ParamConstraint>;

/// A node of a navigation configuration tree
#[derive(Debug, Clone, Default)]
pub struct NavigationItem {
    pub label: Option<Label>,
    pub item_type: ItemType,
    pub route: Option<String>,
    pub url: Option<String>,
    pub params: Option<ParamConstraints>,
    pub icon: Option<String>,
    pub method: Option<String>,
    pub visible: Option<Visibility>,
    pub can: Option<Ability>,
    pub breadcrumb_only: bool,
    pub nav_only: bool,
    pub children: Option<Vec<NavigationItem>>,
    pub attributes: Map<String, Value>,
}

impl NavigationItem {
    pub fn link(label: impl Into<Label>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn section(label: impl Into<Label>) -> Self {
        Self {
            label: Some(label.into()),
            item_type: ItemType::Section,
            ..Self::default()
        }
    }

    pub fn separator() -> Self {
        Self {
            item_type: ItemType::Separator,
            ..Self::default()
        }
    }

    /// A link whose label is computed from the matched route's parameters
    pub fn dynamic<F>(label: F) -> Self
    where
        F: Fn(LabelArgument<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            label: Some(Label::Dynamic(Arc::new(label))),
            ..Self::default()
        }
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), ParamConstraint::from_value(value.into()));
        self
    }

    pub fn wildcard(self, name: impl Into<String>) -> Self {
        self.param(name, WILDCARD)
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(Visibility::Literal(visible));
        self
    }

    pub fn visible_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.visible = Some(Visibility::Predicate(Arc::new(predicate)));
        self
    }

    pub fn can(mut self, ability: impl Into<String>) -> Self {
        self.can = Some(Ability::new(ability));
        self
    }

    pub fn can_with(mut self, ability: impl Into<String>, argument: Value) -> Self {
        self.can = Some(Ability::with_argument(ability, argument));
        self
    }

    pub fn breadcrumb_only(mut self) -> Self {
        self.breadcrumb_only = true;
        self
    }

    pub fn nav_only(mut self) -> Self {
        self.nav_only = true;
        self
    }

    pub fn children(mut self, children: Vec<NavigationItem>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn has_wildcard_params(&self) -> bool {
        self.params
            .as_ref()
            .is_some_and(|params| params.values().any(|c| *c == ParamConstraint::Any))
    }

    pub fn has_dynamic_label(&self) -> bool {
        self.label.as_ref().is_some_and(Label::is_dynamic)
    }
}

/// Rendered navigation node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DisplayNode>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DisplayNode {
    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }

    pub fn child_nodes(&self) -> &[DisplayNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
