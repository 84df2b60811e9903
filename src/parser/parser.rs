use serde::Deserialize;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::discovery::RouteNavigation;
use crate::error::{NavigationError, Result};
use crate::icons::IconSettings;
use crate::parser::types::*;
use crate::routes::RouteTable;

// Parser for converting raw JSON navigation items to typed structures
pub struct ItemParser<'a> {
    navigation: &'a str,
    problems: Option<RefCell<Vec<NavigationError>>>,
}

impl<'a> ItemParser<'a> {
    pub fn new(navigation: &'a str) -> Self {
        Self {
            navigation,
            problems: None,
        }
    }

    /// A parser that records shape errors instead of failing. Offending
    /// fields are ignored, so sibling indices stay those of the file.
    pub fn collecting(navigation: &'a str) -> Self {
        Self {
            navigation,
            problems: Some(RefCell::new(Vec::new())),
        }
    }

    pub fn into_problems(self) -> Vec<NavigationError> {
        self.problems.map(RefCell::into_inner).unwrap_or_default()
    }

    /// Parses the item list of one navigation
    pub fn parse_navigation(&self, value: &Value) -> Result<Vec<NavigationItem>> {
        match value {
            Value::Array(items) => self.parse_list(items, self.navigation),
            _ => {
                self.reject(self.invalid(self.navigation, "navigation must be an array"))?;
                Ok(Vec::new())
            }
        }
    }

    fn parse_list(&self, items: &[Value], path: &str) -> Result<Vec<NavigationItem>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.parse_item(item, &format!("{}[{}]", path, index)))
            .collect()
    }

    pub fn parse_item(&self, value: &Value, path: &str) -> Result<NavigationItem> {
        let Some(fields) = value.as_object() else {
            self.reject(self.invalid(path, "item must be an object"))?;
            return Ok(NavigationItem::default());
        };

        let mut item = NavigationItem::default();
        for (key, value) in fields {
            if let Err(err) = self.parse_field(&mut item, key, value, path) {
                self.reject(err)?;
            }
        }

        Ok(item)
    }

    fn parse_field(&self, item: &mut NavigationItem, key: &str, value: &Value, path: &str) -> Result<()> {
        match key {
            "label" => item.label = self.optional_string(value, path, key)?.map(Label::Text),
            "type" => {
                if let Some(name) = self.optional_string(value, path, key)? {
                    item.item_type = ItemType::parse(&name).ok_or_else(|| {
                        NavigationError::UnknownType {
                            path: path.to_string(),
                            item_type: name.clone(),
                        }
                    })?;
                }
            }
            "route" => item.route = self.optional_string(value, path, key)?,
            "url" => item.url = self.optional_string(value, path, key)?,
            "icon" => item.icon = self.optional_string(value, path, key)?,
            "method" => item.method = self.optional_string(value, path, key)?,
            "params" => item.params = self.parse_params(value, path)?,
            "visible" => item.visible = self.optional_bool(value, path, key)?.map(Visibility::Literal),
            "can" => item.can = self.parse_ability(value, path)?,
            "breadcrumbOnly" => {
                item.breadcrumb_only = self.optional_bool(value, path, key)?.unwrap_or(false)
            }
            "navOnly" => item.nav_only = self.optional_bool(value, path, key)?.unwrap_or(false),
            "children" => {
                item.children = match value {
                    Value::Null => None,
                    Value::Array(children) => {
                        Some(self.parse_list(children, &format!("{}.children", path))?)
                    }
                    _ => return Err(self.invalid(path, "children must be an array")),
                }
            }
            key if OUTPUT_KEYS.contains(&key) => {
                warn!(path, key, "attribute collides with a rendered field; dropping it");
            }
            _ => {
                item.attributes.insert(key.to_string(), value.clone());
            }
        }
        Ok(())
    }

    fn parse_params(&self, value: &Value, path: &str) -> Result<Option<ParamConstraints>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(params) => Ok(Some(
                params
                    .iter()
                    .map(|(name, value)| (name.clone(), ParamConstraint::from_value(value.clone())))
                    .collect::<BTreeMap<_, _>>(),
            )),
            _ => Err(self.invalid(path, "params must be an object")),
        }
    }

    fn parse_ability(&self, value: &Value, path: &str) -> Result<Option<Ability>> {
        match value {
            Value::Null => Ok(None),
            Value::String(name) => Ok(Some(Ability::new(name.clone()))),
            Value::Array(pair) => match pair.as_slice() {
                [Value::String(name)] => Ok(Some(Ability::new(name.clone()))),
                [Value::String(name), argument] => {
                    Ok(Some(Ability::with_argument(name.clone(), argument.clone())))
                }
                _ => Err(self.invalid(path, "can must be [ability, argument]")),
            },
            _ => Err(self.invalid(path, "can must be a string or [ability, argument]")),
        }
    }

    fn optional_string(&self, value: &Value, path: &str, key: &str) -> Result<Option<String>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            _ => Err(self.invalid(path, &format!("{} must be a string", key))),
        }
    }

    fn optional_bool(&self, value: &Value, path: &str, key: &str) -> Result<Option<bool>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            _ => Err(self.invalid(path, &format!("{} must be a boolean", key))),
        }
    }

    fn reject(&self, err: NavigationError) -> Result<()> {
        match &self.problems {
            Some(problems) => {
                problems.borrow_mut().push(err);
                Ok(())
            }
            None => Err(err),
        }
    }

    fn invalid(&self, path: &str, reason: &str) -> NavigationError {
        NavigationError::InvalidItem {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    navigations: Map<String, Value>,
    #[serde(default)]
    from_routes: Map<String, Value>,
    #[serde(default)]
    routes: RouteTable,
    #[serde(default)]
    icons: IconSettings,
}

/// Shape errors per navigation name, from a collecting load
pub type ItemProblems = BTreeMap<String, Vec<NavigationError>>;

/// Parsed configuration file: navigation trees in file order, routes, icons
#[derive(Debug, Clone, Default)]
pub struct NavigationConfig {
    pub navigations: Vec<(String, Vec<NavigationItem>)>,
    pub routes: RouteTable,
    pub icons: IconSettings,
}

impl NavigationConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Self::parse(content, false).map(|(config, _)| config)
    }

    /// Like [`NavigationConfig::load`], but malformed items are reported
    /// rather than failing the whole file
    pub fn load_collecting(path: &Path) -> Result<(Self, ItemProblems)> {
        let content = fs::read_to_string(path)?;
        Self::from_json_collecting(&content)
    }

    pub fn from_json_collecting(content: &str) -> Result<(Self, ItemProblems)> {
        Self::parse(content, true)
    }

    fn parse(content: &str, collecting: bool) -> Result<(Self, ItemProblems)> {
        let raw: RawConfig = serde_json::from_str(content)?;

        let mut navigations = Vec::new();
        let mut problems = ItemProblems::new();
        for (name, items) in &raw.navigations {
            let parser = if collecting {
                ItemParser::collecting(name)
            } else {
                ItemParser::new(name)
            };
            let parsed = parser.parse_navigation(items)?;
            let found = parser.into_problems();
            if !found.is_empty() {
                problems.insert(name.clone(), found);
            }
            navigations.push((name.clone(), parsed));
        }

        for (name, settings) in &raw.from_routes {
            let generator: RouteNavigation = serde_json::from_value(settings.clone())?;
            match navigations.iter_mut().find(|(candidate, _)| candidate == name) {
                Some((_, items)) => {
                    let existing = std::mem::take(items);
                    *items = generator.merge_with(&raw.routes.navigation, existing);
                }
                None => navigations.push((name.clone(), generator.build(&raw.routes.navigation))),
            }
        }

        let config = Self {
            navigations,
            routes: raw.routes,
            icons: raw.icons,
        };
        Ok((config, problems))
    }

    pub fn navigation(&self, name: &str) -> Option<&[NavigationItem]> {
        self.navigations
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, items)| items.as_slice())
    }

    /// Layers `other` on top: same-named navigations and routes are replaced,
    /// new ones appended, icon settings taken when set
    pub fn merge(mut self, other: NavigationConfig) -> Self {
        for (name, items) in other.navigations {
            match self.navigations.iter_mut().find(|(candidate, _)| *candidate == name) {
                Some((_, existing)) => *existing = items,
                None => self.navigations.push((name, items)),
            }
        }
        if other.routes.base_url.is_some() {
            self.routes.base_url = other.routes.base_url;
        }
        self.routes.names.extend(other.routes.names);
        self.routes.navigation.extend(other.routes.navigation);
        if other.icons.compiled_path.is_some() {
            self.icons.compiled_path = other.icons.compiled_path;
        }
        if other.icons.source_url.is_some() {
            self.icons.source_url = other.icons.source_url;
        }
        self
    }
}
