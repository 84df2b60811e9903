//! Configuration checks run ahead of rendering.
//!
//! Problems are collected rather than returned early so a single pass reports
//! everything wrong with a navigation.

use crate::context::RouteResolver;
use crate::error::NavigationError;
use crate::parser::{ItemType, Label, NavigationConfig, NavigationItem};

/// Errors found in one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub navigation: String,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Puts shape errors from a collecting load ahead of the walk's errors
    pub fn with_problems(mut self, problems: &[NavigationError]) -> Self {
        let mut errors: Vec<String> = problems.iter().map(ToString::to_string).collect();
        errors.append(&mut self.errors);
        self.errors = errors;
        self
    }
}

pub fn validate_navigation(
    name: &str,
    items: &[NavigationItem],
    routes: &dyn RouteResolver,
) -> ValidationReport {
    ValidationReport {
        navigation: name.to_string(),
        errors: validate_items(items, routes),
    }
}

/// One report per navigation, in configuration order
pub fn validate_config(config: &NavigationConfig) -> Vec<ValidationReport> {
    config
        .navigations
        .iter()
        .map(|(name, items)| validate_navigation(name, items, &config.routes))
        .collect()
}

/// Path-qualified messages for missing labels and unknown routes
pub fn validate_items(items: &[NavigationItem], routes: &dyn RouteResolver) -> Vec<String> {
    let mut errors = Vec::new();
    walk(items, &[], routes, &mut errors);
    errors
}

fn walk(
    items: &[NavigationItem],
    parent_path: &[String],
    routes: &dyn RouteResolver,
    errors: &mut Vec<String>,
) {
    for (index, item) in items.iter().enumerate() {
        if item.item_type == ItemType::Separator {
            continue;
        }

        let Some(label) = &item.label else {
            let prefix = if parent_path.is_empty() {
                String::new()
            } else {
                format!("{} > ", parent_path.join(" > "))
            };
            errors.push(format!("{}Item at index {} (missing label)", prefix, index));
            continue;
        };

        let mut path = parent_path.to_vec();
        path.push(match label {
            Label::Text(text) => text.clone(),
            Label::Dynamic(_) => format!("<dynamic label at index {}>", index),
        });

        if let Some(route) = &item.route {
            if !routes.exists(route) {
                errors.push(format!("{} (route: {})", path.join(" > "), route));
            }
        }

        if let Some(children) = &item.children {
            walk(children, &path, routes, errors);
        }
    }
}
