//! Named route table used as the default [`RouteResolver`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::context::{RouteParams, RouteResolver};
use crate::discovery::RouteMeta;
use crate::error::RouteError;
use crate::matching::param_string;

/// Route names mapped to URI patterns such as `/users/{user}/edit`.
///
/// `{name}` placeholders are required and `{name?}` ones optional. Parameters
/// that fill no placeholder are appended as a query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// Routes that take part in generated navigations
    #[serde(default)]
    pub navigation: Vec<RouteMeta>,
}

enum Segment<'p> {
    Literal(&'p str),
    Placeholder { name: &'p str, optional: bool },
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.names.insert(name.into(), pattern.into());
        self
    }

    fn segments(pattern: &str) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut rest = pattern;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
                break;
            };
            if open > 0 {
                segments.push(Segment::Literal(&rest[..open]));
            }
            let inner = &rest[open + 1..close];
            let (name, optional) = match inner.strip_suffix('?') {
                Some(name) => (name, true),
                None => (inner, false),
            };
            segments.push(Segment::Placeholder { name, optional });
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }
        segments
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
        let pattern = self
            .names
            .get(route)
            .ok_or_else(|| RouteError::NotFound(route.to_string()))?;

        let mut path = String::new();
        let mut used = HashSet::new();
        for segment in Self::segments(pattern) {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder { name, optional } => {
                    match params.get(name).filter(|value| !value.is_null()) {
                        Some(value) => {
                            path.push_str(&urlencoding::encode(&param_string(value)));
                            used.insert(name);
                        }
                        None if optional => {
                            if path.ends_with('/') && path.len() > 1 {
                                path.pop();
                            }
                        }
                        None => {
                            return Err(RouteError::MissingParameter {
                                route: route.to_string(),
                                parameter: name.to_string(),
                            })
                        }
                    }
                }
            }
        }

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (name, value) in params {
            if used.contains(name.as_str()) || value.is_null() {
                continue;
            }
            query.append_pair(name, &param_string(value));
            has_query = true;
        }
        if has_query {
            path.push('?');
            path.push_str(&query.finish());
        }

        Ok(match &self.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path,
        })
    }

    fn exists(&self, route: &str) -> bool {
        self.names.contains_key(route)
    }
}
