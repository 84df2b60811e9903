//! Icon cache and compilation.
//!
//! Rendering only ever reads the cache. Filling it is an explicit batch step
//! that fetches SVGs over the network and rewrites the cache file wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::context::IconResolver;
use crate::error::{NavigationError, Result};
use crate::parser::NavigationItem;

pub const DEFAULT_SOURCE_URL: &str =
    "https://cdn.jsdelivr.net/npm/lucide-static@latest/icons/{name}.svg";

/// `icons` section of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconSettings {
    #[serde(default)]
    pub compiled_path: Option<PathBuf>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl IconSettings {
    /// Configured cache path, else the per-user cache directory
    pub fn cache_path(&self) -> PathBuf {
        self.compiled_path.clone().unwrap_or_else(default_cache_path)
    }

    pub fn source_url(&self) -> &str {
        self.source_url.as_deref().unwrap_or(DEFAULT_SOURCE_URL)
    }
}

pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("navmenu")
        .join("icons.json")
}

/// Compiled icons keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconCache {
    icons: BTreeMap<String, String>,
}

impl IconCache {
    pub fn new(icons: BTreeMap<String, String>) -> Self {
        Self { icons }
    }

    /// Loads a cache file; a missing file is an empty cache
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no compiled icon cache");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let icons = serde_json::from_str(&content)?;
        Ok(Self { icons })
    }

    /// Replaces the cache file with `icons`
    pub fn save(path: &Path, icons: &BTreeMap<String, String>) -> Result<()> {
        if let Some(directory) = path.parent() {
            fs::create_dir_all(directory)?;
        }
        fs::write(path, serde_json::to_string_pretty(icons)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconResolver for IconCache {
    fn resolve(&self, name: &str) -> String {
        match self.icons.get(name) {
            Some(svg) => svg.clone(),
            None => {
                debug!(icon = name, "icon not compiled, using its name");
                name.to_string()
            }
        }
    }
}

/// Where raw SVG markup comes from
pub trait IconSource {
    fn fetch(&self, name: &str) -> Result<String>;
}

/// Fetches icons from a CDN URL template containing `{name}`
pub struct CdnIconSource {
    client: reqwest::blocking::Client,
    url_template: String,
}

impl CdnIconSource {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        self.url_template.replace("{name}", name)
    }
}

impl IconSource for CdnIconSource {
    fn fetch(&self, name: &str) -> Result<String> {
        let fetch_error = |reason: String| NavigationError::IconFetch {
            name: name.to_string(),
            reason,
        };

        let response = self
            .client
            .get(self.url_for(name))
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        response.text().map_err(|e| fetch_error(e.to_string()))
    }
}

/// Collects icon names from navigation trees and compiles them to SVG
pub struct IconCompiler<S> {
    source: S,
}

impl<S: IconSource> IconCompiler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// SVG for one icon, or `None` when it could not be fetched
    pub fn compile_icon(&self, name: &str) -> Option<String> {
        match self.source.fetch(name) {
            Ok(svg) => Some(tag_svg(&svg)),
            Err(err) => {
                warn!(icon = name, error = %err, "skipping icon");
                None
            }
        }
    }

    /// Compiles every name, dropping the ones that fail
    pub fn compile_all(&self, names: &[String]) -> BTreeMap<String, String> {
        names
            .iter()
            .filter_map(|name| self.compile_icon(name).map(|svg| (name.clone(), svg)))
            .collect()
    }
}

/// Unique icon names across all trees, in first-seen order
pub fn extract_icons<'a, I>(navigations: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [NavigationItem]>,
{
    let mut icons = Vec::new();
    for items in navigations {
        collect_icons(items, &mut icons);
    }
    icons
}

fn collect_icons(items: &[NavigationItem], icons: &mut Vec<String>) {
    for item in items {
        if let Some(icon) = &item.icon {
            if !icons.contains(icon) {
                icons.push(icon.clone());
            }
        }
        if let Some(children) = &item.children {
            collect_icons(children, icons);
        }
    }
}

/// Marks the root element so styling can target compiled icons
fn tag_svg(svg: &str) -> String {
    svg.replacen("<svg", "<svg data-slot=\"icon\"", 1)
}
