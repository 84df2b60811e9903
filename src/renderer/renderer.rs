use crate::error::Result;
use crate::parser::{BreadcrumbNode, DisplayNode};
use crate::renderer::traits::*;

/// Renders whole display trees and breadcrumb trails
pub struct NavigationRenderer {
    pub format: OutputFormat,
    pub show_urls: bool,
}

impl NavigationRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_urls: true,
        }
    }

    fn context(&self) -> RenderContext {
        RenderContext {
            depth: 0,
            show_urls: self.show_urls,
        }
    }

    pub fn render_tree(&self, name: &str, nodes: &[DisplayNode]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(nodes)?);
        }

        let mut output = String::new();

        // Render navigation header
        output.push_str(&format!("# Navigation: {}\n\n", name));

        if nodes.is_empty() {
            output.push_str("(empty)\n");
            return Ok(output);
        }

        let context = self.context();
        for node in nodes {
            output.push_str(&node.render(&context));
        }

        Ok(output)
    }

    pub fn render_breadcrumbs(&self, trail: &[BreadcrumbNode]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(trail)?);
        }

        if trail.is_empty() {
            return Ok("(no breadcrumbs)\n".to_string());
        }

        let context = self.context();
        let crumbs: Vec<String> = trail.iter().map(|crumb| crumb.render(&context)).collect();
        Ok(format!("{}\n", crumbs.join(" > ")))
    }
}
