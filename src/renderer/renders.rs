use crate::parser::{BreadcrumbNode, DisplayNode, ItemType};
use crate::renderer::traits::*;

impl Render for DisplayNode {
    fn render(&self, context: &RenderContext) -> String {
        let mut output = String::new();
        let indent = context.indent();
        let label = self.label.as_deref().unwrap_or_default();

        match self.node_type {
            ItemType::Separator => {
                output.push_str(&format!("{}---\n", indent));
                return output;
            }
            ItemType::Section => output.push_str(&format!("{}## {}\n", indent, label)),
            ItemType::Link => {
                let mut line = format!("{}- {}", indent, label);
                if context.show_urls {
                    if let Some(url) = &self.url {
                        line.push_str(&format!(" <{}>", url));
                    }
                }
                if let Some(method) = &self.method {
                    line.push_str(&format!(" [{}]", method.to_uppercase()));
                }
                if self.active() {
                    line.push_str(" *");
                }
                output.push_str(&line);
                output.push('\n');
            }
        }

        let child_context = context.nested();
        for child in self.child_nodes() {
            output.push_str(&child.render(&child_context));
        }

        output
    }
}

impl Render for BreadcrumbNode {
    fn render(&self, context: &RenderContext) -> String {
        match (&self.url, context.show_urls) {
            (Some(url), true) => format!("{} <{}>", self.label, url),
            _ => self.label.clone(),
        }
    }
}
