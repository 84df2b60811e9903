/// Configuration context for rendering operations
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub depth: usize,
    pub show_urls: bool,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            depth: 0,
            show_urls: true,
        }
    }

    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            show_urls: self.show_urls,
        }
    }

    pub fn nested(&self) -> Self {
        self.with_depth(self.depth + 1)
    }

    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Output format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Core rendering trait for navigation output nodes
pub trait Render {
    fn render(&self, context: &RenderContext) -> String;
}
