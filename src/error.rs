//! Error types for navigation loading and route resolution

use thiserror::Error;

/// Route resolution failures reported by a [`crate::context::RouteResolver`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No route is registered under this name
    #[error("Route not found: {0}")]
    NotFound(String),

    /// A required placeholder had no value
    #[error("Missing parameter '{parameter}' for route '{route}'")]
    MissingParameter { route: String, parameter: String },
}

/// Navigation configuration errors
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Item is not shaped like a navigation item
    #[error("Invalid navigation item at {path}: {reason}")]
    InvalidItem { path: String, reason: String },

    /// Item declares a type we do not know
    #[error("Unknown item type '{item_type}' at {path}")]
    UnknownType { path: String, item_type: String },

    /// Navigation name is not registered
    #[error("Navigation not found: {0}")]
    NavigationNotFound(String),

    /// Icon could not be fetched from its source
    #[error("Failed to fetch icon '{name}': {reason}")]
    IconFetch { name: String, reason: String },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
