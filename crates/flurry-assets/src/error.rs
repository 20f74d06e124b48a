//! Error types for icon discovery and preloading.

use thiserror::Error;

/// Errors raised while discovering or loading icons.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no PNG icons found in {location}; check the directory contents and server settings")]
    NoIcons { location: String },

    #[error("failed to load {name}: {reason}")]
    Preload { name: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
