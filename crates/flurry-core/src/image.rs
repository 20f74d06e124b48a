//! Preloaded icon metadata.

/// A preloaded icon that a flake can display.
///
/// Everything but `in_use` is fixed once the image is loaded. At most one
/// active flake holds a given record at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Resolved asset path or URL the image was loaded from.
    pub source: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Whether a flake currently displays this image.
    pub in_use: bool,
    /// Normalized asset name, e.g. `gifts/star.png`.
    pub name: String,
}

impl ImageRecord {
    /// Create a record that is not yet in use.
    pub fn new(name: impl Into<String>, source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            in_use: false,
            name: name.into(),
        }
    }
}
