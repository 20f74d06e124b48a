//! Icon discovery and preloading for the flurry snowfall.
//!
//! Icons are found by walking a configurable chain of sources (preset names,
//! the listing of the asset location, a manifest file). The first source that
//! yields a valid name wins. The images are then decoded concurrently, all or
//! nothing.

mod catalog;
mod error;
mod listing;
mod name;
mod source;

pub use catalog::{AssetCatalog, CatalogOptions, PreloadedImage};
pub use error::{CatalogError, Result};
pub use listing::{parse_listing, parse_manifest};
pub use name::{encode_asset_path, normalize_asset_name, unique_png_names};
pub use source::{AssetLocation, SourceKind};
