//! Where icons come from.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::name::encode_asset_path;

/// One step of the discovery chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Names listed up front in the configuration.
    Preset,
    /// The listing of the asset location itself.
    Listing,
    /// A manifest file inside the asset location.
    Manifest,
}

impl SourceKind {
    /// Default discovery order.
    pub const DEFAULT_ORDER: [SourceKind; 3] =
        [SourceKind::Preset, SourceKind::Listing, SourceKind::Manifest];
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Preset => "preset",
            SourceKind::Listing => "listing",
            SourceKind::Manifest => "manifest",
        };
        f.write_str(name)
    }
}

/// Base location of the icon assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    /// A local directory.
    Directory(PathBuf),
    /// An `http(s)://` base URL, always ending in `/`.
    Remote(String),
}

impl AssetLocation {
    /// Interpret a configured location: URLs become [`AssetLocation::Remote`],
    /// everything else a directory.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            let mut base = location.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            AssetLocation::Remote(base)
        } else {
            AssetLocation::Directory(PathBuf::from(location))
        }
    }

    /// Public path of the asset `name` under this location, with every
    /// path segment percent-encoded.
    pub fn asset_path(&self, name: &str) -> String {
        match self {
            AssetLocation::Remote(base) => format!("{base}{}", encode_asset_path(name)),
            AssetLocation::Directory(dir) => {
                let dir = dir.to_string_lossy();
                let dir = dir.trim_end_matches(['/', '\\']);
                if dir.is_empty() {
                    encode_asset_path(name)
                } else {
                    format!("{dir}/{}", encode_asset_path(name))
                }
            }
        }
    }

    /// File-system path of `name` for a local location.
    pub fn local_path(&self, name: &str) -> Option<PathBuf> {
        match self {
            AssetLocation::Directory(dir) => Some(join_relative(dir, name)),
            AssetLocation::Remote(_) => None,
        }
    }
}

fn join_relative(dir: &Path, name: &str) -> PathBuf {
    name.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(dir.to_path_buf(), |path, segment| path.join(segment))
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLocation::Directory(dir) => write!(f, "{}", dir.display()),
            AssetLocation::Remote(url) => f.write_str(url),
        }
    }
}
