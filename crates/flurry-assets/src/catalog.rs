//! Icon discovery and preloading.

use std::fs;
use std::thread;
use std::time::Duration;

use flurry_core::ImageRecord;
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::listing::{parse_listing, parse_manifest};
use crate::name::{encode_asset_path, unique_png_names};
use crate::source::{AssetLocation, SourceKind};

/// Timeout for HTTP requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Images loaded concurrently at most.
const PRELOAD_BATCH: usize = 8;

/// How to find the icons.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub location: AssetLocation,
    /// Names supplied up front.
    pub preset: Vec<String>,
    /// Discovery order; the first source yielding a name wins.
    pub sources: Vec<SourceKind>,
    /// Manifest file name relative to the location.
    pub manifest: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            location: AssetLocation::parse(flurry_core::ASSET_DIRECTORY),
            preset: Vec::new(),
            sources: SourceKind::DEFAULT_ORDER.to_vec(),
            manifest: "manifest.json".to_string(),
        }
    }
}

/// A decoded icon ready to be drawn.
#[derive(Debug, Clone)]
pub struct PreloadedImage {
    pub record: ImageRecord,
    pub image: DynamicImage,
}

/// Discovers icon names and preloads the images.
#[derive(Debug)]
pub struct AssetCatalog {
    options: CatalogOptions,
    agent: ureq::Agent,
}

impl AssetCatalog {
    pub fn new(options: CatalogOptions) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { options, agent }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Discover the icon names and preload every one of them.
    ///
    /// Fails when no source yields a name or when any single image fails to
    /// load.
    pub fn load(&self) -> Result<Vec<PreloadedImage>> {
        let names = self.discover();
        if names.is_empty() {
            return Err(CatalogError::NoIcons {
                location: self.options.location.to_string(),
            });
        }
        let images = self.preload(&names)?;
        info!(
            count = images.len(),
            location = %self.options.location,
            "icons preloaded"
        );
        Ok(images)
    }

    /// Try each configured source in order and return the first non-empty
    /// list of names. Source failures count as "no names".
    pub fn discover(&self) -> Vec<String> {
        for kind in &self.options.sources {
            let names = match kind {
                SourceKind::Preset => Ok(unique_png_names(&self.options.preset)),
                SourceKind::Listing => self.from_listing(),
                SourceKind::Manifest => self.from_manifest(),
            };
            match names {
                Ok(names) if !names.is_empty() => {
                    debug!(source = %kind, count = names.len(), "icons discovered");
                    return names;
                }
                Ok(_) => debug!(source = %kind, "no icons from source"),
                Err(e) => warn!(source = %kind, error = %e, "icon source failed"),
            }
        }
        Vec::new()
    }

    fn from_listing(&self) -> Result<Vec<String>> {
        match &self.options.location {
            AssetLocation::Directory(dir) => {
                // File names are literal; encode them so normalization
                // decodes them back unchanged.
                let mut files = Vec::new();
                for entry in fs::read_dir(dir)? {
                    let entry = entry?;
                    if entry.file_type()?.is_file() {
                        files.push(encode_asset_path(&entry.file_name().to_string_lossy()));
                    }
                }
                files.sort();
                Ok(unique_png_names(files))
            }
            AssetLocation::Remote(url) => {
                let mut response = self
                    .agent
                    .get(url)
                    .header("Cache-Control", "no-store")
                    .call()?;
                let content_type = response
                    .headers()
                    .get("content-type")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);
                let body = response.body_mut().read_to_string()?;
                Ok(parse_listing(content_type.as_deref(), &body))
            }
        }
    }

    fn from_manifest(&self) -> Result<Vec<String>> {
        let body = match &self.options.location {
            AssetLocation::Directory(dir) => fs::read_to_string(dir.join(&self.options.manifest))?,
            AssetLocation::Remote(url) => self
                .agent
                .get(&format!("{url}{}", self.options.manifest))
                .header("Cache-Control", "no-store")
                .call()?
                .body_mut()
                .read_to_string()?,
        };
        parse_manifest(&body)
    }

    /// Load every named image, up to [`PRELOAD_BATCH`] at a time. All or
    /// nothing: the first failure (in name order) is returned.
    pub fn preload(&self, names: &[String]) -> Result<Vec<PreloadedImage>> {
        let mut images = Vec::with_capacity(names.len());
        for batch in names.chunks(PRELOAD_BATCH) {
            images.extend(self.preload_batch(batch)?);
        }
        Ok(images)
    }

    fn preload_batch(&self, names: &[String]) -> Result<Vec<PreloadedImage>> {
        thread::scope(|scope| {
            let handles: Vec<_> = names
                .iter()
                .map(|name| scope.spawn(move || self.load_one(name)))
                .collect();
            handles
                .into_iter()
                .zip(names)
                .map(|(handle, name)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(CatalogError::Preload {
                            name: name.clone(),
                            reason: "loader thread panicked".to_string(),
                        })
                    })
                })
                .collect()
        })
    }

    fn load_one(&self, name: &str) -> Result<PreloadedImage> {
        let failed = |reason: String| CatalogError::Preload {
            name: name.to_string(),
            reason,
        };
        let location = &self.options.location;
        let source = location.asset_path(name);

        let image = match location.local_path(name) {
            Some(path) => image::open(&path).map_err(|e| failed(e.to_string()))?,
            None => {
                let bytes = self
                    .agent
                    .get(&source)
                    .call()
                    .and_then(|mut response| response.body_mut().read_to_vec())
                    .map_err(|e| failed(e.to_string()))?;
                image::load_from_memory(&bytes).map_err(|e| failed(e.to_string()))?
            }
        };

        Ok(PreloadedImage {
            record: ImageRecord::new(name, source, image.width(), image.height()),
            image,
        })
    }
}
