//! Core types shared by the flurry crates.
//!
//! This crate holds the deterministic building blocks of the effect (the
//! seeded generator and the layered sine noise), the image record handed out
//! to flakes, and the [`VisualSurface`] capability the simulation draws to.

pub mod math;
pub mod noise;
pub mod random;

mod image;
mod surface;

pub use image::ImageRecord;
pub use noise::Noise;
pub use random::{SeededRandom, random_range};
pub use surface::{Pose, SpriteId, StageBounds, VisualSurface};

/// Minimum number of flakes kept on stage once started.
pub const MIN_ACTIVE: usize = 3;

/// Maximum number of flakes on stage in steady state.
pub const MAX_ACTIVE: usize = 4;

/// Directory prefix under which icon assets are published.
pub const ASSET_DIRECTORY: &str = "assets/";
