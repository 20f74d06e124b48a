//! Flake simulation for the flurry snowfall effect.
//!
//! A [`Snowfall`] owns a bounded population of flakes that fall through a
//! stage, sway with layered noise, and are recycled once they leave the
//! bottom edge. Drawing goes through a [`flurry_core::VisualSurface`], so the
//! whole simulation runs headless with a [`RecordingSurface`].

mod area;
mod error;
mod flake;
mod recording;
mod state;

pub use area::{Area, AreaLayout, AreaName, AreaUsage};
pub use error::{Result, SnowfallError};
pub use flake::{Flake, FlakePhase, FlakeSpawn, envelope};
pub use recording::{RecordedSprite, RecordingSurface};
pub use state::{Snowfall, SnowfallSettings};
