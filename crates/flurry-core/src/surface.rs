//! The drawing capability the simulation renders through.

use std::fmt;

use crate::image::ImageRecord;

/// Handle of a sprite created on a [`VisualSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u64);

/// Size of the stage in stage pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageBounds {
    pub width: f64,
    pub height: f64,
}

/// Where a sprite is drawn on a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Left edge in stage pixels.
    pub x: f64,
    /// Top edge in stage pixels.
    pub y: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate3d({:.2}px, {:.2}px, 0) rotate({:.2}deg)",
            self.x, self.y, self.rotation
        )
    }
}

/// Minimal rendering capability needed by the snowfall.
///
/// Implementations own the actual drawing; the simulation only creates,
/// moves and removes sprites.
pub trait VisualSurface {
    /// Current stage size, or `None` when there is no stage to draw on.
    fn bounds(&self) -> Option<StageBounds>;

    /// Remove every sprite and any message.
    fn clear(&mut self);

    /// Create a sprite showing `image` at `size` stage pixels square.
    fn create_sprite(&mut self, image: &ImageRecord, size: f64) -> SpriteId;

    /// Move a sprite.
    fn set_pose(&mut self, sprite: SpriteId, pose: Pose);

    /// Remove a sprite. Unknown ids are ignored.
    fn remove_sprite(&mut self, sprite: SpriteId);

    /// Replace the stage content with a human-readable message.
    fn show_error(&mut self, message: &str);
}
