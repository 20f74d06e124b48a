//! In-memory surface that records what the simulation draws.

use std::collections::BTreeMap;

use flurry_core::{ImageRecord, Pose, SpriteId, StageBounds, VisualSurface};

/// A sprite as last seen by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSprite {
    /// Name of the image shown.
    pub image: String,
    pub size: f64,
    /// Last pose set, if any.
    pub pose: Option<Pose>,
}

/// Headless [`VisualSurface`] for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    bounds: Option<StageBounds>,
    sprites: BTreeMap<SpriteId, RecordedSprite>,
    next_id: u64,
    message: Option<String>,
    pose_updates: usize,
}

impl RecordingSurface {
    /// A surface with a stage of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            bounds: Some(StageBounds { width, height }),
            ..Self::default()
        }
    }

    /// A surface with no stage at all.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Change the stage size, as a resize would.
    pub fn set_bounds(&mut self, bounds: Option<StageBounds>) {
        self.bounds = bounds;
    }

    pub fn sprites(&self) -> &BTreeMap<SpriteId, RecordedSprite> {
        &self.sprites
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&RecordedSprite> {
        self.sprites.get(&id)
    }

    /// Message shown by [`VisualSurface::show_error`], if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Total number of [`VisualSurface::set_pose`] calls.
    pub fn pose_updates(&self) -> usize {
        self.pose_updates
    }
}

impl VisualSurface for RecordingSurface {
    fn bounds(&self) -> Option<StageBounds> {
        self.bounds
    }

    fn clear(&mut self) {
        self.sprites.clear();
        self.message = None;
    }

    fn create_sprite(&mut self, image: &ImageRecord, size: f64) -> SpriteId {
        self.next_id += 1;
        let id = SpriteId(self.next_id);
        self.sprites.insert(
            id,
            RecordedSprite {
                image: image.name.clone(),
                size,
                pose: None,
            },
        );
        id
    }

    fn set_pose(&mut self, sprite: SpriteId, pose: Pose) {
        self.pose_updates += 1;
        if let Some(recorded) = self.sprites.get_mut(&sprite) {
            recorded.pose = Some(pose);
        }
    }

    fn remove_sprite(&mut self, sprite: SpriteId) {
        self.sprites.remove(&sprite);
    }

    fn show_error(&mut self, message: &str) {
        self.sprites.clear();
        self.message = Some(message.to_string());
    }
}
