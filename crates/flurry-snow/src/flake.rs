//! A single falling sprite and its motion model.

use flurry_core::{Noise, Pose, SeededRandom, SpriteId, math::clamp, random_range};

use crate::area::Area;

/// Clock multipliers for the drift, vertical and tilt channels.
const DRIFT_RATE: f64 = 0.65;
const VERTICAL_RATE: f64 = 0.9;
const TILT_RATE: f64 = 0.75;

/// Exponent applied to the edge envelope.
const ENVELOPE_POWER: f64 = 0.85;

/// Lifecycle of a flake; exiting is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlakePhase {
    Falling,
    Exiting,
}

/// Everything needed to create a flake.
#[derive(Debug, Clone)]
pub struct FlakeSpawn {
    /// Index of the image in the context's image list.
    pub image: usize,
    pub area: Area,
    pub base_x: f64,
    /// Fall speed in stage pixels per second.
    pub speed: f64,
    pub size: f64,
    pub seed: i64,
    /// Extra distance above the stage top to start from.
    pub initial_offset: f64,
    /// Starting value of the noise clock.
    pub noise_clock: f64,
}

/// One falling sprite.
#[derive(Debug, Clone)]
pub struct Flake {
    pub image: usize,
    pub area: Area,
    pub base_x: f64,
    pub speed: f64,
    pub size: f64,
    pub y: f64,
    pub seed: i64,
    pub noise_clock: f64,
    pub sprite: SpriteId,
    pub phase: FlakePhase,
    sway: Noise,
    drift: Noise,
    vertical: Noise,
    tilt: Noise,
    sway_amplitude: f64,
    drift_amplitude: f64,
    vertical_amplitude: f64,
    tilt_amplitude: f64,
    pose: Pose,
}

impl Flake {
    /// Build a flake; all motion parameters come from its own seeded stream.
    pub fn new(spawn: FlakeSpawn, sprite: SpriteId) -> Self {
        let mut rng = SeededRandom::new(spawn.seed);
        let sway = Noise::new(&mut rng);
        let drift = Noise::new(&mut rng);
        let vertical = Noise::new(&mut rng);
        let tilt = Noise::new(&mut rng);

        let sway_amplitude = random_range(12.0, 20.0, &mut rng);
        let drift_amplitude = random_range(4.0, 10.0, &mut rng);
        let vertical_amplitude = random_range(3.0, 6.0, &mut rng);
        let tilt_amplitude = random_range(2.0, 6.0, &mut rng);

        let y = -spawn.size - spawn.initial_offset;
        Self {
            image: spawn.image,
            area: spawn.area,
            base_x: spawn.base_x,
            speed: spawn.speed,
            size: spawn.size,
            y,
            seed: spawn.seed,
            noise_clock: spawn.noise_clock,
            sprite,
            phase: FlakePhase::Falling,
            sway,
            drift,
            vertical,
            tilt,
            sway_amplitude,
            drift_amplitude,
            vertical_amplitude,
            tilt_amplitude,
            pose: Pose {
                x: spawn.base_x - spawn.size / 2.0,
                y,
                rotation: 0.0,
            },
        }
    }

    /// Advance by `dt` seconds on a stage `height` pixels tall and return the
    /// new pose.
    pub fn update(&mut self, dt: f64, height: f64) -> Pose {
        self.y += self.speed * dt;
        self.noise_clock += dt;
        let envelope = envelope(self.y, self.size, height);

        let sway = self.sway.sample(self.noise_clock) * self.sway_amplitude * envelope;
        let drift =
            self.drift.sample(self.noise_clock * DRIFT_RATE) * self.drift_amplitude * envelope;
        let vertical = self.vertical.sample(self.noise_clock * VERTICAL_RATE)
            * self.vertical_amplitude
            * envelope;
        let tilt = self.tilt.sample(self.noise_clock * TILT_RATE) * self.tilt_amplitude * envelope;

        let half = self.size / 2.0;
        let x_center = self.area.clamp_center(self.base_x + sway + drift, self.size);

        self.pose = Pose {
            x: x_center - half,
            y: self.y + vertical,
            rotation: tilt,
        };
        if self.is_out_of_view(height) {
            self.phase = FlakePhase::Exiting;
        }
        self.pose
    }

    /// Whether the flake has passed the bottom edge by its own size.
    pub fn is_out_of_view(&self, height: f64) -> bool {
        self.y >= height + self.size
    }

    /// Switch to a recomputed zone and pull the anchor back inside it.
    pub fn relink(&mut self, area: Area) {
        self.area = area;
        self.base_x = area.clamp_center(self.base_x, self.size);
    }

    /// Last pose computed by [`Flake::update`].
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Horizontal center of the last pose.
    pub fn center_x(&self) -> f64 {
        self.pose.x + self.size / 2.0
    }
}

/// Fade factor in `[0, 1]` that ramps motion in after entry and out before
/// exit.
pub fn envelope(y: f64, size: f64, height: f64) -> f64 {
    let enter = clamp((y + size) / size, 0.0, 1.0);
    let exit = clamp((height - y) / size, 0.0, 1.0);
    enter.min(exit).powf(ENVELOPE_POWER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{AreaLayout, AreaName};

    fn spawn(area: Area, base_x: f64) -> FlakeSpawn {
        FlakeSpawn {
            image: 0,
            area,
            base_x,
            speed: 70.0,
            size: 64.0,
            seed: 424_242,
            initial_offset: 0.0,
            noise_clock: 17.0,
        }
    }

    #[test]
    fn test_envelope_edges() {
        // Fully above the stage: no motion.
        assert_eq!(envelope(-64.0, 64.0, 800.0), 0.0);
        // Well inside: full motion.
        assert_eq!(envelope(400.0, 64.0, 800.0), 1.0);
        // Past the bottom edge: no motion.
        assert_eq!(envelope(800.0, 64.0, 800.0), 0.0);
        // Halfway in.
        let half = envelope(-32.0, 64.0, 800.0);
        assert!((half - 0.5f64.powf(0.85)).abs() < 1e-12);
    }

    #[test]
    fn test_starts_above_stage() {
        let area = AreaLayout::new(1000.0, 800.0).get(AreaName::Center);
        let mut s = spawn(area, 500.0);
        s.initial_offset = 30.0;
        let flake = Flake::new(s, SpriteId(1));
        assert_eq!(flake.y, -94.0);
        assert_eq!(flake.phase, FlakePhase::Falling);
    }

    #[test]
    fn test_update_advances_by_speed() {
        let area = AreaLayout::new(1000.0, 800.0).get(AreaName::Center);
        let mut flake = Flake::new(spawn(area, 500.0), SpriteId(1));
        flake.update(0.5, 800.0);
        assert_eq!(flake.y, -64.0 + 35.0);
        assert_eq!(flake.noise_clock, 17.5);
    }

    #[test]
    fn test_same_seed_same_motion() {
        let area = AreaLayout::new(1000.0, 800.0).get(AreaName::Left);
        let mut a = Flake::new(spawn(area, 200.0), SpriteId(1));
        let mut b = Flake::new(spawn(area, 200.0), SpriteId(2));
        for _ in 0..100 {
            assert_eq!(a.update(0.016, 800.0), b.update(0.016, 800.0));
        }
    }

    #[test]
    fn test_never_leaves_area() {
        let area = AreaLayout::new(640.0, 800.0).get(AreaName::Right);
        // Anchor pinned to the zone edge so sway pushes against the bound.
        let mut flake = Flake::new(spawn(area, area.max - 32.0), SpriteId(1));
        while !flake.is_out_of_view(800.0) {
            let pose = flake.update(0.016, 800.0);
            assert!(pose.x >= area.min - 1e-9);
            assert!(pose.x + flake.size <= area.max + 1e-9);
        }
    }

    #[test]
    fn test_no_sway_while_above_stage() {
        let area = AreaLayout::new(1000.0, 800.0).get(AreaName::Center);
        let mut s = spawn(area, 500.0);
        s.initial_offset = 500.0;
        let mut flake = Flake::new(s, SpriteId(1));
        let pose = flake.update(0.016, 800.0);
        assert_eq!(pose.x, 500.0 - 32.0);
        assert_eq!(pose.rotation, 0.0);
    }

    #[test]
    fn test_out_of_view_threshold() {
        let area = AreaLayout::new(1000.0, 800.0).get(AreaName::Center);
        let mut flake = Flake::new(spawn(area, 500.0), SpriteId(1));
        flake.y = 863.9;
        assert!(!flake.is_out_of_view(800.0));
        flake.y = 864.0;
        assert!(flake.is_out_of_view(800.0));
    }

    #[test]
    fn test_exiting_is_terminal_after_bottom() {
        let area = AreaLayout::new(1000.0, 800.0).get(AreaName::Center);
        let mut flake = Flake::new(spawn(area, 500.0), SpriteId(1));
        flake.y = 863.0;
        flake.update(0.1, 800.0);
        assert_eq!(flake.phase, FlakePhase::Exiting);
    }

    #[test]
    fn test_relink_reclamps_anchor() {
        let wide = AreaLayout::new(2000.0, 800.0);
        let narrow = AreaLayout::new(500.0, 800.0);
        let mut flake = Flake::new(spawn(wide.get(AreaName::Left), 600.0), SpriteId(1));
        flake.relink(narrow.get(AreaName::Left));
        assert_eq!(flake.area, narrow.get(AreaName::Left));
        assert_eq!(flake.base_x, 175.0 - 32.0);
    }
}
