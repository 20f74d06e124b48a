//! Snowfall context: population management and the per-frame driver.

use flurry_core::{
    ImageRecord, MAX_ACTIVE, MIN_ACTIVE, SeededRandom, StageBounds, VisualSurface, random_range,
};
use tracing::{debug, error, info, trace, warn};

use crate::area::{AreaLayout, AreaUsage};
use crate::error::{Result, SnowfallError};
use crate::flake::{Flake, FlakeSpawn};

/// Longest step the driver will simulate, in seconds.
const MAX_FRAME_DT: f64 = 0.035;

/// Time scale applied when reduced motion is preferred.
const REDUCED_MOTION_SCALE: f64 = 0.35;

/// Settings read once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowfallSettings {
    /// Flake edge length in stage pixels.
    pub flake_size: f64,
    /// Slow everything down for users who prefer less motion.
    pub reduced_motion: bool,
}

impl Default for SnowfallSettings {
    fn default() -> Self {
        Self {
            flake_size: 64.0,
            reduced_motion: false,
        }
    }
}

/// Owned simulation context.
///
/// Lifecycle is [`Snowfall::create`], [`Snowfall::start`], then any number
/// of [`Snowfall::frame`] calls, and finally [`Snowfall::dispose`].
#[derive(Debug)]
pub struct Snowfall<S: VisualSurface> {
    surface: S,
    settings: SnowfallSettings,
    images: Vec<ImageRecord>,
    flakes: Vec<Flake>,
    areas: Option<AreaLayout>,
    usage: AreaUsage,
    rng: SeededRandom,
    /// Timestamp of the previous frame in milliseconds.
    last_time: Option<f64>,
    /// Earliest timestamp for the next timed spawn, in milliseconds.
    next_spawn: f64,
    started: bool,
}

impl<S: VisualSurface> Snowfall<S> {
    /// Create an idle context drawing to `surface`.
    pub fn create(surface: S, settings: SnowfallSettings, rng: SeededRandom) -> Self {
        Self {
            surface,
            settings,
            images: Vec::new(),
            flakes: Vec::new(),
            areas: None,
            usage: AreaUsage::default(),
            rng,
            last_time: None,
            next_spawn: 0.0,
            started: false,
        }
    }

    /// Reset the stage, take ownership of the preloaded `images` and place
    /// the initial flakes.
    ///
    /// Fails when there is no stage or too few images. On failure the surface
    /// shows the error and frames stay inert. Starting twice is a no-op.
    pub fn start(&mut self, images: Vec<ImageRecord>) -> Result<()> {
        if self.started {
            return Ok(());
        }
        let Some(bounds) = self.surface.bounds() else {
            warn!("snowfall not started: no stage to draw on");
            return Err(SnowfallError::StageMissing);
        };

        self.flakes.clear();
        self.usage.reset();
        self.last_time = None;
        self.next_spawn = 0.0;
        self.surface.clear();
        self.relayout(bounds);

        self.images = images
            .into_iter()
            .map(|mut image| {
                image.in_use = false;
                image
            })
            .collect();
        if self.images.len() < MIN_ACTIVE {
            let err = SnowfallError::TooFewImages {
                required: MIN_ACTIVE,
                found: self.images.len(),
            };
            self.report_failure(&err.to_string());
            return Err(err);
        }

        let initial = MAX_ACTIVE.min(MIN_ACTIVE.max(self.images.len()));
        for i in 0..initial {
            let i = i as f64;
            let offset = random_range(i * 40.0, i * 60.0 + 80.0, &mut self.rng);
            self.spawn_flake(true, offset);
        }
        self.started = true;
        info!(
            images = self.images.len(),
            flakes = self.flakes.len(),
            width = bounds.width,
            height = bounds.height,
            "snowfall started"
        );
        Ok(())
    }

    /// Replace the stage with an error message and log it.
    pub fn report_failure(&mut self, message: &str) {
        error!("{message}");
        self.surface.clear();
        self.surface.show_error(message);
    }

    /// Recompute the zones after the stage changed size.
    pub fn resize(&mut self) {
        if let Some(bounds) = self.surface.bounds() {
            debug!(width = bounds.width, height = bounds.height, "stage resized");
            self.relayout(bounds);
        }
    }

    fn relayout(&mut self, bounds: StageBounds) {
        let layout = AreaLayout::new(bounds.width, bounds.height);
        for flake in &mut self.flakes {
            flake.relink(layout.get(flake.area.name));
        }
        self.areas = Some(layout);
    }

    /// Frame callback: derive the elapsed time from `timestamp` (milliseconds)
    /// and advance the simulation.
    pub fn frame(&mut self, timestamp: f64) {
        if !self.started || self.surface.bounds().is_none() {
            return;
        }
        let last = match self.last_time {
            Some(last) => last,
            None => {
                self.next_spawn = timestamp + random_range(400.0, 840.0, &mut self.rng);
                timestamp
            }
        };
        let mut dt = ((timestamp - last) / 1000.0).clamp(0.0, MAX_FRAME_DT);
        self.last_time = Some(timestamp);
        if self.settings.reduced_motion {
            dt *= REDUCED_MOTION_SCALE;
        }
        self.step(dt, timestamp);
    }

    /// Forget the previous frame time so a pause does not count as elapsed
    /// time.
    pub fn resume(&mut self, timestamp: f64) {
        if self.last_time.is_some() {
            self.last_time = Some(timestamp);
        }
    }

    /// Advance every flake by `dt` seconds, recycle those that left the
    /// stage, then top the population back up at time `now` (milliseconds).
    pub fn step(&mut self, dt: f64, now: f64) {
        let Some(bounds) = self.surface.bounds() else {
            return;
        };
        for i in (0..self.flakes.len()).rev() {
            let pose = self.flakes[i].update(dt, bounds.height);
            self.surface.set_pose(self.flakes[i].sprite, pose);
            if self.flakes[i].is_out_of_view(bounds.height) {
                let flake = self.flakes.remove(i);
                self.recycle(&flake);
            }
        }
        self.ensure_population(now);
    }

    fn ensure_population(&mut self, now: f64) {
        while self.flakes.len() < MIN_ACTIVE {
            let offset = random_range(20.0, 120.0, &mut self.rng);
            if !self.spawn_flake(true, offset) {
                break;
            }
        }
        if self.flakes.len() < MAX_ACTIVE && now >= self.next_spawn && self.spawn_flake(false, 0.0)
        {
            self.next_spawn = now + random_range(520.0, 980.0, &mut self.rng);
        }
    }

    /// Try to add one flake. Returns `false` without side effects on the
    /// population when the cap is reached (unless `force`), there is no
    /// stage, or every image is in use.
    fn spawn_flake(&mut self, force: bool, initial_offset: f64) -> bool {
        if !force && self.flakes.len() >= MAX_ACTIVE {
            return false;
        }
        let Some(bounds) = self.surface.bounds() else {
            return false;
        };
        let Some(layout) = &self.areas else {
            return false;
        };

        let free: Vec<usize> = self
            .images
            .iter()
            .enumerate()
            .filter(|(_, image)| !image.in_use)
            .map(|(index, _)| index)
            .collect();
        if free.is_empty() {
            return false;
        }
        let pick = (self.rng.next_f64() * free.len() as f64) as usize;
        let image = free[pick.min(free.len() - 1)];

        let area = self.usage.least_used(layout, &mut self.rng);
        let size = self.settings.flake_size;
        let seed = (self.rng.next_f64() * 1e9).floor() as i64;
        let span = area.width * 0.2;
        let base_x = area.clamp_center(
            area.center + random_range(-span, span, &mut self.rng),
            size,
        );
        let speed = random_range(bounds.height / 14.0, bounds.height / 9.0, &mut self.rng);
        let noise_clock = random_range(0.0, 1000.0, &mut self.rng);

        let sprite = self.surface.create_sprite(&self.images[image], size);
        let flake = Flake::new(
            FlakeSpawn {
                image,
                area,
                base_x,
                speed,
                size,
                seed,
                initial_offset,
                noise_clock,
            },
            sprite,
        );
        self.surface.set_pose(sprite, flake.pose());

        trace!(
            image = %self.images[image].name,
            area = area.name.as_str(),
            base_x,
            speed,
            "flake spawned"
        );
        self.images[image].in_use = true;
        self.usage.increment(area.name);
        self.flakes.push(flake);
        true
    }

    fn recycle(&mut self, flake: &Flake) {
        if let Some(image) = self.images.get_mut(flake.image) {
            image.in_use = false;
        }
        self.usage.decrement(flake.area.name);
        self.surface.remove_sprite(flake.sprite);
        trace!(area = flake.area.name.as_str(), "flake recycled");
    }

    /// Remove every sprite, release every image and hand the surface back.
    pub fn dispose(mut self) -> S {
        for flake in std::mem::take(&mut self.flakes) {
            self.recycle(&flake);
        }
        self.started = false;
        self.surface
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn active_count(&self) -> usize {
        self.flakes.len()
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn usage(&self) -> &AreaUsage {
        &self.usage
    }

    pub fn areas(&self) -> Option<&AreaLayout> {
        self.areas.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn reduced_motion(&self) -> bool {
        self.settings.reduced_motion
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.settings.reduced_motion = reduced;
    }
}
