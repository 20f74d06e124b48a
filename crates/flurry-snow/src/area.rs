//! Horizontal zones of the stage and their occupancy.

use flurry_core::{SeededRandom, math::clamp};

/// Name of one of the three horizontal zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaName {
    Left,
    Center,
    Right,
}

impl AreaName {
    /// All zones, left to right.
    pub const ALL: [AreaName; 3] = [AreaName::Left, AreaName::Center, AreaName::Right];

    /// Fractional horizontal bounds of the zone.
    fn fractions(self) -> (f64, f64) {
        match self {
            AreaName::Left => (0.05, 0.35),
            AreaName::Center => (0.35, 0.65),
            AreaName::Right => (0.65, 0.95),
        }
    }

    fn index(self) -> usize {
        match self {
            AreaName::Left => 0,
            AreaName::Center => 1,
            AreaName::Right => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AreaName::Left => "left",
            AreaName::Center => "center",
            AreaName::Right => "right",
        }
    }
}

/// A horizontal zone in stage pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub name: AreaName,
    pub min: f64,
    pub max: f64,
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

impl Area {
    fn compute(name: AreaName, stage_width: f64, stage_height: f64) -> Self {
        let (low, high) = name.fractions();
        let min = stage_width * low;
        let max = stage_width * high;
        Self {
            name,
            min,
            max,
            center: (min + max) / 2.0,
            width: max - min,
            height: stage_height,
        }
    }

    /// Clamp a flake center so a flake of `size` stays inside the zone.
    pub fn clamp_center(&self, x: f64, size: f64) -> f64 {
        let half = size / 2.0;
        clamp(x, self.min + half, self.max - half)
    }
}

/// The three zones for the current stage size.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLayout {
    areas: [Area; 3],
}

impl AreaLayout {
    /// Split a stage of the given size into the left, center and right zones.
    pub fn new(stage_width: f64, stage_height: f64) -> Self {
        Self {
            areas: AreaName::ALL.map(|name| Area::compute(name, stage_width, stage_height)),
        }
    }

    /// The recomputed zone with the given name.
    pub fn get(&self, name: AreaName) -> Area {
        self.areas[name.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }
}

/// Count of active flakes per zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaUsage {
    counts: [usize; 3],
}

impl AreaUsage {
    pub fn get(&self, name: AreaName) -> usize {
        self.counts[name.index()]
    }

    pub fn increment(&mut self, name: AreaName) {
        self.counts[name.index()] += 1;
    }

    /// Decrement, never going below zero.
    pub fn decrement(&mut self, name: AreaName) {
        let count = &mut self.counts[name.index()];
        *count = count.saturating_sub(1);
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn reset(&mut self) {
        self.counts = [0; 3];
    }

    /// Pick the least used zone, breaking ties with `rng`.
    ///
    /// The generator is only consulted when more than one zone shares the
    /// lowest count.
    pub fn least_used(&self, layout: &AreaLayout, rng: &mut SeededRandom) -> Area {
        let lowest = AreaName::ALL
            .iter()
            .map(|name| self.get(*name))
            .min()
            .unwrap_or(0);
        let candidates: Vec<AreaName> = AreaName::ALL
            .into_iter()
            .filter(|name| self.get(*name) == lowest)
            .collect();
        let pick = if candidates.len() > 1 {
            let index = (rng.next_f64() * candidates.len() as f64) as usize;
            candidates[index.min(candidates.len() - 1)]
        } else {
            candidates[0]
        };
        layout.get(pick)
    }
}
