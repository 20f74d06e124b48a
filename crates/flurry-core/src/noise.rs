//! Layered sine noise used for organic flake motion.

use std::f64::consts::PI;

use crate::random::{SeededRandom, random_range};

/// Frequency bands for the low, mid and high layers.
const BANDS: [(f64, f64); 3] = [(0.08, 0.18), (0.18, 0.32), (0.32, 0.52)];

/// Fixed layer weights; they sum to one so the output stays in `[-1, 1]`.
const WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Weighted sum of three sine waves with random phase and frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Noise {
    phases: [f64; 3],
    frequencies: [f64; 3],
}

impl Noise {
    /// Draw three phases, then three frequencies, from `rng`.
    pub fn new(rng: &mut SeededRandom) -> Self {
        let phases = [
            rng.next_f64() * PI * 2.0,
            rng.next_f64() * PI * 2.0,
            rng.next_f64() * PI * 2.0,
        ];
        let frequencies = BANDS.map(|(low, high)| random_range(low, high, rng));
        Self {
            phases,
            frequencies,
        }
    }

    /// Evaluate the noise at time `t`.
    pub fn sample(&self, t: f64) -> f64 {
        (0..3)
            .map(|i| WEIGHTS[i] * (t * self.frequencies[i] + self.phases[i]).sin())
            .sum()
    }
}
