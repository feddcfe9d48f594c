//! # Terrain Module
//!
//! The height field shared by every chunk's terrain generation.
//!
//! A `TerrainGenerator` is built once from [`NoiseSettings`] and handed to
//! every chunk by reference. It holds no mutable state, so chunks can be
//! generated in any order, on any thread, and the same column always gets the
//! same height.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::{NoiseSettings, WorldConfig};

/// Fractal Perlin height field scaled to a maximum column height.
pub struct TerrainGenerator {
    noise: Fbm<Perlin>,
    max_height: f64,
}

impl TerrainGenerator {
    /// Builds the height field for a world configuration.
    pub fn new(settings: NoiseSettings, max_height: f64) -> Self {
        let noise = Fbm::<Perlin>::new(settings.seed)
            .set_frequency(settings.frequency)
            .set_octaves(settings.octaves);

        TerrainGenerator { noise, max_height }
    }

    /// Builds the height field described by `config`.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.noise, config.max_height)
    }

    /// Normalized height of the column at global `(x, z)`, in `[0, 1]`.
    pub fn height_fraction(&self, x: i32, z: i32) -> f64 {
        let sample = self.noise.get([x as f64, z as f64]);
        ((sample + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// Target height of the column at global `(x, z)`, in blocks.
    pub fn column_height(&self, x: i32, z: i32) -> f64 {
        self.height_fraction(x, z) * self.max_height
    }
}
