//! # World Configuration
//!
//! Process-wide settings for streaming, terrain and rebuild scheduling. A
//! `WorldConfig` is fixed once a `ChunkManager` has been built from it.
//!
//! Chunk dimensions and the block size are compile-time constants in
//! [`crate::voxels::coordinate`] and are not part of this file.

use std::{fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxelError};

/// Parameters of the coherent-noise height field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Seed of the underlying Perlin permutation table
    pub seed: u32,
    /// Base frequency, in cycles per block
    pub frequency: f64,
    /// Number of fractal octaves summed
    pub octaves: usize,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        NoiseSettings {
            seed: 0,
            frequency: 0.005,
            octaves: 4,
        }
    }
}

/// Settings of the chunk streaming subsystem.
///
/// # Examples
///
/// ```
/// use voxel_chunks::config::WorldConfig;
///
/// let json = r#"{ "render_distance": 2, "clear_distance": 3 }"#;
/// let config = WorldConfig::from_json_str(json).unwrap();
/// assert_eq!(config.render_distance, 2);
/// assert_eq!(config.max_height, WorldConfig::default().max_height);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks within this Chebyshev distance (in chunks) of the observer are generated
    pub render_distance: i32,
    /// Chunks further than this from the observer are evicted.
    ///
    /// Kept larger than `render_distance` so an observer pacing along a chunk
    /// border does not create and destroy the same chunks every tick.
    pub clear_distance: i32,
    /// Height, in blocks, reached by a column whose noise sample is 1.0
    pub max_height: f64,
    /// Upper bound on slow-set rebuilds performed per update
    pub slow_rebuilds_per_update: usize,
    /// Height field parameters
    pub noise: NoiseSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            render_distance: 3,
            clear_distance: 5,
            max_height: 48.0,
            slow_rebuilds_per_update: 4,
            noise: NoiseSettings::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration document. Missing keys take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        info!("Loaded world configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Rejects settings the streaming policy cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.render_distance < 0 {
            return Err(VoxelError::InvalidArgument(format!(
                "render_distance must not be negative, got {}",
                self.render_distance
            )));
        }
        if self.clear_distance < self.render_distance {
            return Err(VoxelError::InvalidArgument(format!(
                "clear_distance ({}) must be at least render_distance ({})",
                self.clear_distance, self.render_distance
            )));
        }
        if self.slow_rebuilds_per_update == 0 {
            return Err(VoxelError::InvalidArgument(
                "slow_rebuilds_per_update must be positive".to_string(),
            ));
        }
        if self.noise.octaves == 0 {
            return Err(VoxelError::InvalidArgument("noise octaves must be positive".to_string()));
        }
        if !(self.noise.frequency > 0.0) {
            return Err(VoxelError::InvalidArgument(format!(
                "noise frequency must be positive, got {}",
                self.noise.frequency
            )));
        }
        if !(self.max_height > 0.0) {
            return Err(VoxelError::InvalidArgument(format!(
                "max_height must be positive, got {}",
                self.max_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "noise": { "seed": 9 } }"#).unwrap();
        assert_eq!(config.noise.seed, 9);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.render_distance, 3);
    }

    #[test]
    fn eviction_radius_below_generation_radius_is_rejected() {
        let result = WorldConfig::from_json_str(r#"{ "render_distance": 4, "clear_distance": 2 }"#);
        assert!(matches!(result, Err(VoxelError::InvalidArgument(_))));
    }

    #[test]
    fn zero_octaves_are_rejected() {
        let mut config = WorldConfig::default();
        config.noise.octaves = 0;
        assert!(config.validate().is_err());
    }
}
