//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can override any
//! subset of them. Missing fields fall back to the defaults in [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::max_jump_height;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Viewport (canvas) dimensions in world units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportTuning {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Per-tick movement physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f64,
    pub jump_force: f64,
    pub move_speed: f64,
    pub air_control: f64,
    pub stomp_bounce: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            move_speed: MOVE_SPEED,
            air_control: AIR_CONTROL,
            stomp_bounce: STOMP_BOUNCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_x: f64,
    pub start_y: f64,
    pub width: f64,
    pub height: f64,
    pub power_scale: f64,
    /// Seconds of power mode (and invincibility) granted by a power-up
    pub power_duration: f64,
    /// Seconds of invincibility after losing a life
    pub respawn_invincibility: f64,
    pub starting_lives: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_x: PLAYER_START_X,
            start_y: PLAYER_START_Y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            power_scale: POWER_SCALE,
            power_duration: POWER_DURATION,
            respawn_invincibility: RESPAWN_INVINCIBILITY,
            starting_lives: STARTING_LIVES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub grass: u64,
    pub power_up: u64,
    pub stomp: u64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            grass: GRASS_POINTS,
            power_up: POWER_UP_POINTS,
            stomp: STOMP_POINTS,
        }
    }
}

/// How elevated clusters are scattered over a generated segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterPlan {
    /// Distance between candidate cluster bases
    pub stride: f64,
    /// Offset of the first candidate from the segment start
    pub first_offset: f64,
    /// Chance a candidate becomes a cluster
    pub chance: f64,
}

impl Default for ClusterPlan {
    fn default() -> Self {
        Self {
            stride: 1000.0,
            first_offset: 1000.0,
            chance: 0.6,
        }
    }
}

/// Level generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    pub ground_y: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    pub initial_tiles: u32,
    pub extension_tiles: u32,
    /// Extend once the player is this close to the generated frontier
    pub extension_lookahead: f64,

    pub platform_width: f64,
    pub platform_height: f64,
    pub tier_heights: [f64; 3],
    pub tier_offsets: [f64; 3],
    /// Chance of tier 2 given tier 1, and of tier 3 given tier 2
    pub tier_chances: [f64; 2],
    pub initial_clusters: ClusterPlan,
    pub extension_clusters: ClusterPlan,

    pub collectible_size: f64,
    /// Gap between a hovering platform top and its collectible
    pub collectible_hover: f64,
    pub float_speed_min: f64,
    pub float_speed_max: f64,

    pub enemy_size: f64,
    pub ground_enemy_speed: f64,
    pub platform_enemy_speed: f64,
    /// Ground enemies appear every N tiles...
    pub ground_enemy_stride: u32,
    /// ...starting at this tile of the segment
    pub ground_enemy_first_tile: u32,
    pub ground_enemy_patrol: f64,
    /// Every Nth hovering platform of a pass gets a patrolling enemy
    pub platform_enemy_every: usize,
    /// Every Nth hovering platform (index > 0) is power-up eligible
    pub power_up_every: usize,
    pub power_up_guards: usize,

    pub power_up_width: f64,
    pub power_up_height: f64,
    /// Re-placement window: player.x + min_ahead + rand * ahead_jitter
    pub power_up_min_ahead: f64,
    pub power_up_ahead_jitter: f64,
    pub power_up_window: f64,

    pub cloud_count: usize,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            ground_y: GROUND_Y,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            initial_tiles: 150,
            extension_tiles: 30,
            extension_lookahead: 2000.0,

            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            tier_heights: TIER_HEIGHTS,
            tier_offsets: TIER_OFFSETS,
            tier_chances: [0.7, 0.5],
            initial_clusters: ClusterPlan::default(),
            extension_clusters: ClusterPlan {
                stride: 400.0,
                first_offset: 0.0,
                chance: 0.4,
            },

            collectible_size: 25.0,
            collectible_hover: 40.0,
            float_speed_min: 0.05,
            float_speed_max: 0.08,

            enemy_size: 70.0,
            ground_enemy_speed: 1.0,
            platform_enemy_speed: 1.5,
            ground_enemy_stride: 6,
            ground_enemy_first_tile: 2,
            ground_enemy_patrol: 120.0,
            platform_enemy_every: 3,
            power_up_every: 5,
            power_up_guards: 3,

            power_up_width: 30.0,
            power_up_height: 40.0,
            power_up_min_ahead: 2000.0,
            power_up_ahead_jitter: 1000.0,
            power_up_window: 1500.0,

            cloud_count: 15,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: ViewportTuning,
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub scoring: ScoringTuning,
    pub generation: GenerationTuning,
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Highest rise the player can clear with one jump
    pub fn max_jump_height(&self) -> f64 {
        max_jump_height(self.physics.jump_force, self.physics.gravity)
    }

    /// Check internal consistency, most importantly that every tier of a
    /// cluster stays reachable from the one below it.
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        let g = &self.generation;

        if p.gravity <= 0.0 {
            return Err(TuningError::Invalid("gravity must be positive".into()));
        }
        if p.jump_force >= 0.0 {
            return Err(TuningError::Invalid("jump_force must be negative (upward)".into()));
        }
        if self.player.width <= 0.0 || self.player.height <= 0.0 {
            return Err(TuningError::Invalid("player size must be positive".into()));
        }
        if g.tile_width <= 0.0 || g.platform_width <= 0.0 {
            return Err(TuningError::Invalid("tile and platform widths must be positive".into()));
        }
        if g.initial_clusters.stride <= 0.0 || g.extension_clusters.stride <= 0.0 {
            return Err(TuningError::Invalid("cluster strides must be positive".into()));
        }
        if g.extension_tiles == 0 {
            return Err(TuningError::Invalid("extension_tiles must be at least 1".into()));
        }
        if g.float_speed_min > g.float_speed_max {
            return Err(TuningError::Invalid("float_speed_min exceeds float_speed_max".into()));
        }
        if g.platform_enemy_every == 0 || g.power_up_every == 0 || g.ground_enemy_stride == 0 {
            return Err(TuningError::Invalid("enemy and power-up intervals must be non-zero".into()));
        }

        let chances = [
            g.initial_clusters.chance,
            g.extension_clusters.chance,
            g.tier_chances[0],
            g.tier_chances[1],
        ];
        if chances.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(TuningError::Invalid("probabilities must lie in [0, 1]".into()));
        }

        let apex = self.max_jump_height();
        let mut floor = g.ground_y;
        for (tier, &top) in g.tier_heights.iter().enumerate() {
            let rise = floor - top;
            if rise >= apex {
                return Err(TuningError::Invalid(format!(
                    "tier {} rises {rise} above the surface below, max jump is {apex:.1}",
                    tier + 1
                )));
            }
            floor = top;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!((tuning.max_jump_height() - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "physics": { "move_speed": 8.0 } }"#).unwrap();
        assert_eq!(tuning.physics.move_speed, 8.0);
        assert_eq!(tuning.physics.gravity, GRAVITY);
        assert_eq!(tuning.generation.initial_tiles, 150);
    }

    #[test]
    fn test_unreachable_tier_rejected() {
        let json = r#"{ "generation": { "tier_heights": [250.0, 100.0, 50.0] } }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
        assert!(err.to_string().contains("tier 2"));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let json = r#"{ "generation": { "tier_chances": [1.5, 0.5] } }"#;
        assert!(matches!(Tuning::from_json(json), Err(TuningError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }
}
