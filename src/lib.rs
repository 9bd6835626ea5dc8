//! Moo Runner - A side-scrolling endless platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level generation)
//! - `session`: Menu / playing / game-over control surface
//! - `driver`: Frame-driven game loop with injectable scheduler and clock
//! - `render`: Read-only frame view handed to an external renderer
//! - `input`: Key events to per-tick input snapshots
//! - `assets`: Asset readiness gate
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod driver;
pub mod input;
pub mod render;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Session, SessionPhase, StartError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (one display refresh at 60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f64 = 800.0;
    pub const VIEWPORT_HEIGHT: f64 = 400.0;

    /// Per-tick physics (world units per tick)
    pub const GRAVITY: f64 = 1.2;
    pub const JUMP_FORCE: f64 = -18.0;
    pub const MOVE_SPEED: f64 = 12.0;
    /// Fraction of move speed available while airborne
    pub const AIR_CONTROL: f64 = 0.6;
    /// Upward velocity after stomping an enemy
    pub const STOMP_BOUNCE: f64 = -8.0;

    /// Player defaults
    pub const PLAYER_START_X: f64 = 50.0;
    pub const PLAYER_START_Y: f64 = 300.0;
    pub const PLAYER_SIZE: f64 = 60.0;
    pub const POWER_SCALE: f64 = 1.3;
    /// Seconds
    pub const POWER_DURATION: f64 = 10.0;
    pub const RESPAWN_INVINCIBILITY: f64 = 2.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Scoring
    pub const GRASS_POINTS: u64 = 10;
    pub const POWER_UP_POINTS: u64 = 100;
    pub const STOMP_POINTS: u64 = 50;

    /// Ground tiles
    pub const GROUND_Y: f64 = 350.0;
    pub const TILE_WIDTH: f64 = 200.0;
    pub const TILE_HEIGHT: f64 = 50.0;

    /// Hovering platforms
    pub const PLATFORM_WIDTH: f64 = 200.0;
    pub const PLATFORM_HEIGHT: f64 = 20.0;
    pub const TIER_HEIGHTS: [f64; 3] = [250.0, 180.0, 110.0];
    /// Horizontal offset of each tier from the cluster base
    pub const TIER_OFFSETS: [f64; 3] = [0.0, 180.0, 360.0];
}

/// Maximum jump apex in world units for a given impulse and gravity
#[inline]
pub fn max_jump_height(jump_force: f64, gravity: f64) -> f64 {
    jump_force * jump_force / (2.0 * gravity)
}
