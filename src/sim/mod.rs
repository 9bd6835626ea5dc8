//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, fixed per-tick physics
//! - Seeded RNG only
//! - Stable iteration order (container order)
//! - No rendering, input or asset dependencies

pub mod camera;
pub mod collision;
pub mod geom;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Contact, resolve_platforms};
pub use geom::{Rect, overlaps};
pub use state::{
    Cloud, Collectible, DeathMark, Enemy, GameEvent, GamePhase, Platform, PlatformKind, Player,
    PowerUp, Score, World,
};
pub use tick::{TickInput, tick};
