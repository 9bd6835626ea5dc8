//! World state and core simulation types
//!
//! Everything one session mutates lives in a single [`World`] value owned by
//! the session. Nothing here is shared across threads.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::level;
use crate::tuning::{PlayerTuning, Tuning};

/// Phase of a running world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lives ran out; the world no longer ticks
    GameOver,
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: DVec2,
    pub size: DVec2,
    /// Size to restore when power mode ends
    pub base_size: DVec2,
    pub vel: DVec2,
    pub on_ground: bool,
    pub invincible: bool,
    /// Seconds left of invincibility
    pub invincible_timer: f64,
    pub powered: bool,
    /// Seconds left of power mode
    pub powered_timer: f64,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        let size = DVec2::new(tuning.width, tuning.height);
        Self {
            pos: DVec2::new(tuning.start_x, tuning.start_y),
            size,
            base_size: size,
            vel: DVec2::ZERO,
            on_ground: false,
            invincible: false,
            invincible_timer: 0.0,
            powered: false,
            powered_timer: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    /// Put the player back at the start position with no vertical motion
    pub fn respawn(&mut self, tuning: &PlayerTuning) {
        self.pos = DVec2::new(tuning.start_x, tuning.start_y);
        self.vel.y = 0.0;
    }

    /// Enter power mode. The scale always applies to the base size, so
    /// collecting again before expiry refreshes timers without compounding.
    pub fn power_up(&mut self, scale: f64, duration: f64) {
        self.invincible = true;
        self.invincible_timer = duration;
        self.powered = true;
        self.powered_timer = duration;
        self.size = self.base_size * scale;
    }

    /// Grant invincibility without touching power mode
    pub fn make_invincible(&mut self, duration: f64) {
        self.invincible = true;
        self.invincible_timer = duration;
    }

    /// Count timers down by `dt` seconds. Returns true if power mode expired.
    pub fn tick_timers(&mut self, dt: f64) -> bool {
        if self.invincible {
            self.invincible_timer -= dt;
            if self.invincible_timer <= 0.0 {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }

        if self.powered {
            self.powered_timer -= dt;
            if self.powered_timer <= 0.0 {
                self.powered = false;
                self.powered_timer = 0.0;
                self.size = self.base_size;
                return true;
            }
        }

        false
    }
}

/// Platform kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Contiguous floor tile
    Ground,
    /// Elevated platform, tier 1 (lowest) to 3
    Hovering { tier: u8 },
}

/// A static platform; never changes once generated
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn is_elevated(&self) -> bool {
        matches!(self.kind, PlatformKind::Hovering { .. })
    }
}

/// A grass pickup. `collected` acts as a tombstone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    pub collected: bool,
    /// Bob animation phase (radians, cosmetic)
    pub float_phase: f64,
    /// Phase advance per tick
    pub float_speed: f64,
}

impl Collectible {
    /// Vertical draw offset of the bob animation
    pub fn bob_offset(&self) -> f64 {
        self.float_phase.sin() * 3.0
    }
}

/// The milk bottle power-up (at most one live at a time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub collected: bool,
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub speed: f64,
    /// +1 moving right, -1 moving left
    pub direction: f64,
    pub patrol_start: f64,
    pub patrol_end: f64,
}

impl Enemy {
    /// Move one tick along the patrol, bouncing at either bound (inclusive)
    pub fn patrol(&mut self) {
        self.rect.pos.x += self.speed * self.direction;
        if self.rect.x() <= self.patrol_start || self.rect.x() >= self.patrol_end {
            self.direction = -self.direction;
        }
    }

    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.rect.y() + self.rect.height() / 2.0
    }
}

/// Where an enemy was stomped (cosmetic)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeathMark {
    pub rect: Rect,
}

/// A decorative cloud, recycled once it drifts off the left of the camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub rect: Rect,
    pub speed: f64,
    pub opacity: f64,
}

/// Session counters read by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub grass: u32,
    pub points: u64,
    pub kills: u32,
    pub lives: u32,
}

/// Something the presentation layer should mirror
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GrassCollected { total: u32, score: u64 },
    PowerUpCollected { score: u64 },
    PowerUpExpired,
    EnemyStomped { kills: u32, score: u64 },
    LifeLost { remaining: u32 },
    GameOver { score: u64 },
    LevelExtended { frontier: f64 },
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub grass: Vec<Collectible>,
    pub enemies: Vec<Enemy>,
    pub death_marks: Vec<DeathMark>,
    pub power_up: Option<PowerUp>,
    pub clouds: Vec<Cloud>,
    pub camera_x: f64,
    pub score: Score,
    /// World x up to which ground has been generated
    pub frontier: f64,
    /// Pending notifications for the presentation layer
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl World {
    /// A fully populated world for a fresh session
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut world = Self::empty(seed, tuning);
        level::populate(&mut world);
        world
    }

    /// A world with a player and nothing else (no platforms, enemies or clouds)
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning.player);
        let lives = tuning.player.starting_lives;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player,
            platforms: Vec::new(),
            grass: Vec::new(),
            enemies: Vec::new(),
            death_marks: Vec::new(),
            power_up: None,
            clouds: Vec::new(),
            camera_x: 0.0,
            score: Score {
                lives,
                ..Default::default()
            },
            frontier: 0.0,
            events: Vec::new(),
        }
    }

    /// Distance travelled as shown on the HUD
    pub fn distance(&self) -> u64 {
        (self.player.pos.x.max(0.0) / 10.0).floor() as u64
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
