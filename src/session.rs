//! Session control: menu -> playing -> game over -> playing ...
//!
//! A session owns at most one [`World`]. Starting (or restarting) throws the
//! old world away and builds a fresh one; game over is entered from inside
//! the simulation when the last life is lost.

use thiserror::Error;

use crate::assets::{AssetGate, AssetId};
use crate::sim::{self, GamePhase, TickInput, World};
use crate::tuning::Tuning;

/// Session-level state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Title screen, no world yet
    Menu,
    Playing,
    GameOver,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("assets still loading: {0:?}")]
    AssetsNotReady(Vec<AssetId>),
    #[error("assets failed to load: {0:?}")]
    AssetsFailed(Vec<AssetId>),
}

pub struct Session {
    tuning: Tuning,
    assets: AssetGate,
    world: Option<World>,
    runs: u32,
}

impl Session {
    pub fn new(tuning: Tuning, assets: AssetGate) -> Self {
        Self {
            tuning,
            assets,
            world: None,
            runs: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.world {
            None => SessionPhase::Menu,
            Some(world) => match world.phase {
                GamePhase::Playing => SessionPhase::Playing,
                GamePhase::GameOver => SessionPhase::GameOver,
            },
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase() == SessionPhase::Playing
    }

    /// Build a fresh world and enter `Playing`. Refused until every asset
    /// has loaded.
    pub fn start(&mut self, seed: u64) -> Result<(), StartError> {
        let failed = self.assets.failed();
        if !failed.is_empty() {
            log::warn!("Refusing to start: {} asset(s) failed", failed.len());
            return Err(StartError::AssetsFailed(failed));
        }
        if !self.assets.is_ready() {
            let pending = self.assets.pending();
            log::warn!("Refusing to start: {} asset(s) pending", pending.len());
            return Err(StartError::AssetsNotReady(pending));
        }

        self.world = Some(World::new(seed, self.tuning.clone()));
        self.runs += 1;
        log::info!("Run {} started with seed {}", self.runs, seed);
        Ok(())
    }

    /// Advance the world one tick if playing. Returns the phase afterwards.
    pub fn tick(&mut self, input: &TickInput, dt: f64) -> SessionPhase {
        if let Some(world) = self.world.as_mut() {
            sim::tick(world, input, dt);
        }
        self.phase()
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn assets(&self) -> &AssetGate {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetGate {
        &mut self.assets
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Number of runs started in this session
    pub fn runs(&self) -> u32 {
        self.runs
    }
}
