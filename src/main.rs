//! Moo Runner headless runner
//!
//! Plays seeded runs without a display: an autopilot holds right and hops
//! over wolves, frames are pumped through the regular game loop, and the
//! HUD is logged periodically.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use moo_runner::assets::AssetGate;
use moo_runner::driver::{FrameOutcome, GameLoop, ManualClock, ManualScheduler};
use moo_runner::render::HeadlessRenderer;
use moo_runner::sim::{GameEvent, TickInput, World};
use moo_runner::{Session, Tuning};

#[derive(Parser, Debug)]
#[command(about = "Run Moo Runner headless with an autopilot", version)]
struct Args {
    /// Seed for the first run; later runs use seed + n
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frame cap per run
    #[arg(long, default_value_t = 60 * 120)]
    frames: u64,
    /// Runs to play back to back
    #[arg(long, default_value_t = 1)]
    runs: u32,
    /// JSON tuning file (defaults apply to missing fields)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Log the HUD every N frames (0 = never)
    #[arg(long, default_value_t = 300)]
    log_every: u64,
}

/// Distance ahead of the player at which a wolf triggers a hop
const HOP_RANGE: f64 = 160.0;

fn autopilot(world: &World) -> TickInput {
    let player = &world.player;
    let front = player.pos.x + player.size.x;
    let threat = world.enemies.iter().any(|enemy| {
        let gap = enemy.rect.x() - front;
        gap > 0.0 && gap < HOP_RANGE && enemy.rect.bottom() > player.pos.y
    });
    TickInput {
        move_left: false,
        move_right: true,
        jump: threat,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Moo Runner (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut session = Session::new(tuning, AssetGate::ready());
    let mut game_loop = GameLoop::new(ManualScheduler::new(), ManualClock::new(1000.0 / 60.0));

    for run in 0..args.runs {
        let seed = args.seed.wrapping_add(u64::from(run));
        session.start(seed)?;
        game_loop.sync(&session);

        let mut renderer = HeadlessRenderer::new(args.log_every);
        let mut stomps = 0u32;
        let mut power_ups = 0u32;

        while renderer.frames < args.frames {
            let input = session.world().map(autopilot).unwrap_or_default();
            let outcome = game_loop.pump(&mut session, &input, &mut renderer);

            if let Some(world) = session.world_mut() {
                for event in world.drain_events() {
                    match event {
                        GameEvent::EnemyStomped { .. } => stomps += 1,
                        GameEvent::PowerUpCollected { .. } => power_ups += 1,
                        GameEvent::LifeLost { remaining } => {
                            log::info!("Life lost, {} remaining", remaining)
                        }
                        _ => {}
                    }
                }
            }

            if matches!(outcome, FrameOutcome::Stopped(_) | FrameOutcome::Idle) {
                break;
            }
        }
        game_loop.stop();

        if let Some(hud) = renderer.last_hud {
            println!(
                "run {} (seed {}): {} frames, score {}, grass {}, kills {}, lives {}, distance {}m, stomps {}, power-ups {}{}",
                run + 1,
                seed,
                renderer.frames,
                hud.score,
                hud.grass,
                hud.kills,
                hud.lives,
                hud.distance,
                stomps,
                power_ups,
                if session.is_playing() { "" } else { " [game over]" }
            );
        }
    }

    Ok(())
}
