//! Fixed timestep simulation tick
//!
//! Advances a [`World`] by one frame. The order of the steps matters and is
//! part of the game's feel: movement, collision, camera, pickups, level
//! extension, timers, power-up, enemies, clouds.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::camera;
use super::collision::resolve_platforms;
use super::geom::overlaps;
use super::level;
use super::state::{DeathMark, GameEvent, GamePhase, World};

/// Clouds are recycled once their right edge is this far past the camera
const CLOUD_CULL_MARGIN: f64 = 200.0;

/// Held input for a single tick (sampled once per frame)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

/// Advance the world by one tick. `dt` is the frame time in seconds and only
/// drives the power-up and invincibility timers; movement is per tick.
pub fn tick(world: &mut World, input: &TickInput, dt: f64) {
    if world.phase != GamePhase::Playing {
        return;
    }
    world.time_ticks += 1;

    move_player(world, input);
    resolve_platforms(&mut world.player, &world.platforms);
    apply_bounds(world);

    world.camera_x = camera::camera_x(world.player.pos.x, world.tuning.viewport.width);

    collect_grass(world);
    if level::needs_extension(world) {
        level::extend(world);
    }

    if world.player.tick_timers(dt) {
        log::debug!("Power mode expired");
        world.push_event(GameEvent::PowerUpExpired);
    }

    collect_power_up(world);
    update_enemies(world);
    if world.phase == GamePhase::GameOver {
        return;
    }

    update_clouds(world);
    animate_grass(world);
}

/// Input to velocity, jump impulse, gravity and integration
fn move_player(world: &mut World, input: &TickInput) {
    let physics = &world.tuning.physics;
    let player = &mut world.player;

    let speed = if player.on_ground {
        physics.move_speed
    } else {
        physics.move_speed * physics.air_control
    };
    player.vel.x = if input.move_left {
        -speed
    } else if input.move_right {
        speed
    } else {
        0.0
    };

    if input.jump && player.on_ground {
        player.vel.y = physics.jump_force;
        player.on_ground = false;
    }

    player.vel.y += physics.gravity;
    player.pos += player.vel;
}

/// Keep the player right of the world origin; falling out of the viewport
/// respawns at the start without costing a life
fn apply_bounds(world: &mut World) {
    let player = &mut world.player;
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
    }
    if player.pos.y > world.tuning.viewport.height {
        log::debug!("Fell out of the world at x={:.0}", player.pos.x);
        player.respawn(&world.tuning.player);
    }
}

fn collect_grass(world: &mut World) {
    let player = world.player.rect();
    let points = world.tuning.scoring.grass;
    let mut picked = 0;

    for grass in world.grass.iter_mut() {
        if !grass.collected && overlaps(&player, &grass.rect) {
            grass.collected = true;
            picked += 1;
        }
    }

    for _ in 0..picked {
        world.score.grass += 1;
        world.score.points += points;
        world.push_event(GameEvent::GrassCollected {
            total: world.score.grass,
            score: world.score.points,
        });
    }
}

fn collect_power_up(world: &mut World) {
    let player = world.player.rect();
    let Some(power_up) = world.power_up.as_mut() else {
        return;
    };
    if power_up.collected || !overlaps(&player, &power_up.rect) {
        return;
    }
    power_up.collected = true;

    let tuning = &world.tuning;
    world.score.points += tuning.scoring.power_up;
    world
        .player
        .power_up(tuning.player.power_scale, tuning.player.power_duration);
    log::debug!("Power-up collected at x={:.0}", world.player.pos.x);
    world.push_event(GameEvent::PowerUpCollected {
        score: world.score.points,
    });

    level::place_next_power_up(world);
}

/// Patrol every enemy and settle contact with the player: a stomp from
/// above kills the enemy, anything else costs a life.
fn update_enemies(world: &mut World) {
    let mut i = 0;
    while i < world.enemies.len() {
        world.enemies[i].patrol();

        let enemy = &world.enemies[i];
        let player = &world.player;
        if player.invincible || !overlaps(&player.rect(), &enemy.rect) {
            i += 1;
            continue;
        }

        if player.vel.y > 0.0 && player.bottom() < enemy.mid_y() {
            let enemy = world.enemies.remove(i);
            world.death_marks.push(DeathMark { rect: enemy.rect });
            world.score.points += world.tuning.scoring.stomp;
            world.score.kills += 1;
            world.player.vel.y = world.tuning.physics.stomp_bounce;
            log::debug!("Enemy stomped at x={:.0}", enemy.rect.x());
            world.push_event(GameEvent::EnemyStomped {
                kills: world.score.kills,
                score: world.score.points,
            });
            continue;
        }

        world.score.lives = world.score.lives.saturating_sub(1);
        world.push_event(GameEvent::LifeLost {
            remaining: world.score.lives,
        });

        if world.score.lives == 0 {
            world.phase = GamePhase::GameOver;
            log::info!(
                "Game over: score {}, grass {}, kills {}, distance {}",
                world.score.points,
                world.score.grass,
                world.score.kills,
                world.distance()
            );
            world.push_event(GameEvent::GameOver {
                score: world.score.points,
            });
            return;
        }

        log::debug!("Life lost, {} remaining", world.score.lives);
        let tuning = &world.tuning.player;
        world.player.respawn(tuning);
        world.player.make_invincible(tuning.respawn_invincibility);
        i += 1;
    }
}

fn update_clouds(world: &mut World) {
    let camera_x = world.camera_x;
    let viewport_width = world.tuning.viewport.width;
    for cloud in world.clouds.iter_mut() {
        cloud.rect.pos.x -= cloud.speed;
        if camera::is_behind(&cloud.rect, camera_x, CLOUD_CULL_MARGIN) {
            level::recycle_cloud(cloud, &mut world.rng, camera_x, viewport_width);
        }
    }
}

/// Advance the cosmetic bob of grass still waiting to be collected
fn animate_grass(world: &mut World) {
    for grass in world.grass.iter_mut().filter(|g| !g.collected) {
        grass.float_phase = (grass.float_phase + grass.float_speed) % TAU;
    }
}
