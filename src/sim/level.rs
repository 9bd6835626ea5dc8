//! Procedural level generation
//!
//! One algorithm, two entry points: [`populate`] builds the opening stretch
//! of a fresh world, [`extend`] appends another segment once the player
//! nears the generated frontier. The world only ever grows to the right.

use std::f64::consts::TAU;

use rand::Rng;
use rand_pcg::Pcg32;

use super::camera;
use super::geom::Rect;
use super::state::{
    Cloud, Collectible, Enemy, GameEvent, Platform, PlatformKind, PowerUp, World,
};
use crate::tuning::{ClusterPlan, GenerationTuning};

/// Clouds scatter over this x range at session start
const CLOUD_SPAWN_X: (f64, f64) = (-500.0, 2500.0);
const CLOUD_Y: (f64, f64) = (20.0, 170.0);
const CLOUD_WIDTH: (f64, f64) = (60.0, 140.0);
const CLOUD_HEIGHT: (f64, f64) = (30.0, 70.0);
const CLOUD_SPEED: (f64, f64) = (0.2, 0.7);
const CLOUD_OPACITY: (f64, f64) = (0.3, 0.7);
/// Recycled clouds reappear up to this far past the right edge
const CLOUD_RESPAWN_JITTER: f64 = 400.0;

/// What one generation pass produced
#[derive(Debug, Clone, Default)]
pub struct Segment {
    pub ground_tiles: usize,
    pub hovering: Vec<Rect>,
    /// First hovering platform eligible to host a power-up
    pub power_up_site: Option<Rect>,
}

/// Build the opening level of a fresh world: ground, clusters, grass,
/// enemies, the first power-up and the cloud layer.
pub fn populate(world: &mut World) {
    let g = world.tuning.generation.clone();
    let segment = generate_segment(world, 0.0, g.initial_tiles, &g.initial_clusters);

    world.power_up = segment.power_up_site.map(|site| power_up_on(&site, &g));
    spawn_clouds(world);

    log::info!(
        "Level populated: {} platforms, {} grass, {} enemies, frontier {}",
        world.platforms.len(),
        world.grass.len(),
        world.enemies.len(),
        world.frontier
    );
}

/// Whether the player is close enough to the frontier to need more level
pub fn needs_extension(world: &World) -> bool {
    world.player.pos.x > world.frontier - world.tuning.generation.extension_lookahead
}

/// Append one more segment past the current frontier
pub fn extend(world: &mut World) {
    let g = world.tuning.generation.clone();
    let start = world.frontier;
    let segment = generate_segment(world, start, g.extension_tiles, &g.extension_clusters);

    if world.power_up.is_none() {
        if let Some(site) = segment.power_up_site {
            world.power_up = Some(power_up_on(&site, &g));
            log::debug!("Power-up placed by extension at x={:.0}", site.x());
        }
    }

    log::info!(
        "Level extended {:.0} -> {:.0} ({} hovering platforms)",
        start,
        world.frontier,
        segment.hovering.len()
    );
    world.push_event(GameEvent::LevelExtended {
        frontier: world.frontier,
    });
}

/// Generate ground tiles starting at `start_x` plus everything that sits
/// on or above them, and advance the frontier.
pub fn generate_segment(
    world: &mut World,
    start_x: f64,
    tiles: u32,
    plan: &ClusterPlan,
) -> Segment {
    let g = world.tuning.generation.clone();
    let end_x = start_x + tiles as f64 * g.tile_width;

    // Floor, one grass per tile
    for i in 0..tiles {
        let x = start_x + i as f64 * g.tile_width;
        let tile = Rect::new(x, g.ground_y, g.tile_width, g.tile_height);
        world.platforms.push(Platform {
            rect: tile,
            kind: PlatformKind::Ground,
        });
        let grass = collectible_above(&mut world.rng, &tile, &g);
        world.grass.push(grass);
    }

    // Ground patrols
    for tile in (g.ground_enemy_first_tile..tiles).step_by(g.ground_enemy_stride as usize) {
        let tile_x = start_x + tile as f64 * g.tile_width;
        world.enemies.push(Enemy {
            rect: Rect::new(
                tile_x + g.tile_width / 2.0,
                g.ground_y - g.enemy_size,
                g.enemy_size,
                g.enemy_size,
            ),
            speed: g.ground_enemy_speed,
            direction: -1.0,
            patrol_start: tile_x,
            patrol_end: tile_x + g.ground_enemy_patrol,
        });
    }

    // Elevated clusters, each tier reachable from the one below
    let mut hovering = Vec::new();
    let mut base = start_x + plan.first_offset;
    while base < end_x {
        if world.rng.random_bool(plan.chance) {
            for tier in 0..3 {
                if tier > 0 && !world.rng.random_bool(g.tier_chances[tier - 1]) {
                    break;
                }
                let rect = Rect::new(
                    base + g.tier_offsets[tier],
                    g.tier_heights[tier],
                    g.platform_width,
                    g.platform_height,
                );
                world.platforms.push(Platform {
                    rect,
                    kind: PlatformKind::Hovering {
                        tier: tier as u8 + 1,
                    },
                });
                let grass = collectible_above(&mut world.rng, &rect, &g);
                world.grass.push(grass);
                hovering.push(rect);
            }
        }
        base += plan.stride;
    }

    // Patrols on a share of the hovering platforms
    for (index, rect) in hovering.iter().enumerate() {
        if index % g.platform_enemy_every == 0 {
            let direction = random_direction(&mut world.rng);
            world.enemies.push(Enemy {
                rect: Rect::new(
                    rect.x() + 30.0,
                    rect.y() - g.enemy_size,
                    g.enemy_size,
                    g.enemy_size,
                ),
                speed: g.platform_enemy_speed,
                direction,
                patrol_start: rect.x() + 10.0,
                patrol_end: rect.right() - 80.0,
            });
        }
    }

    // Power-up eligible platforms, guarded by a pack around them
    let mut power_up_site = None;
    for (index, rect) in hovering.iter().enumerate() {
        if index == 0 || index % g.power_up_every != 0 {
            continue;
        }
        if power_up_site.is_none() {
            power_up_site = Some(*rect);
        }

        for j in 0..g.power_up_guards {
            let near = hovering.get(index + j - 1).unwrap_or(rect);
            let direction = random_direction(&mut world.rng);
            world.enemies.push(Enemy {
                rect: Rect::new(
                    near.x() + 20.0,
                    near.y() - g.enemy_size,
                    g.enemy_size,
                    g.enemy_size,
                ),
                speed: g.platform_enemy_speed,
                direction,
                patrol_start: near.x(),
                patrol_end: near.right() - 35.0,
            });
        }
    }

    world.frontier = world.frontier.max(end_x);

    Segment {
        ground_tiles: tiles as usize,
        hovering,
        power_up_site,
    }
}

/// Place the next power-up on a random elevated platform ahead of the
/// player. Leaves the slot empty if no platform is in the window.
pub fn place_next_power_up(world: &mut World) -> bool {
    let g = world.tuning.generation.clone();
    let next_x =
        world.player.pos.x + g.power_up_min_ahead + world.rng.random::<f64>() * g.power_up_ahead_jitter;

    let sites: Vec<Rect> = world
        .platforms
        .iter()
        .filter(|p| p.is_elevated())
        .map(|p| p.rect)
        .filter(|r| r.x() > next_x && r.x() < next_x + g.power_up_window)
        .collect();

    if sites.is_empty() {
        log::debug!("No power-up site in ({:.0}, {:.0})", next_x, next_x + g.power_up_window);
        world.power_up = None;
        return false;
    }

    let site = sites[world.rng.random_range(0..sites.len())];
    world.power_up = Some(power_up_on(&site, &g));
    log::debug!("Next power-up at x={:.0}", site.x());
    true
}

/// Scatter the decorative cloud layer
pub fn spawn_clouds(world: &mut World) {
    let count = world.tuning.generation.cloud_count;
    world.clouds.clear();
    for _ in 0..count {
        let x = uniform(&mut world.rng, CLOUD_SPAWN_X);
        let mut cloud = Cloud {
            rect: Rect::default(),
            speed: 0.0,
            opacity: 0.0,
        };
        reshape_cloud(&mut cloud, &mut world.rng, x);
        world.clouds.push(cloud);
    }
}

/// Move a cloud that left the screen back in ahead of the camera with a
/// fresh shape, speed and opacity
pub fn recycle_cloud(cloud: &mut Cloud, rng: &mut Pcg32, camera_x: f64, viewport_width: f64) {
    let x = camera::right_edge(camera_x, viewport_width) + rng.random::<f64>() * CLOUD_RESPAWN_JITTER;
    reshape_cloud(cloud, rng, x);
}

fn reshape_cloud(cloud: &mut Cloud, rng: &mut Pcg32, x: f64) {
    let y = uniform(rng, CLOUD_Y);
    let width = uniform(rng, CLOUD_WIDTH);
    let height = uniform(rng, CLOUD_HEIGHT);
    cloud.rect = Rect::new(x, y, width, height);
    cloud.speed = uniform(rng, CLOUD_SPEED);
    cloud.opacity = uniform(rng, CLOUD_OPACITY);
}

/// A grass item centered over `surface`
fn collectible_above(rng: &mut Pcg32, surface: &Rect, g: &GenerationTuning) -> Collectible {
    let size = g.collectible_size;
    Collectible {
        rect: Rect::new(
            surface.x() + surface.width() / 2.0 - size / 2.0,
            surface.y() - g.collectible_hover,
            size,
            size,
        ),
        collected: false,
        float_phase: rng.random::<f64>() * TAU,
        float_speed: g.float_speed_min + rng.random::<f64>() * (g.float_speed_max - g.float_speed_min),
    }
}

/// A power-up resting centered on `site`
fn power_up_on(site: &Rect, g: &GenerationTuning) -> PowerUp {
    PowerUp {
        rect: Rect::new(
            site.x() + site.width() / 2.0 - g.power_up_width / 2.0,
            site.y() - g.power_up_height,
            g.power_up_width,
            g.power_up_height,
        ),
        collected: false,
    }
}

fn random_direction(rng: &mut Pcg32) -> f64 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

#[inline]
fn uniform(rng: &mut Pcg32, (lo, hi): (f64, f64)) -> f64 {
    lo + rng.random::<f64>() * (hi - lo)
}
