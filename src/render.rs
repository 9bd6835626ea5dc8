//! Read-only frame view for an external renderer
//!
//! The simulation never draws. Each frame the driver hands a [`FrameView`]
//! (entity lists, camera offset, HUD counters) to whatever implements
//! [`Renderer`].

use serde::Serialize;

use crate::sim::{Cloud, Collectible, DeathMark, Enemy, Platform, Player, PowerUp, World};

/// HUD counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub grass: u32,
    pub kills: u32,
    pub lives: u32,
    pub distance: u64,
    pub invincible: bool,
    pub powered: bool,
}

/// Which way the player sprite should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Facing {
    Left,
    Right,
}

/// Everything needed to paint one frame, borrowed from the world
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameView<'a> {
    pub camera_x: f64,
    pub viewport: (f64, f64),
    pub player: &'a Player,
    pub facing: Facing,
    pub platforms: &'a [Platform],
    pub grass: &'a [Collectible],
    pub enemies: &'a [Enemy],
    pub death_marks: &'a [DeathMark],
    pub power_up: Option<&'a PowerUp>,
    pub clouds: &'a [Cloud],
    pub hud: Hud,
}

impl<'a> FrameView<'a> {
    pub fn new(world: &'a World) -> Self {
        let player = &world.player;
        Self {
            camera_x: world.camera_x,
            viewport: (world.tuning.viewport.width, world.tuning.viewport.height),
            player,
            facing: if player.vel.x < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            },
            platforms: &world.platforms,
            grass: &world.grass,
            enemies: &world.enemies,
            death_marks: &world.death_marks,
            power_up: world.power_up.as_ref().filter(|p| !p.collected),
            clouds: &world.clouds,
            hud: Hud {
                score: world.score.points,
                grass: world.score.grass,
                kills: world.score.kills,
                lives: world.score.lives,
                distance: world.distance(),
                invincible: player.invincible,
                powered: player.powered,
            },
        }
    }

    /// Grass still waiting to be collected
    pub fn visible_grass(&self) -> impl Iterator<Item = &'a Collectible> + 'a {
        self.grass.iter().filter(|g| !g.collected)
    }
}

/// Paints frames. Implemented by the host's drawing layer.
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>);
}

/// Renderer that draws nothing and logs the HUD every `log_every` frames
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub log_every: u64,
    pub last_hud: Option<Hud>,
}

impl HeadlessRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            frames: 0,
            log_every,
            last_hud: None,
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        self.last_hud = Some(frame.hud);
        if self.log_every > 0 && self.frames % self.log_every == 0 {
            let hud = frame.hud;
            log::info!(
                "frame {}: score {} grass {} kills {} lives {} distance {}m",
                self.frames,
                hud.score,
                hud.grass,
                hud.kills,
                hud.lives,
                hud.distance
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_frame_view_mirrors_world() {
        let mut world = World::new(5, Tuning::default());
        world.player.pos.x = 1234.0;
        world.player.vel.x = -12.0;
        world.score.points = 70;

        let view = FrameView::new(&world);
        assert_eq!(view.hud.distance, 123);
        assert_eq!(view.hud.score, 70);
        assert_eq!(view.hud.lives, 3);
        assert_eq!(view.facing, Facing::Left);
        assert_eq!(view.platforms.len(), world.platforms.len());
        assert_eq!(view.visible_grass().count(), world.grass.len());
        assert_eq!(view.viewport, (800.0, 400.0));
    }

    #[test]
    fn test_collected_power_up_hidden() {
        let mut world = World::new(5, Tuning::default());
        if let Some(p) = world.power_up.as_mut() {
            p.collected = true;
        }
        assert!(FrameView::new(&world).power_up.is_none());
    }

    #[test]
    fn test_frame_view_serializes() {
        let world = World::empty(5, Tuning::default());
        let json = serde_json::to_string(&FrameView::new(&world)).unwrap();
        assert!(json.contains("\"hud\""));
    }

    #[test]
    fn test_headless_renderer_counts_frames() {
        let world = World::empty(5, Tuning::default());
        let mut renderer = HeadlessRenderer::new(0);
        renderer.render(&FrameView::new(&world));
        renderer.render(&FrameView::new(&world));
        assert_eq!(renderer.frames, 2);
        assert_eq!(renderer.last_hud.unwrap().lives, 3);
    }
}
