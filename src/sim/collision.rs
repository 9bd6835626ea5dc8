//! Collision response between the player and static platforms
//!
//! Platforms are resolved one at a time. Vertical contacts (landing on a top,
//! bumping an underside) are settled first in container order; whatever
//! still overlaps afterwards is pushed out sideways in a second pass. This
//! keeps a player straddling two floor tiles from being shoved sideways by
//! whichever tile happens to come first.

use super::geom::{Rect, overlaps};
use super::state::{Platform, Player};

/// How a single overlap is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Falling onto the top surface
    Landing,
    /// Moving upward into the underside
    Ceiling,
    /// Anything else: pushed out horizontally
    Side,
}

/// Classify an overlap from the player's velocity and relative position
pub fn classify(player: &Player, platform: &Rect) -> Contact {
    if player.vel.y > 0.0 && player.pos.y < platform.y() {
        Contact::Landing
    } else if player.vel.y < 0.0 && player.pos.y > platform.y() {
        Contact::Ceiling
    } else {
        Contact::Side
    }
}

/// Resolve every platform overlapping the player after integration.
///
/// Clears `on_ground` and sets it again only if a landing happened.
pub fn resolve_platforms(player: &mut Player, platforms: &[Platform]) {
    player.on_ground = false;
    let mut sideways: Vec<&Rect> = Vec::new();

    for platform in platforms {
        let rect = &platform.rect;
        if !overlaps(&player.rect(), rect) {
            continue;
        }
        match classify(player, rect) {
            Contact::Landing => {
                player.pos.y = rect.y() - player.size.y;
                player.vel.y = 0.0;
                player.on_ground = true;
            }
            Contact::Ceiling => {
                player.pos.y = rect.bottom();
                player.vel.y = 0.0;
            }
            Contact::Side => sideways.push(rect),
        }
    }

    for rect in sideways {
        if !overlaps(&player.rect(), rect) {
            continue;
        }
        push_out_horizontally(player, rect);
    }
}

/// Move the player out of `rect` against its direction of travel.
/// A player with no horizontal velocity is left where it is.
fn push_out_horizontally(player: &mut Player, rect: &Rect) {
    if player.vel.x > 0.0 {
        player.pos.x = rect.x() - player.size.x;
    } else if player.vel.x < 0.0 {
        player.pos.x = rect.right();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;
    use crate::tuning::PlayerTuning;
    use glam::DVec2;
    use proptest::prelude::*;

    fn player_at(x: f64, y: f64, vel: DVec2) -> Player {
        let mut player = Player::new(&PlayerTuning::default());
        player.pos = DVec2::new(x, y);
        player.vel = vel;
        player
    }

    fn ground(x: f64) -> Platform {
        Platform {
            rect: Rect::new(x, 350.0, 200.0, 50.0),
            kind: PlatformKind::Ground,
        }
    }

    fn hovering(x: f64, y: f64) -> Platform {
        Platform {
            rect: Rect::new(x, y, 200.0, 20.0),
            kind: PlatformKind::Hovering { tier: 1 },
        }
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let mut player = player_at(50.0, 295.0, DVec2::new(0.0, 5.0));
        resolve_platforms(&mut player, &[ground(0.0)]);
        assert_eq!(player.bottom(), 350.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.on_ground);
    }

    #[test]
    fn test_straddling_two_tiles_lands_cleanly() {
        let mut player = player_at(170.0, 292.0, DVec2::new(12.0, 1.2));
        resolve_platforms(&mut player, &[ground(0.0), ground(200.0)]);
        assert_eq!(player.pos.x, 170.0);
        assert_eq!(player.bottom(), 350.0);
        assert!(player.on_ground);
    }

    #[test]
    fn test_ceiling_bump() {
        // Jumping up into a platform at y=250 (bottom 270)
        let mut player = player_at(50.0, 265.0, DVec2::new(0.0, -10.0));
        resolve_platforms(&mut player, &[hovering(0.0, 250.0)]);
        assert_eq!(player.pos.y, 270.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_side_push_right_moving() {
        // Standing still vertically, walking right into a block whose top is above us
        let platform = Platform {
            rect: Rect::new(100.0, 200.0, 50.0, 200.0),
            kind: PlatformKind::Hovering { tier: 1 },
        };
        let mut player = player_at(45.0, 250.0, DVec2::new(12.0, 0.0));
        resolve_platforms(&mut player, &[platform]);
        assert_eq!(player.pos.x, 40.0);
        assert_eq!(player.pos.y, 250.0);
    }

    #[test]
    fn test_side_push_left_moving() {
        let platform = Platform {
            rect: Rect::new(100.0, 200.0, 50.0, 200.0),
            kind: PlatformKind::Hovering { tier: 1 },
        };
        let mut player = player_at(140.0, 250.0, DVec2::new(-12.0, 0.0));
        resolve_platforms(&mut player, &[platform]);
        assert_eq!(player.pos.x, 150.0);
    }

    #[test]
    fn test_walking_off_edge_clears_ground() {
        let mut player = player_at(500.0, 290.0, DVec2::new(12.0, 1.2));
        player.on_ground = true;
        resolve_platforms(&mut player, &[ground(0.0)]);
        assert!(!player.on_ground);
    }

    proptest! {
        #[test]
        fn no_spurious_snapping(
            px in -500.0f64..500.0,
            py in -500.0f64..500.0,
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
        ) {
            let platform = hovering(px, py);
            let mut player = player_at(x, y, DVec2::ZERO);
            prop_assume!(!overlaps(&player.rect(), &platform.rect));

            resolve_platforms(&mut player, &[platform]);
            prop_assert_eq!(player.pos, DVec2::new(x, y));
            prop_assert!(!player.on_ground);
        }

        #[test]
        fn falling_player_lands_on_top(
            px in 0.0f64..1000.0,
            py in 100.0f64..350.0,
            dx in -55.0f64..190.0,
            penetration in 0.1f64..20.0,
            vy in 0.1f64..30.0,
        ) {
            let platform = hovering(px, py);
            let mut player = player_at(px + dx, py - 60.0 + penetration, DVec2::new(0.0, vy));
            prop_assume!(overlaps(&player.rect(), &platform.rect));

            resolve_platforms(&mut player, &[platform]);
            prop_assert!((player.pos.y + player.size.y - py).abs() < 1e-9);
            prop_assert_eq!(player.vel.y, 0.0);
            prop_assert!(player.on_ground);
        }
    }
}
