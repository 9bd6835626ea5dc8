//! Horizontal camera follow
//!
//! The camera has no state of its own beyond the offset stored on the world;
//! it is re-derived from the player every tick.

use super::geom::Rect;

/// Camera x for a player position: the player sits a third of the way
/// into the viewport. Not clamped, so it goes negative near the start.
#[inline]
pub fn camera_x(player_x: f64, viewport_width: f64) -> f64 {
    player_x - viewport_width / 3.0
}

/// True once `rect` has drifted fully past the camera's left edge by more
/// than `margin`
#[inline]
pub fn is_behind(rect: &Rect, camera_x: f64, margin: f64) -> bool {
    rect.right() < camera_x - margin
}

/// World x of the viewport's right edge
#[inline]
pub fn right_edge(camera_x: f64, viewport_width: f64) -> f64 {
    camera_x + viewport_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follows_player() {
        assert!((camera_x(1000.0, 800.0) - (1000.0 - 800.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_camera_unclamped_near_start() {
        assert!(camera_x(50.0, 800.0) < 0.0);
    }

    #[test]
    fn test_is_behind() {
        let rect = Rect::new(-300.0, 0.0, 50.0, 10.0);
        assert!(is_behind(&rect, 0.0, 200.0));
        let rect = Rect::new(-250.0, 0.0, 50.0, 10.0);
        // Right edge exactly at the margin is not yet behind
        assert!(!is_behind(&rect, 0.0, 200.0));
    }
}
