use glam::Vec2;

use super::RADIUS;

/// Axis-aligned exclusion zone supplied by a collaborator, in the same
/// coordinate space as the companion's position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Obstacle {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Only active obstacles push the companion.
    pub active: bool,
}

impl Obstacle {
    /// Active obstacle spanning the `min` (top-left) and `max`
    /// (bottom-right) corners.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            left: min.x,
            right: max.x,
            top: min.y,
            bottom: max.y,
            active: true,
        }
    }

    /// An obstacle that never applies.
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Snap `pos` out of the obstacle if the companion's body would overlap it.
///
/// The obstacle is inset by [`RADIUS`] on every side; a center strictly
/// inside the inset rectangle moves to the nearest inset edge. Ties go
/// left, right, top, bottom in that order.
pub fn avoid(pos: Vec2, obstacle: &Obstacle) -> Vec2 {
    if !obstacle.active {
        return pos;
    }

    let left = obstacle.left + RADIUS;
    let right = obstacle.right - RADIUS;
    let top = obstacle.top + RADIUS;
    let bottom = obstacle.bottom - RADIUS;

    let inside = pos.x > left && pos.x < right && pos.y > top && pos.y < bottom;
    if !inside {
        return pos;
    }

    let dist_left = (pos.x - left).abs();
    let dist_right = (right - pos.x).abs();
    let dist_top = (pos.y - top).abs();
    let dist_bottom = (bottom - pos.y).abs();
    let nearest = dist_left.min(dist_right).min(dist_top).min(dist_bottom);

    let mut out = pos;
    if nearest == dist_left {
        out.x = left;
    } else if nearest == dist_right {
        out.x = right;
    } else if nearest == dist_top {
        out.y = top;
    } else {
        out.y = bottom;
    }
    log::debug!("obstacle pushed companion from {pos} to {out}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inset rectangle (480, 520) x (480, 520).
    fn panel() -> Obstacle {
        Obstacle::new(Vec2::new(464.0, 464.0), Vec2::new(536.0, 536.0))
    }

    #[test]
    fn inactive_or_outside_is_untouched() {
        let pos = Vec2::new(500.0, 500.0);
        assert_eq!(avoid(pos, &Obstacle::inactive()), pos);

        let mut hidden = panel();
        hidden.active = false;
        assert_eq!(avoid(pos, &hidden), pos);

        let outside = Vec2::new(100.0, 100.0);
        assert_eq!(avoid(outside, &panel()), outside);
    }

    #[test]
    fn boundary_is_not_inside() {
        let on_edge = Vec2::new(480.0, 500.0);
        assert_eq!(avoid(on_edge, &panel()), on_edge);
        let on_corner = Vec2::new(520.0, 520.0);
        assert_eq!(avoid(on_corner, &panel()), on_corner);
    }

    #[test]
    fn snaps_to_nearest_edge() {
        assert_eq!(avoid(Vec2::new(500.0, 481.0), &panel()), Vec2::new(500.0, 480.0));
        assert_eq!(avoid(Vec2::new(500.0, 518.0), &panel()), Vec2::new(500.0, 520.0));
        assert_eq!(avoid(Vec2::new(483.0, 500.0), &panel()), Vec2::new(480.0, 500.0));
        assert_eq!(avoid(Vec2::new(519.0, 505.0), &panel()), Vec2::new(520.0, 505.0));
    }

    #[test]
    fn corners_map_to_edges() {
        let o = Obstacle::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert_eq!((o.left, o.right, o.top, o.bottom), (10.0, 30.0, 20.0, 40.0));
        assert!(o.active);
        assert!(!Obstacle::inactive().active);
    }

    #[test]
    fn ties_prefer_left_then_right_then_top() {
        // Dead center: every edge is 20 away.
        assert_eq!(avoid(Vec2::new(500.0, 500.0), &panel()), Vec2::new(480.0, 500.0));
        // Right and top tie at 5.
        assert_eq!(avoid(Vec2::new(515.0, 485.0), &panel()), Vec2::new(520.0, 485.0));
        // Top and bottom tie in a thin obstacle, horizontal escape is longer.
        let thin = Obstacle::new(Vec2::new(0.0, 84.0), Vec2::new(400.0, 136.0));
        assert_eq!(avoid(Vec2::new(200.0, 110.0), &thin), Vec2::new(200.0, 100.0));
    }
}
