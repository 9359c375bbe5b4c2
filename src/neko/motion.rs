use glam::Vec2;

use super::atlas::SpriteState;
use super::{CompanionState, Viewport, RADIUS};

/// Distance covered per tick while moving.
pub const SPEED: f32 = 10.0;
/// Closer than this to the pointer the companion idles.
pub const IDLE_DISTANCE: f32 = 48.0;
/// Normalized displacement beyond which an axis counts toward the heading.
const AXIS_THRESHOLD: f32 = 0.5;
/// Idle ticks are capped here before the alert countdown.
const ALERT_IDLE_CAP: u32 = 7;

/// What the companion does this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Close enough to the pointer, stay put.
    Idle,
    /// Pointer left after a rest: flinch in place for a tick.
    Alert,
    /// Step toward the pointer. `candidate` has not been checked against
    /// obstacles or the viewport yet.
    Moving { heading: SpriteState, candidate: Vec2 },
}

pub fn decide(state: &CompanionState, pointer: Vec2) -> Motion {
    let diff = state.position - pointer;
    let distance = diff.length();

    if distance < SPEED || distance < IDLE_DISTANCE {
        return Motion::Idle;
    }

    if state.idle_ticks > 1 {
        return Motion::Alert;
    }

    // distance >= IDLE_DISTANCE here, so the division is safe.
    let heading = SpriteState::from_name(&direction(diff, distance)).unwrap_or(SpriteState::Idle);
    let candidate = state.position - diff / distance * SPEED;
    Motion::Moving { heading, candidate }
}

/// Compass heading for a displacement of `diff = position - pointer`.
///
/// Built in N, S, W, E order, so diagonals come out as "NW", "SE" etc. An
/// empty string means no axis dominates.
pub fn direction(diff: Vec2, distance: f32) -> String {
    let nx = diff.x / distance;
    let ny = diff.y / distance;

    let mut heading = String::with_capacity(2);
    if ny > AXIS_THRESHOLD {
        heading.push('N');
    }
    if ny < -AXIS_THRESHOLD {
        heading.push('S');
    }
    if nx > AXIS_THRESHOLD {
        heading.push('W');
    }
    if nx < -AXIS_THRESHOLD {
        heading.push('E');
    }
    heading
}

/// Idle-tick counter after an alert tick.
pub fn alert_countdown(idle_ticks: u32) -> u32 {
    idle_ticks.min(ALERT_IDLE_CAP).saturating_sub(1)
}

/// Keep the companion's body fully inside the viewport.
///
/// Uses max-then-min instead of `clamp` so a viewport narrower than the
/// body pins to the far edge instead of panicking.
pub fn clamp_to_viewport(pos: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        pos.x.max(RADIUS).min(viewport.width - RADIUS),
        pos.y.max(RADIUS).min(viewport.height - RADIUS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> CompanionState {
        CompanionState::new(Vec2::new(x, y))
    }

    #[test]
    fn close_pointer_is_idle() {
        let state = at(100.0, 100.0);
        for d in [0.0, 5.0, 9.99, 10.0, 30.0, 47.9] {
            assert_eq!(decide(&state, Vec2::new(100.0 + d, 100.0)), Motion::Idle, "d={d}");
        }
    }

    #[test]
    fn far_pointer_after_rest_is_alert() {
        let mut state = at(100.0, 100.0);
        state.idle_ticks = 2;
        assert_eq!(decide(&state, Vec2::new(100.0, 400.0)), Motion::Alert);

        state.idle_ticks = 1;
        assert!(matches!(decide(&state, Vec2::new(100.0, 400.0)), Motion::Moving { .. }));
    }

    #[test]
    fn pointer_above_heads_north() {
        let state = at(100.0, 100.0);
        let motion = decide(&state, Vec2::new(100.0, 0.0));
        assert_eq!(
            motion,
            Motion::Moving {
                heading: SpriteState::N,
                candidate: Vec2::new(100.0, 90.0)
            }
        );
    }

    #[test]
    fn direction_strings() {
        let cases = [
            (Vec2::new(0.0, -100.0), "S"),
            (Vec2::new(-100.0, 0.0), "E"),
            (Vec2::new(100.0, 0.0), "W"),
            (Vec2::new(0.0, 100.0), "N"),
            (Vec2::new(100.0, 100.0), "NW"),
            (Vec2::new(-100.0, 100.0), "NE"),
            (Vec2::new(100.0, -100.0), "SW"),
            (Vec2::new(-100.0, -100.0), "SE"),
        ];
        for (diff, want) in cases {
            assert_eq!(direction(diff, diff.length()), want, "diff={diff}");
        }
    }

    #[test]
    fn exact_half_is_not_past_the_threshold() {
        // ny == 0.5 exactly: neither N nor S.
        assert_eq!(direction(Vec2::new(0.0, 50.0), 100.0), "");
        assert_eq!(direction(Vec2::new(-50.0, 0.0), 100.0), "");
    }

    #[test]
    fn empty_heading_falls_back_to_idle_sprite() {
        let heading = direction(Vec2::new(1.0, 1.0), 2.0);
        assert_eq!(heading, "");
        assert_eq!(
            SpriteState::from_name(&heading).unwrap_or(SpriteState::Idle),
            SpriteState::Idle
        );
    }

    #[test]
    fn countdown_caps_at_seven() {
        assert_eq!(alert_countdown(2), 1);
        assert_eq!(alert_countdown(5), 4);
        assert_eq!(alert_countdown(7), 6);
        assert_eq!(alert_countdown(500), 6);
    }

    #[test]
    fn clamp_keeps_body_on_screen() {
        let view = Viewport::new(800.0, 600.0);
        assert_eq!(clamp_to_viewport(Vec2::new(-5.0, 700.0), view), Vec2::new(16.0, 584.0));
        assert_eq!(clamp_to_viewport(Vec2::new(400.0, 300.0), view), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn clamp_survives_degenerate_viewport() {
        let tiny = Viewport::new(20.0, 10.0);
        let pos = clamp_to_viewport(Vec2::new(100.0, 100.0), tiny);
        assert_eq!(pos, Vec2::new(4.0, -6.0));
        assert!(pos.is_finite());
    }
}
