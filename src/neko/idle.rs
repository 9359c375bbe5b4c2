use super::atlas::SpriteState;
use super::events::{CompanionObserver, Edges};
use super::{CompanionState, Viewport};
use crate::rng::RandomSource;

/// Idle ticks after which the companion starts purring.
const PURR_AFTER: u32 = 5;
/// Idle ticks after which idle animations may start.
const RESTLESS_AFTER: u32 = 10;
/// One in this many restless ticks starts an animation.
const ANIMATION_ODDS: u32 = 200;
/// Distance from a viewport edge that counts as "at the wall".
const WALL_MARGIN: f32 = 32.0;

/// Frames spent looking tired before falling asleep.
const TIRED_FRAMES: u32 = 8;
/// Animation frames per sleeping sprite frame.
const SLEEP_FRAME_DIVISOR: u32 = 4;
/// Sleeping clears after rendering the first frame past this.
const SLEEP_LAST_FRAME: u32 = 192;
/// Scratching clears after rendering the first frame past this.
const SCRATCH_LAST_FRAME: u32 = 9;

/// Self-directed animation played while the pointer is close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAnimation {
    Sleeping,
    ScratchSelf,
    ScratchWallN,
    ScratchWallS,
    ScratchWallE,
    ScratchWallW,
}

impl IdleAnimation {
    pub fn sprite(self) -> SpriteState {
        match self {
            Self::Sleeping => SpriteState::Sleeping,
            Self::ScratchSelf => SpriteState::ScratchSelf,
            Self::ScratchWallN => SpriteState::ScratchWallN,
            Self::ScratchWallS => SpriteState::ScratchWallS,
            Self::ScratchWallE => SpriteState::ScratchWallE,
            Self::ScratchWallW => SpriteState::ScratchWallW,
        }
    }

    fn last_frame(self) -> u32 {
        match self {
            Self::Sleeping => SLEEP_LAST_FRAME,
            _ => SCRATCH_LAST_FRAME,
        }
    }
}

/// Animations available at `state.position`: sleeping and self-scratching
/// anywhere, wall scratching only next to the matching viewport edge.
pub fn candidates(state: &CompanionState, viewport: Viewport) -> Vec<IdleAnimation> {
    let pos = state.position;
    let mut options = vec![IdleAnimation::Sleeping, IdleAnimation::ScratchSelf];
    if pos.x < WALL_MARGIN {
        options.push(IdleAnimation::ScratchWallW);
    }
    if pos.y < WALL_MARGIN {
        options.push(IdleAnimation::ScratchWallN);
    }
    if pos.x > viewport.width - WALL_MARGIN {
        options.push(IdleAnimation::ScratchWallE);
    }
    if pos.y > viewport.height - WALL_MARGIN {
        options.push(IdleAnimation::ScratchWallS);
    }
    options
}

/// Run one idle tick. Returns the sprite to show and its frame index.
pub fn update(
    state: &mut CompanionState,
    viewport: Viewport,
    rng: &mut dyn RandomSource,
    edges: &mut Edges,
    observer: &mut dyn CompanionObserver,
) -> (SpriteState, u64) {
    state.idle_ticks = state.idle_ticks.saturating_add(1);

    if state.idle_ticks > PURR_AFTER {
        edges.start_purring(observer);
    }

    if state.idle_ticks > RESTLESS_AFTER
        && rng.below(ANIMATION_ODDS) == 0
        && state.idle_animation.is_none()
    {
        let options = candidates(state, viewport);
        let pick = options[rng.below(options.len() as u32) as usize % options.len()];
        log::debug!("idle animation {:?} at {}", pick, state.position);
        state.idle_animation = Some(pick);
    }

    let Some(animation) = state.idle_animation else {
        return (SpriteState::Idle, 0);
    };

    let frame = state.idle_animation_frame;
    let sprite = match animation {
        IdleAnimation::Sleeping if frame < TIRED_FRAMES => (SpriteState::Tired, 0),
        IdleAnimation::Sleeping => (SpriteState::Sleeping, (frame / SLEEP_FRAME_DIVISOR) as u64),
        scratch => (scratch.sprite(), frame as u64),
    };

    if frame > animation.last_frame() {
        log::debug!("idle animation {:?} finished", animation);
        state.reset_idle_animation();
    } else {
        state.idle_animation_frame += 1;
    }

    sprite
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neko::events::{Event, Recorder};
    use crate::rng::Scripted;
    use glam::Vec2;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn state_at(x: f32, y: f32) -> CompanionState {
        CompanionState::new(Vec2::new(x, y))
    }

    fn run(state: &mut CompanionState, rng: &mut dyn RandomSource) -> (SpriteState, u64) {
        let mut edges = Edges::default();
        let mut rec = Recorder::default();
        update(state, VIEW, rng, &mut edges, &mut rec)
    }

    #[test]
    fn plain_idle_does_not_advance_animation_frame() {
        let mut state = state_at(400.0, 300.0);
        let mut rng = Scripted::always(1);
        for _ in 0..20 {
            assert_eq!(run(&mut state, &mut rng), (SpriteState::Idle, 0));
        }
        assert_eq!(state.idle_ticks, 20);
        assert_eq!(state.idle_animation_frame, 0);
        assert!(state.idle_animation.is_none());
    }

    #[test]
    fn purr_starts_after_five_idle_ticks_once() {
        let mut state = state_at(400.0, 300.0);
        let mut edges = Edges::default();
        let mut rec = Recorder::default();
        let mut rng = Scripted::always(1);
        for tick in 1..=8 {
            update(&mut state, VIEW, &mut rng, &mut edges, &mut rec);
            let expected = usize::from(tick > 5);
            assert_eq!(rec.count(Event::PurrStart), expected, "tick {tick}");
        }
    }

    #[test]
    fn no_animation_roll_before_restless() {
        let mut state = state_at(400.0, 300.0);
        state.idle_ticks = 9;
        // Would start an animation if rolled.
        let mut rng = Scripted::always(0);
        run(&mut state, &mut rng);
        assert!(state.idle_animation.is_none());
        run(&mut state, &mut rng);
        assert_eq!(state.idle_animation, Some(IdleAnimation::Sleeping));
    }

    #[test]
    fn wall_candidates_follow_edges() {
        let mid = candidates(&state_at(400.0, 300.0), VIEW);
        assert_eq!(mid, vec![IdleAnimation::Sleeping, IdleAnimation::ScratchSelf]);

        let top_left = candidates(&state_at(20.0, 20.0), VIEW);
        assert!(top_left.contains(&IdleAnimation::ScratchWallW));
        assert!(top_left.contains(&IdleAnimation::ScratchWallN));

        let bottom_right = candidates(&state_at(780.0, 580.0), VIEW);
        assert!(bottom_right.contains(&IdleAnimation::ScratchWallE));
        assert!(bottom_right.contains(&IdleAnimation::ScratchWallS));
        assert!(!bottom_right.contains(&IdleAnimation::ScratchWallN));
    }

    #[test]
    fn never_scratches_north_wall_away_from_it() {
        let mut rng = fastrand::Rng::with_seed(42);
        for i in 0..2000 {
            let y = 32.0 + (i % 500) as f32;
            let mut state = state_at(20.0, y);
            state.idle_ticks = 11;
            let mut edges = Edges::default();
            let mut rec = Recorder::default();
            for _ in 0..5 {
                update(&mut state, VIEW, &mut rng, &mut edges, &mut rec);
                assert_ne!(state.idle_animation, Some(IdleAnimation::ScratchWallN));
            }
        }
    }

    #[test]
    fn picks_from_candidates_with_second_draw() {
        let mut state = state_at(20.0, 300.0);
        state.idle_ticks = 10;
        // roll 0 → start, pick index 2 → ScratchWallW
        let mut rng = Scripted::new(&[0, 2]);
        let sprite = run(&mut state, &mut rng);
        assert_eq!(state.idle_animation, Some(IdleAnimation::ScratchWallW));
        assert_eq!(sprite, (SpriteState::ScratchWallW, 0));
        assert_eq!(state.idle_animation_frame, 1);
    }

    #[test]
    fn sleeping_progression() {
        let mut state = state_at(400.0, 300.0);
        state.idle_ticks = 20;
        state.idle_animation = Some(IdleAnimation::Sleeping);
        let mut rng = Scripted::always(1);

        for frame in 0..8 {
            assert_eq!(state.idle_animation_frame, frame);
            assert_eq!(run(&mut state, &mut rng), (SpriteState::Tired, 0));
        }
        assert_eq!(run(&mut state, &mut rng), (SpriteState::Sleeping, 2));

        while state.idle_animation_frame < 193 {
            let frame = state.idle_animation_frame;
            assert_eq!(run(&mut state, &mut rng), (SpriteState::Sleeping, (frame / 4) as u64));
            assert_eq!(state.idle_animation, Some(IdleAnimation::Sleeping));
        }

        // Frame 193 is the first past 192: rendered, then cleared.
        assert_eq!(run(&mut state, &mut rng), (SpriteState::Sleeping, 48));
        assert!(state.idle_animation.is_none());
        assert_eq!(state.idle_animation_frame, 0);
        assert_eq!(run(&mut state, &mut rng), (SpriteState::Idle, 0));
    }

    #[test]
    fn scratching_clears_after_frame_ten() {
        let mut state = state_at(400.0, 300.0);
        state.idle_ticks = 20;
        state.idle_animation = Some(IdleAnimation::ScratchSelf);
        let mut rng = Scripted::always(1);

        for frame in 0..=10u64 {
            assert_eq!(run(&mut state, &mut rng), (SpriteState::ScratchSelf, frame));
        }
        assert!(state.idle_animation.is_none());
        assert_eq!(state.idle_animation_frame, 0);
    }

    #[test]
    fn active_animation_is_not_replaced() {
        let mut state = state_at(20.0, 20.0);
        state.idle_ticks = 20;
        state.idle_animation = Some(IdleAnimation::ScratchSelf);
        let mut rng = Scripted::always(0);
        run(&mut state, &mut rng);
        assert_eq!(state.idle_animation, Some(IdleAnimation::ScratchSelf));
    }
}
