pub mod atlas;
pub mod events;
pub mod idle;
pub mod motion;
pub mod obstacle;

use glam::Vec2;

use self::atlas::{SpriteAtlas, SpriteOffset, SpriteState};
use self::events::{CompanionObserver, Edges};
use self::idle::IdleAnimation;
use self::motion::Motion;
use self::obstacle::Obstacle;
use crate::rng::RandomSource;

/// Half the sprite size. The companion's position is its center.
pub const RADIUS: f32 = 16.0;

/// Where the companion appears when nothing else is configured.
pub const DEFAULT_START: Vec2 = Vec2::new(32.0, 32.0);

/// Host viewport size, read fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Mutable behavior state. Only [`Companion::tick`] writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionState {
    /// Sprite center.
    pub position: Vec2,
    /// Ticks since start; drives the walk cycle.
    pub frame_count: u64,
    /// Consecutive idle ticks, wound back down by alert ticks.
    pub idle_ticks: u32,
    pub idle_animation: Option<IdleAnimation>,
    /// Progress inside `idle_animation`; zero while none is playing.
    pub idle_animation_frame: u32,
}

impl CompanionState {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            frame_count: 0,
            idle_ticks: 0,
            idle_animation: None,
            idle_animation_frame: 0,
        }
    }

    pub fn reset_idle_animation(&mut self) {
        self.idle_animation = None;
        self.idle_animation_frame = 0;
    }
}

/// Everything the outside world contributes to one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Latest pointer sample.
    pub pointer: Vec2,
    pub viewport: Viewport,
    pub obstacle: Obstacle,
}

/// What a renderer needs after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub sprite: SpriteState,
    pub frame: u64,
    /// Atlas cell for `sprite` at `frame`.
    pub offset: SpriteOffset,
}

/// The companion: state, sprite table and notification edges.
pub struct Companion {
    state: CompanionState,
    atlas: SpriteAtlas,
    edges: Edges,
}

impl Companion {
    pub fn new(start: Vec2) -> Self {
        Self {
            state: CompanionState::new(start),
            atlas: SpriteAtlas::default(),
            edges: Edges::default(),
        }
    }

    #[cfg(test)]
    pub fn with_atlas(mut self, atlas: SpriteAtlas) -> Self {
        self.atlas = atlas;
        self
    }

    pub fn state(&self) -> &CompanionState {
        &self.state
    }

    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    /// Pose for the current state without ticking, e.g. for the first frame.
    pub fn resting_pose(&self) -> Pose {
        Pose {
            position: self.state.position,
            sprite: SpriteState::Idle,
            frame: 0,
            offset: self.atlas.frame(SpriteState::Idle, 0),
        }
    }

    /// Run one full decision cycle: decide, move (or idle), avoid the
    /// obstacle, clamp to the viewport, then notify.
    pub fn tick(
        &mut self,
        input: &TickInput,
        rng: &mut dyn RandomSource,
        observer: &mut dyn CompanionObserver,
    ) -> Pose {
        let state = &mut self.state;
        state.frame_count = state.frame_count.wrapping_add(1);

        let (sprite, frame) = match motion::decide(state, input.pointer) {
            Motion::Idle => {
                self.edges.settle();
                idle::update(state, input.viewport, rng, &mut self.edges, observer)
            }
            Motion::Alert => {
                self.edges.start_moving(observer);
                state.reset_idle_animation();
                state.idle_ticks = motion::alert_countdown(state.idle_ticks);
                log::debug!("alert, {} idle ticks left", state.idle_ticks);
                (SpriteState::Alert, 0)
            }
            Motion::Moving { heading, candidate } => {
                self.edges.start_moving(observer);
                state.reset_idle_animation();
                state.position = obstacle::avoid(candidate, &input.obstacle);
                (heading, state.frame_count)
            }
        };
        // Every branch ends in bounds, even right after the viewport shrank.
        state.position = motion::clamp_to_viewport(state.position, input.viewport);

        observer.sprite_changed(sprite, frame);
        observer.position_changed(state.position);

        Pose {
            position: state.position,
            sprite,
            frame,
            offset: self.atlas.frame(sprite, frame),
        }
    }
}
