use glam::Vec2;

use super::atlas::SpriteState;

/// Notifications emitted by the companion. All calls are synchronous and
/// happen inside the tick (or click) that caused them.
///
/// Every method has an empty default so collaborators only implement what
/// they care about.
pub trait CompanionObserver {
    /// Idle → moving edge.
    fn movement_started(&mut self) {}

    /// Idle has lasted long enough to purr.
    fn purr_start(&mut self) {}

    /// Movement resumed while purring.
    fn purr_stop(&mut self) {}

    /// Once per tick.
    fn sprite_changed(&mut self, _state: SpriteState, _frame: u64) {}

    /// Once per tick.
    fn position_changed(&mut self, _position: Vec2) {}

    /// An accepted click, at most once per cooldown window.
    fn click_pulse(&mut self) {}
}

/// Edge state for the idempotent notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct Edges {
    moving: bool,
    purring: bool,
}

impl Edges {
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_purring(&self) -> bool {
        self.purring
    }

    /// Called from the moving and alert branches.
    pub fn start_moving(&mut self, observer: &mut dyn CompanionObserver) {
        if self.purring {
            self.purring = false;
            observer.purr_stop();
        }
        if !self.moving {
            self.moving = true;
            observer.movement_started();
        }
    }

    /// Called from the idle branch.
    pub fn settle(&mut self) {
        self.moving = false;
    }

    pub fn start_purring(&mut self, observer: &mut dyn CompanionObserver) {
        if !self.purring {
            self.purring = true;
            observer.purr_start();
        }
    }
}

/// One recorded notification.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    MovementStarted,
    PurrStart,
    PurrStop,
    Sprite(SpriteState, u64),
    Position(Vec2),
    ClickPulse,
}

/// Observer that keeps every notification in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

#[cfg(test)]
impl Recorder {
    pub fn count(&self, wanted: Event) -> usize {
        self.events.iter().filter(|e| **e == wanted).count()
    }

    pub fn last_sprite(&self) -> Option<(SpriteState, u64)> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Sprite(state, frame) => Some((*state, *frame)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
impl CompanionObserver for Recorder {
    fn movement_started(&mut self) {
        self.events.push(Event::MovementStarted);
    }

    fn purr_start(&mut self) {
        self.events.push(Event::PurrStart);
    }

    fn purr_stop(&mut self) {
        self.events.push(Event::PurrStop);
    }

    fn sprite_changed(&mut self, state: SpriteState, frame: u64) {
        self.events.push(Event::Sprite(state, frame));
    }

    fn position_changed(&mut self, position: Vec2) {
        self.events.push(Event::Position(position));
    }

    fn click_pulse(&mut self) {
        self.events.push(Event::ClickPulse);
    }
}
