use glam::Vec2;

use crate::neko::events::CompanionObserver;
use crate::neko::obstacle::Obstacle;

/// Screen rectangle in the companion's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Call-to-action panel that appears once the companion first sets off and
/// grows when the user activates it. While expanded it is an obstacle.
#[derive(Debug, Default)]
pub struct CtaPanel {
    /// Last laid-out rectangle, kept current by the presentation layer.
    pub rect: Rect,
    visible: bool,
    expanded: bool,
}

impl CtaPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn show(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        log::debug!("cta shown");
    }

    /// Expand a visible panel. Returns true if this call expanded it.
    pub fn expand(&mut self) -> bool {
        if !self.visible || self.expanded {
            return false;
        }
        self.expanded = true;
        log::debug!("cta expanded");
        true
    }

    /// Host click at `point`. Returns true if the click landed on the
    /// visible panel (the host should not treat it as anything else).
    pub fn click(&mut self, point: Vec2) -> bool {
        if !self.visible || !self.rect.contains(point) {
            return false;
        }
        self.expand();
        true
    }

    /// Keyboard activation (Enter / Space while the panel has focus).
    pub fn activate(&mut self) -> bool {
        self.expand()
    }

    /// Exclusion zone for the companion; active only while visible and
    /// expanded.
    pub fn obstacle(&self) -> Obstacle {
        if self.visible && self.expanded {
            Obstacle::new(self.rect.min, self.rect.max)
        } else {
            Obstacle::inactive()
        }
    }
}

impl CompanionObserver for CtaPanel {
    fn movement_started(&mut self) {
        self.show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> CtaPanel {
        let mut cta = CtaPanel::new();
        cta.rect = Rect::new(Vec2::new(500.0, 400.0), Vec2::new(780.0, 580.0));
        cta
    }

    #[test]
    fn hidden_panel_ignores_clicks_and_keys() {
        let mut cta = panel();
        assert!(!cta.click(Vec2::new(600.0, 500.0)));
        assert!(!cta.activate());
        assert!(!cta.is_expanded());
        assert!(!cta.obstacle().active);
    }

    #[test]
    fn first_movement_shows_panel() {
        let mut cta = panel();
        cta.movement_started();
        cta.movement_started();
        assert!(cta.is_visible());
        assert!(!cta.is_expanded());
        assert!(!cta.obstacle().active);
    }

    #[test]
    fn click_inside_expands_and_activates_obstacle() {
        let mut cta = panel();
        cta.show();
        assert!(!cta.click(Vec2::new(10.0, 10.0)));
        assert!(!cta.is_expanded());

        assert!(cta.click(Vec2::new(600.0, 500.0)));
        assert!(cta.is_expanded());

        let obstacle = cta.obstacle();
        assert!(obstacle.active);
        assert_eq!(
            (obstacle.left, obstacle.top, obstacle.right, obstacle.bottom),
            (500.0, 400.0, 780.0, 580.0)
        );
    }

    #[test]
    fn keyboard_expands_once() {
        let mut cta = panel();
        cta.show();
        assert!(cta.activate());
        assert!(!cta.activate());
        assert!(cta.is_expanded());
    }
}
