use std::time::Duration;

use crate::neko::events::CompanionObserver;

/// Minimum spacing between two accepted click reactions.
pub const CLICK_COOLDOWN: Duration = Duration::from_secs(1);

/// Rate-limits host clicks into one-shot reaction pulses.
pub struct ClickState {
    cooldown: Duration,
    last_accepted: Option<Duration>,
    /// Set for one frame when a click was accepted.
    pub pulsed: bool,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            cooldown: CLICK_COOLDOWN,
            last_accepted: None,
            pulsed: false,
        }
    }

    /// Clear per-frame flags. Call once per frame before feeding clicks.
    pub fn begin_frame(&mut self) {
        self.pulsed = false;
    }

    /// Offer a click at host time `now`. Returns true (and notifies
    /// `observer`) if the cooldown has elapsed since the last accepted one.
    pub fn press(&mut self, now: Duration, observer: &mut dyn CompanionObserver) -> bool {
        let ready = match self.last_accepted {
            Some(last) => now.saturating_sub(last) >= self.cooldown,
            None => true,
        };
        if !ready {
            return false;
        }
        self.last_accepted = Some(now);
        self.pulsed = true;
        observer.click_pulse();
        true
    }
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neko::events::{Event, Recorder};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn clicks_inside_cooldown_are_dropped() {
        let mut click = ClickState::new();
        let mut rec = Recorder::default();
        assert!(click.press(ms(10_000), &mut rec));
        assert!(!click.press(ms(10_500), &mut rec));
        assert_eq!(rec.count(Event::ClickPulse), 1);
    }

    #[test]
    fn clicks_after_cooldown_are_accepted() {
        let mut click = ClickState::new();
        let mut rec = Recorder::default();
        assert!(click.press(ms(10_000), &mut rec));
        assert!(click.press(ms(11_500), &mut rec));
        assert_eq!(rec.count(Event::ClickPulse), 2);
    }

    #[test]
    fn dropped_clicks_do_not_extend_the_window() {
        let mut click = ClickState::new();
        let mut rec = Recorder::default();
        click.press(ms(0), &mut rec);
        click.press(ms(900), &mut rec);
        assert!(click.press(ms(1000), &mut rec));
    }

    #[test]
    fn pulse_flag_lasts_one_frame() {
        let mut click = ClickState::new();
        let mut rec = Recorder::default();
        click.press(ms(0), &mut rec);
        assert!(click.pulsed);
        click.begin_frame();
        assert!(!click.pulsed);
    }
}
