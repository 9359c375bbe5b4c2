use std::time::Duration;

/// Minimum time between two logical ticks (caps behavior at 10 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// What the host should do with one rendering callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Run one decision cycle, then re-arm.
    Tick,
    /// Too soon; just re-arm.
    Skip,
    /// Display element is gone. Never re-arm.
    Stop,
}

/// Throttles rendering callbacks down to logical ticks.
///
/// Timestamps are host time since an arbitrary origin. The first callback
/// only records its timestamp.
#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    last_tick: Option<Duration>,
    stopped: bool,
    ticks: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::with_interval(TICK_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
            stopped: false,
            ticks: 0,
        }
    }

    /// Decide what one rendering callback at `now` should do.
    /// `attached` is false once the companion's display is gone; after that
    /// every call returns [`FrameAction::Stop`].
    pub fn on_frame(&mut self, now: Duration, attached: bool) -> FrameAction {
        if self.stopped {
            return FrameAction::Stop;
        }
        if !attached {
            self.stopped = true;
            log::info!("companion detached after {} ticks, stopping", self.ticks);
            return FrameAction::Stop;
        }

        let last = *self.last_tick.get_or_insert(now);
        if now.saturating_sub(last) > self.interval {
            self.last_tick = Some(now);
            self.ticks += 1;
            FrameAction::Tick
        } else {
            FrameAction::Skip
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Logical ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_frame_only_arms() {
        let mut s = TickScheduler::new();
        assert_eq!(s.on_frame(ms(5000), true), FrameAction::Skip);
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn ticks_strictly_after_interval() {
        let mut s = TickScheduler::new();
        s.on_frame(ms(0), true);
        assert_eq!(s.on_frame(ms(16), true), FrameAction::Skip);
        assert_eq!(s.on_frame(ms(100), true), FrameAction::Skip);
        assert_eq!(s.on_frame(ms(101), true), FrameAction::Tick);
        assert_eq!(s.on_frame(ms(150), true), FrameAction::Skip);
        assert_eq!(s.on_frame(ms(202), true), FrameAction::Tick);
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn sixty_hz_display_ticks_below_ten_hz() {
        let mut s = TickScheduler::new();
        let ticks = (0..600u64)
            .map(|frame| s.on_frame(Duration::from_micros(frame * 16_667), true))
            .filter(|a| *a == FrameAction::Tick)
            .count();
        // 10 seconds of frames.
        assert!(ticks <= 100, "{ticks}");
        assert!(ticks >= 80, "{ticks}");
    }

    #[test]
    fn detach_is_permanent() {
        let mut s = TickScheduler::new();
        s.on_frame(ms(0), true);
        assert_eq!(s.on_frame(ms(500), false), FrameAction::Stop);
        assert!(s.is_stopped());
        assert_eq!(s.on_frame(ms(1000), true), FrameAction::Stop);
    }

    #[test]
    fn clock_going_backwards_does_not_tick() {
        let mut s = TickScheduler::new();
        s.on_frame(ms(1000), true);
        assert_eq!(s.on_frame(ms(10), true), FrameAction::Skip);
    }
}
