/// Source of uniform integer draws for idle behavior.
///
/// The companion only ever asks for "a number in `0..bound`", so tests can
/// script the exact rolls they need.
pub trait RandomSource {
    /// Uniform draw in `0..bound`. `bound` is always at least 1.
    fn below(&mut self, bound: u32) -> u32;
}

impl RandomSource for fastrand::Rng {
    fn below(&mut self, bound: u32) -> u32 {
        self.u32(0..bound.max(1))
    }
}

/// Replays a fixed queue of draws, each reduced modulo the requested bound.
/// Once exhausted it keeps returning `fallback`.
#[cfg(test)]
pub struct Scripted {
    draws: std::collections::VecDeque<u32>,
    fallback: u32,
}

#[cfg(test)]
impl Scripted {
    pub fn new(draws: &[u32]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            fallback: 1,
        }
    }

    /// A source whose every draw is `value % bound`.
    pub fn always(value: u32) -> Self {
        Self {
            draws: Default::default(),
            fallback: value,
        }
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn below(&mut self, bound: u32) -> u32 {
        let bound = bound.max(1);
        self.draws.pop_front().unwrap_or(self.fallback) % bound
    }
}
