use glam::Vec2;

use crate::neko::DEFAULT_START;

/// Runtime knobs read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Skip the companion entirely (`NEKO_REDUCED_MOTION`).
    pub reduced_motion: bool,
    /// Fixed seed for idle behavior (`NEKO_SEED`).
    pub seed: Option<u64>,
    /// Initial position (`NEKO_START`, "x,y").
    pub start: Vec2,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            seed: None,
            start: DEFAULT_START,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. Bad values are logged and
    /// replaced by defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("NEKO_REDUCED_MOTION") {
            config.reduced_motion = parse_flag(&v);
        }

        if let Some(v) = lookup("NEKO_SEED") {
            match v.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(e) => log::warn!("ignoring NEKO_SEED={v:?}: {e}"),
            }
        }

        if let Some(v) = lookup("NEKO_START") {
            match parse_point(&v) {
                Some(p) => config.start = p,
                None => log::warn!("ignoring NEKO_START={v:?}: expected \"x,y\""),
            }
        }

        config
    }

    /// Random source for the session: seeded if configured.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_point(v: &str) -> Option<Vec2> {
    let (x, y) = v.split_once(',')?;
    let x = x.trim().parse::<f32>().ok()?;
    let y = y.trim().parse::<f32>().ok()?;
    (x.is_finite() && y.is_finite()).then(|| Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(from(&[]), Config::default());
        assert_eq!(Config::default().start, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn reads_all_keys() {
        let config = from(&[
            ("NEKO_REDUCED_MOTION", "Yes"),
            ("NEKO_SEED", " 42 "),
            ("NEKO_START", "100, 250.5"),
        ]);
        assert!(config.reduced_motion);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.start, Vec2::new(100.0, 250.5));
    }

    #[test]
    fn bad_values_fall_back() {
        let config = from(&[
            ("NEKO_REDUCED_MOTION", "0"),
            ("NEKO_SEED", "kitten"),
            ("NEKO_START", "12"),
        ]);
        assert_eq!(config, Config::default());
        assert_eq!(from(&[("NEKO_START", "nan,3")]).start, DEFAULT_START);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = from(&[("NEKO_SEED", "9")]);
        assert_eq!(config.rng().u32(..), config.rng().u32(..));
    }
}
