use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

const ENV_TICK_MS: &str = "STOPWATCH_TICK_MS";
const ENV_MAX_LAPS: &str = "STOPWATCH_MAX_LAPS";
const ENV_VISIBLE_LAPS: &str = "STOPWATCH_VISIBLE_LAPS";
const ENV_LOG: &str = "STOPWATCH_LOG";

const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_VISIBLE_LAPS: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Pump cadence while running.
    pub tick_interval_ms: u64,
    /// Lap list cap, none by default.
    pub max_laps: Option<usize>,
    /// Lap rows drawn at once.
    pub visible_laps: usize,
    /// `env_logger` filter string; falls back to `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_MS,
            max_laps: None,
            visible_laps: DEFAULT_VISIBLE_LAPS,
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a key lookup. Unparseable values are logged and
    /// replaced with defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut tick_interval_ms = parse_or(&lookup, ENV_TICK_MS, defaults.tick_interval_ms);
        if tick_interval_ms == 0 {
            tick_interval_ms = DEFAULT_TICK_MS;
        }

        let max_laps = match lookup(ENV_MAX_LAPS) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(e) => {
                    log::warn!("ignoring {}={:?}: {}", ENV_MAX_LAPS, raw, e);
                    None
                }
            },
            None => None,
        };

        let visible_laps = parse_or(&lookup, ENV_VISIBLE_LAPS, defaults.visible_laps).max(1);

        let log_filter = lookup(ENV_LOG).filter(|f| !f.trim().is_empty());

        Self {
            tick_interval_ms,
            max_laps,
            visible_laps,
            log_filter,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Debug,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("ignoring {}={:?}: {:?}", key, raw, e);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOPWATCH_TICK_MS", "50"),
            ("STOPWATCH_MAX_LAPS", "99"),
            ("STOPWATCH_VISIBLE_LAPS", " 5 "),
            ("STOPWATCH_LOG", "stopwatch=debug"),
        ]);
        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.max_laps, Some(99));
        assert_eq!(config.visible_laps, 5);
        assert_eq!(config.log_filter.as_deref(), Some("stopwatch=debug"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[
            ("STOPWATCH_TICK_MS", "fast"),
            ("STOPWATCH_MAX_LAPS", "-3"),
            ("STOPWATCH_VISIBLE_LAPS", "0"),
            ("STOPWATCH_LOG", "  "),
        ]);
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.max_laps, None);
        assert_eq!(config.visible_laps, 1);
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn test_zero_interval_uses_default() {
        let config = config_from(&[("STOPWATCH_TICK_MS", "0"), ("STOPWATCH_MAX_LAPS", "0")]);
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.max_laps, None);
    }
}
