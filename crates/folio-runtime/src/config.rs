#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every timing and threshold the page uses lives here, with defaults taken
//! from the production site. Component configs from `folio-core` are nested
//! as-is.

use std::fmt;
use std::time::Duration;

use folio_core::animation::counter::CounterConfig;
use folio_core::animation::scramble::ScrambleConfig;
use folio_core::scroll::ScrollConfig;
use folio_core::viewport::ObserverConfig;

pub(crate) fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The input could not be parsed.
    Parse(String),
    /// A field holds a value outside its allowed range.
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "failed to parse page config: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Section configs
// ---------------------------------------------------------------------------

/// Toast lifecycle timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NotificationConfig {
    /// Delay before an inserted toast slides in.
    pub enter_ms: u64,
    /// Time from creation until the toast starts exiting.
    pub visible_ms: u64,
    /// Exit transition length before removal.
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_ms: 100,
            visible_ms: 5000,
            exit_ms: 300,
        }
    }
}

impl NotificationConfig {
    /// Builder: set how long a toast stays before exiting.
    #[must_use]
    pub fn with_visible_ms(mut self, visible_ms: u64) -> Self {
        self.visible_ms = visible_ms;
        self
    }
}

/// Portfolio filter transition timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Delay between `display: block` and the fade-in styles.
    pub show_delay_ms: u64,
    /// Delay between the fade-out styles and `display: none`.
    pub hide_delay_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 100,
            hide_delay_ms: 300,
        }
    }
}

/// Page-load sequencing and small effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoadConfig {
    /// Delay after `load` before the overlay fades.
    pub overlay_fade_ms: u64,
    /// Fade length before the overlay is removed.
    pub overlay_remove_ms: u64,
    /// Delay after `load` before the hero title scrambles in.
    pub hero_scramble_ms: u64,
    /// Spacing between hero element animation delays.
    pub hero_stagger_ms: u64,
    /// Lifetime of a button ripple.
    pub ripple_ms: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            overlay_fade_ms: 1000,
            overlay_remove_ms: 500,
            hero_scramble_ms: 1000,
            hero_stagger_ms: 300,
            ripple_ms: 600,
        }
    }
}

// ---------------------------------------------------------------------------
// PageConfig
// ---------------------------------------------------------------------------

/// Complete page configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageConfig {
    pub scroll: ScrollConfig,
    pub observer: ObserverConfig,
    pub counter: CounterConfig,
    pub scramble: ScrambleConfig,
    pub notification: NotificationConfig,
    pub filter: FilterConfig,
    pub load: LoadConfig,
    /// Seed for the scramble effect's random source.
    pub seed: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            observer: ObserverConfig::default(),
            counter: CounterConfig::default(),
            scramble: ScrambleConfig::default(),
            notification: NotificationConfig::default(),
            filter: FilterConfig::default(),
            load: LoadConfig::default(),
            seed: 0x5EED,
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollConfig) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: ObserverConfig) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_counter(mut self, counter: CounterConfig) -> Self {
        self.counter = counter;
        self
    }

    #[must_use]
    pub fn with_scramble(mut self, scramble: ScrambleConfig) -> Self {
        self.scramble = scramble;
        self
    }

    #[must_use]
    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = notification;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_load(mut self, load: LoadConfig) -> Self {
        self.load = load;
        self
    }

    /// Builder: seed the scramble effect.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check value ranges that the builders cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.observer.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid(
                "observer.threshold",
                format!("{threshold} is outside [0, 1]"),
            ));
        }
        let p = self.scramble.reroll_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid(
                "scramble.reroll_probability",
                format!("{p} is outside [0, 1]"),
            ));
        }
        if self.scramble.glyphs.is_empty() {
            return Err(invalid("scramble.glyphs", "glyph pool is empty"));
        }
        for (field, value) in [
            ("scroll.nav_offset", self.scroll.nav_offset),
            ("scroll.reveal_offset", self.scroll.reveal_offset),
            ("scroll.navbar_threshold", self.scroll.navbar_threshold),
            ("observer.root_margin_bottom", self.observer.root_margin_bottom),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }
        let n = &self.notification;
        if n.visible_ms < n.enter_ms {
            return Err(invalid(
                "notification.visible_ms",
                "must not be shorter than notification.enter_ms",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site() {
        let cfg = PageConfig::default();
        assert_eq!(cfg.scroll.debounce_ms, 16);
        assert_eq!(cfg.counter.duration_ms, 2000);
        assert_eq!(cfg.notification.visible_ms, 5000);
        assert_eq!(cfg.filter.hide_delay_ms, 300);
        assert_eq!(cfg.load.ripple_ms, 600);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut cfg = PageConfig::default();
        cfg.observer.threshold = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "observer.threshold",
                ..
            }
        ));
        assert_eq!(err.to_string(), "invalid observer.threshold: 1.5 is outside [0, 1]");
    }

    #[test]
    fn notification_order_checked() {
        let cfg = PageConfig::default()
            .with_notification(NotificationConfig::default().with_visible_ms(50));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_glyph_pool_rejected() {
        let cfg = PageConfig::default().with_scramble(ScrambleConfig::default().with_glyphs(""));
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_overrides_merge_with_defaults() {
        let cfg = PageConfig::from_json_str(r#"{ "seed": 7, "scroll": { "debounce_ms": 32 } }"#)
            .expect("valid config");
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.scroll.debounce_ms, 32);
        assert_eq!(cfg.scroll.nav_offset, 200.0);
        assert_eq!(cfg.counter, CounterConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_parse_error_is_reported() {
        let err = PageConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
