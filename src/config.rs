//! Tunable limits for the anti-spillover heuristics and boundary caches.
//!
//! The defaults match typical template lengths. They can be overridden
//! per instance, or from environment variables prefixed with
//! `MESSAGE_TEMPLATE_SYNTAX_`.

use std::env;

/// Characters an unterminated string literal may scan before a closing
/// bracket, paren, or brace ends it.
pub const DEFAULT_RUNAWAY_LITERAL_LIMIT: usize = 50;

/// Characters after an opening quote within which an arithmetic operator
/// following a `.` closes the literal at the dot.
pub const DEFAULT_OPERATOR_WINDOW: usize = 3;

/// Entries kept by the boundary caches.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

const RUNAWAY_LITERAL_LIMIT_VAR: &str = "MESSAGE_TEMPLATE_SYNTAX_RUNAWAY_LITERAL_LIMIT";
const OPERATOR_WINDOW_VAR: &str = "MESSAGE_TEMPLATE_SYNTAX_OPERATOR_WINDOW";

/// Errors raised while building configuration or caches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A cache was requested with room for nothing.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,
    /// A setting could not be parsed.
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
    /// A setting parsed but lies below its minimum.
    #[error("{name} must be at least {min}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
    },
}

/// Thresholds for the string-literal recovery heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heuristics {
    pub runaway_literal_limit: usize,
    pub operator_window: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            runaway_literal_limit: DEFAULT_RUNAWAY_LITERAL_LIMIT,
            operator_window: DEFAULT_OPERATOR_WINDOW,
        }
    }
}

impl Heuristics {
    /// Build a validated set of thresholds.
    ///
    /// The runaway limit must be at least 1; an operator window of 0
    /// disables the early-dot close.
    pub const fn new(
        runaway_literal_limit: usize,
        operator_window: usize,
    ) -> Result<Self, ConfigError> {
        if runaway_literal_limit == 0 {
            return Err(ConfigError::OutOfRange {
                name: "runaway_literal_limit",
                value: runaway_literal_limit,
                min: 1,
            });
        }
        Ok(Self {
            runaway_literal_limit,
            operator_window,
        })
    }

    /// Defaults overridden by any `MESSAGE_TEMPLATE_SYNTAX_*` variables set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let limit = read_usize(&lookup, RUNAWAY_LITERAL_LIMIT_VAR, "runaway_literal_limit")?
            .unwrap_or(defaults.runaway_literal_limit);
        let window = read_usize(&lookup, OPERATOR_WINDOW_VAR, "operator_window")?
            .unwrap_or(defaults.operator_window);
        Self::new(limit, window)
    }
}

fn read_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    name: &'static str,
) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { name, value: raw })
}
