use std::{num::ParseFloatError, num::ParseIntError, str::FromStr, time::Duration};

use thiserror::Error;

/// How long the poller sleeps between samples.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Position of the drive, in millimeters, that corresponds to the target.
pub const DRIVE_ZERO_POSITION_MM: f32 = 25.0;

/// Parameter the host writes the distance to target under.
pub const DEFAULT_PARAMETER_KEY: &str = "dtt";

pub const ENV_SOURCE: &str = "DRIVE_STATUS_SOURCE";
pub const ENV_INTERVAL_MS: &str = "DRIVE_STATUS_INTERVAL_MS";
pub const ENV_ZERO_OFFSET_MM: &str = "DRIVE_STATUS_ZERO_OFFSET_MM";
pub const ENV_PARAMETER_KEY: &str = "DRIVE_STATUS_PARAMETER_KEY";

/// Which `StatusSource` strategy the poller reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Named parameter in the shared parameter store.
    #[default]
    Parameter,
    /// Microdrive depth through the drive SDK.
    Drive,
    /// Uniformly random readings.
    Random,
    /// Recorded descent, replayed in a loop.
    Replay,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown source '{0}'. Expected one of: parameter, drive, random, replay.")]
    UnknownSource(String),

    #[error("Invalid poll interval '{value}'.")]
    InvalidInterval {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Poll interval must be greater than zero.")]
    ZeroInterval,

    #[error("Invalid zero offset '{value}'.")]
    InvalidZeroOffset {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Zero offset must be a finite number of millimeters.")]
    NonFiniteZeroOffset,

    #[error("Parameter key can't be empty.")]
    EmptyParameterKey,
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parameter" => Ok(Self::Parameter),
            "drive" => Ok(Self::Drive),
            "random" => Ok(Self::Random),
            "replay" => Ok(Self::Replay),
            _ => Err(ConfigError::UnknownSource(s.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub source: SourceKind,
    pub interval: Duration,
    pub zero_offset_mm: f32,
    pub parameter_key: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            interval: DEFAULT_POLL_INTERVAL,
            zero_offset_mm: DRIVE_ZERO_POSITION_MM,
            parameter_key: DEFAULT_PARAMETER_KEY.into(),
        }
    }
}

impl PollerConfig {
    /// Load overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults, overridden by whatever `lookup` returns
    /// for the `DRIVE_STATUS_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_SOURCE) {
            config.source = value.parse()?;
        }

        if let Some(value) = lookup(ENV_INTERVAL_MS) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidInterval {
                    value: value.clone(),
                    source,
                })?;
            if millis == 0 {
                return Err(ConfigError::ZeroInterval);
            }
            config.interval = Duration::from_millis(millis);
        }

        if let Some(value) = lookup(ENV_ZERO_OFFSET_MM) {
            let offset = value
                .trim()
                .parse::<f32>()
                .map_err(|source| ConfigError::InvalidZeroOffset {
                    value: value.clone(),
                    source,
                })?;
            if !offset.is_finite() {
                return Err(ConfigError::NonFiniteZeroOffset);
            }
            config.zero_offset_mm = offset;
        }

        if let Some(value) = lookup(ENV_PARAMETER_KEY) {
            let key = value.trim();
            if key.is_empty() {
                return Err(ConfigError::EmptyParameterKey);
            }
            config.parameter_key = key.into();
        }

        Ok(config)
    }
}
