// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tunables for the event core. Finding and reading a settings file is the host
//! application's job; these types only describe the values and their defaults, and can be
//! deserialized from whatever the host loads (see [`EventCoreConfig::from_json_str`]).
//!
//! Durations are (de)serialized as integer milliseconds.

use crate::{CommonResult, ConfigError, DEFAULT_INPUT_CHANNEL_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the parser may hold an unresolved prefix (eg: a lone `Esc`) before the
/// [`InputProcessor`] releases it as ordinary input.
///
/// [`InputProcessor`]: crate::InputProcessor
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

/// Minimum spacing between two terminal query sends.
pub const DEFAULT_REQUEST_THROTTLE: Duration = Duration::from_millis(100);

/// Age after which a queued or outstanding terminal query is abandoned.
pub const DEFAULT_REQUEST_STALE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    #[serde(with = "duration_millis")]
    pub escape_timeout: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    #[serde(with = "duration_millis")]
    pub throttle: Duration,
    #[serde(with = "duration_millis")]
    pub stale_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            throttle: DEFAULT_REQUEST_THROTTLE,
            stale_timeout: DEFAULT_REQUEST_STALE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainLoopConfig {
    pub input_channel_capacity: usize,
}

impl Default for MainLoopConfig {
    fn default() -> Self {
        Self {
            input_channel_capacity: DEFAULT_INPUT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub mouse_disabled: bool,
}

/// Everything the [`MainLoop`] needs to build an [`ApplicationContext`].
///
/// [`MainLoop`]: crate::MainLoop
/// [`ApplicationContext`]: crate::ApplicationContext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCoreConfig {
    pub parser: ParserConfig,
    pub scheduler: SchedulerConfig,
    pub main_loop: MainLoopConfig,
    pub dispatch: DispatchConfig,
}

impl EventCoreConfig {
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, or the channel capacity is zero.
    pub fn from_json_str(json: &str) -> CommonResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroChannelCapacity`] if the input channel would be
    /// unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main_loop.input_channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
