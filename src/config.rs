//! Event task configuration parameters
//!
//! Timing knobs for the adaptive event wait.  Values can be loaded from a
//! JSON document so integrators can keep them next to the rest of the
//! stack configuration.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Event task configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Event wait timeout while at least one component is polling (milliseconds)
    pub poll_interval_ms: u16,
    /// Event wait timeout while nothing is polling (milliseconds)
    pub idle_timeout_ms: u16,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1,
            idle_timeout_ms: 5000,
        }
    }
}

impl TaskConfig {
    /// Parse a configuration from JSON.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or spin the task.
    pub fn validate(&self) -> Result<()> {
        if self.idle_timeout_ms == 0 {
            return Err(Error::Config("idle_timeout_ms must be non-zero"));
        }
        if self.poll_interval_ms > self.idle_timeout_ms {
            return Err(Error::Config(
                "poll_interval_ms must not exceed idle_timeout_ms",
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.idle_timeout_ms))
    }
}
