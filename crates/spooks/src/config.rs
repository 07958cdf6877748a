//! Configuration for logs and constructor spies

use serde::{Deserialize, Serialize};

/// Log configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether each call's receiver is kept alongside its arguments
    pub track_receivers: bool,
}

impl LogConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With receiver tracking on or off
    #[inline]
    #[must_use]
    pub fn with_track_receivers(mut self, track: bool) -> Self {
        self.track_receivers = track;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            track_receivers: true,
        }
    }
}

/// What a constructor spy hands back on each invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceMode {
    /// The same spy object on every call
    #[default]
    Shared,

    /// A new spy object per call
    Fresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receivers_tracked_by_default() {
        assert!(LogConfig::new().track_receivers);
        assert!(!LogConfig::new().with_track_receivers(false).track_receivers);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());

        let config: LogConfig = serde_json::from_str(r#"{"track_receivers": false}"#).unwrap();
        assert!(!config.track_receivers);
    }

    #[test]
    fn instance_mode_names() {
        assert_eq!(InstanceMode::default(), InstanceMode::Shared);
        let mode: InstanceMode = serde_json::from_str(r#""fresh""#).unwrap();
        assert_eq!(mode, InstanceMode::Fresh);
    }
}
