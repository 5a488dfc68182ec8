//! Relay configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Per-document relay settings.
///
/// ```toml
/// dedupe_window = 64
/// broadcast_capacity = 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
	/// Number of recent commits remembered to recognize re-sent submissions.
	pub dedupe_window: usize,
	/// Capacity of the subscriber channel; slower subscribers observe lag.
	pub broadcast_capacity: usize,
}

impl Default for RelayConfig {
	fn default() -> Self {
		Self {
			dedupe_window: 64,
			broadcast_capacity: 256,
		}
	}
}

impl RelayConfig {
	/// Parses a configuration from TOML text. Missing keys take their defaults.
	pub fn from_toml(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_text_keeps_other_defaults() {
		let config = RelayConfig::from_toml("dedupe_window = 8").unwrap();
		assert_eq!(config.dedupe_window, 8);
		assert_eq!(config.broadcast_capacity, 256);
	}

	#[test]
	fn invalid_text_is_a_config_error() {
		assert!(matches!(
			RelayConfig::from_toml("dedupe_window = -1"),
			Err(crate::RelayError::Config(_))
		));
	}
}
