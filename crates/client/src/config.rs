//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level client configuration.
///
/// ```toml
/// [undo]
/// max_items = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Undo history settings.
	pub undo: UndoConfig,
}

impl ClientConfig {
	/// Parses a configuration from TOML text. Missing keys take their defaults.
	pub fn from_toml(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}
}

/// Undo history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoConfig {
	/// Number of undo entries kept before the oldest is evicted.
	#[serde(default = "default_max_items")]
	pub max_items: usize,
}

/// Returns the default undo stack depth.
fn default_max_items() -> usize {
	50
}

impl Default for UndoConfig {
	fn default() -> Self {
		Self {
			max_items: default_max_items(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ClientError;

	#[test]
	fn empty_text_uses_defaults() {
		let config = ClientConfig::from_toml("").unwrap();
		assert_eq!(config, ClientConfig::default());
		assert_eq!(config.undo.max_items, 50);
	}

	#[test]
	fn overrides_max_items() {
		let config = ClientConfig::from_toml("[undo]\nmax_items = 3\n").unwrap();
		assert_eq!(config.undo.max_items, 3);
	}

	#[test]
	fn rejects_wrong_types() {
		let err = ClientConfig::from_toml("[undo]\nmax_items = \"many\"\n").unwrap_err();
		assert!(matches!(err, ClientError::Config(_)));
	}
}
