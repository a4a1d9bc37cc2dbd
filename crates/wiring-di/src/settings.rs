//! Context settings
//!
//! Settings are plain data, deserialized from TOML:
//!
//! ```toml
//! max_resolution_depth = 32
//!
//! [bindings]
//! channel = "sms"
//! ```
//!
//! `bindings` become base overrides for every resolution made through a
//! context. Each entry replaces the dependency of the same name with the given
//! string, which makes them a natural fit for strategy selectors. Overrides
//! passed at the call site take precedence.

use crate::argument::Overrides;
use crate::depth::DEFAULT_MAX_DEPTH;
use crate::{DiError, DiResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
	/// Deepest node nesting a single resolution may reach.
	pub max_resolution_depth: usize,
	/// Dependency name to string value.
	pub bindings: HashMap<String, String>,
}

impl Default for ContextSettings {
	fn default() -> Self {
		Self {
			max_resolution_depth: DEFAULT_MAX_DEPTH,
			bindings: HashMap::new(),
		}
	}
}

impl ContextSettings {
	/// Parses settings from a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use wiring_di::ContextSettings;
	///
	/// let settings = ContextSettings::from_toml_str("[bindings]\nchannel = \"sms\"").unwrap();
	/// assert_eq!(settings.bindings["channel"], "sms");
	/// assert_eq!(settings.max_resolution_depth, 64);
	/// ```
	pub fn from_toml_str(source: &str) -> DiResult<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Reads and parses a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> DiResult<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| DiError::SettingsIo {
			path: path.to_path_buf(),
			source,
		})?;
		let settings = Self::from_toml_str(&source)?;
		tracing::debug!(
			path = %path.display(),
			bindings = settings.bindings.len(),
			"loaded context settings"
		);
		Ok(settings)
	}

	pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
		self.max_resolution_depth = depth;
		self
	}

	pub fn bind(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.bindings.insert(name.into(), value.into());
		self
	}

	/// Bindings as an override map.
	pub(crate) fn overrides(&self) -> Overrides {
		self.bindings
			.iter()
			.fold(Overrides::new(), |overrides, (name, value)| {
				overrides.value(name.clone(), value.clone())
			})
	}
}
