//! Error types for composition and resolution

use std::path::PathBuf;
use thiserror::Error;

/// Result type for dependency resolution.
pub type DiResult<T> = Result<T, DiError>;

/// Errors raised while resolving a composition graph.
///
/// Nothing in this crate recovers from these locally. Every failure reaches
/// the caller that started the resolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiError {
	/// A factory asked for an argument its node was not declared with.
	#[error("{node} has no argument {argument}")]
	MissingArgument {
		/// Output type of the node being constructed.
		node: &'static str,
		/// Positional index (`#0`) or argument name.
		argument: String,
	},

	/// A factory asked for an argument as the wrong type.
	#[error("argument {argument} of {node} is not a {expected}")]
	ArgumentType {
		/// Output type of the node being constructed.
		node: &'static str,
		/// Positional index (`#0`) or argument name.
		argument: String,
		/// Type the factory requested.
		expected: &'static str,
	},

	/// A strategy selector pointed at a branch that does not exist.
	#[error("no strategy branch '{key}' (available: {available:?})")]
	StrategyNotFound {
		/// Selected key.
		key: String,
		/// Declared branch keys, sorted.
		available: Vec<String>,
	},

	/// A dependency declared without a value was resolved without an override.
	#[error("dependency '{0}' is not bound to a value")]
	UnboundDependency(String),

	/// A port was requested that the context does not know about.
	#[error("port not registered: {0}")]
	NotRegistered(String),

	/// A port resolved to a value of a different type than requested.
	#[error("port {port} did not resolve to a {expected}")]
	PortType {
		/// Composite key of the port.
		port: String,
		/// Type the caller requested.
		expected: &'static str,
	},

	/// A bound callable parameter was read but has no value.
	#[error("parameter '{0}' has no value")]
	MissingParameter(String),

	/// A bound callable parameter was read as the wrong type.
	#[error("parameter '{parameter}' is not a {expected}")]
	ParameterType {
		/// Parameter name.
		parameter: String,
		/// Type the caller requested.
		expected: &'static str,
	},

	/// The resolution recursed past the configured depth.
	#[error("maximum resolution depth {depth} exceeded: {path}")]
	MaxDepthExceeded {
		/// Depth at which resolution stopped.
		depth: usize,
		/// Nodes on the resolution stack, outermost first.
		path: String,
	},

	/// A factory failed for its own reasons.
	#[error("construction failed: {0}")]
	Construction(#[source] Box<dyn std::error::Error + Send + Sync>),

	/// Settings could not be parsed.
	#[error("invalid context settings: {0}")]
	Settings(#[from] toml::de::Error),

	/// Settings file could not be read.
	#[error("failed to read settings from {path}: {source}")]
	SettingsIo {
		/// File that was read.
		path: PathBuf,
		/// Underlying IO error.
		#[source]
		source: std::io::Error,
	},
}

impl DiError {
	/// Wraps an arbitrary error raised inside a factory.
	///
	/// # Examples
	///
	/// ```
	/// use wiring_di::{Composite, DiError};
	///
	/// let port: Composite<u16> =
	/// 	Composite::new(|_| "not a port".parse::<u16>().map_err(DiError::construction));
	/// assert!(matches!(port.resolve(), Err(DiError::Construction(_))));
	/// ```
	pub fn construction<E>(error: E) -> Self
	where
		E: Into<Box<dyn std::error::Error + Send + Sync>>,
	{
		Self::Construction(error.into())
	}
}
