//! Named leaf values of a composition graph

use crate::argument::Argument;
use crate::key::Port;
use crate::{DiError, DiResult};
use std::fmt;
use std::sync::Arc;

/// A named, immutable value that composition nodes can depend on.
///
/// Dependencies are the only arguments an override scope can swap, and they
/// are matched by [`name`](Dependency::name). Clones share the wrapped value.
///
/// # Examples
///
/// ```
/// use wiring_di::Dependency;
///
/// let dsn = Dependency::new("dsn", "sqlite://".to_string());
/// assert_eq!(dsn.name(), "dsn");
/// assert_eq!(dsn.resolve().unwrap(), "sqlite://");
/// ```
pub struct Dependency<T> {
	name: Arc<str>,
	value: Option<Arc<T>>,
}

impl<T> Dependency<T> {
	pub fn new(name: impl Into<Arc<str>>, value: T) -> Self {
		Self {
			name: name.into(),
			value: Some(Arc::new(value)),
		}
	}

	/// Declares a dependency with no value yet.
	///
	/// Resolving it fails with [`DiError::UnboundDependency`] unless an
	/// override scope supplies a value under the same name.
	///
	/// # Examples
	///
	/// ```
	/// use wiring_di::{Dependency, DiError};
	///
	/// let email: Dependency<String> = Dependency::unbound("email");
	/// assert!(!email.is_bound());
	/// assert!(matches!(email.resolve(), Err(DiError::UnboundDependency(_))));
	/// ```
	pub fn unbound(name: impl Into<Arc<str>>) -> Self {
		Self {
			name: name.into(),
			value: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> Option<&T> {
		self.value.as_deref()
	}

	pub fn is_bound(&self) -> bool {
		self.value.is_some()
	}

	/// Returns the shared value.
	pub fn resolve_arc(&self) -> DiResult<Arc<T>> {
		self.value
			.clone()
			.ok_or_else(|| DiError::UnboundDependency(self.name.to_string()))
	}
}

impl<T: Clone> Dependency<T> {
	/// Returns a copy of the value.
	pub fn resolve(&self) -> DiResult<T> {
		self.resolve_arc().map(|value| (*value).clone())
	}
}

impl<T> Clone for Dependency<T> {
	fn clone(&self) -> Self {
		Self {
			name: Arc::clone(&self.name),
			value: self.value.clone(),
		}
	}
}

impl<T> fmt::Debug for Dependency<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dependency")
			.field("name", &self.name)
			.field("type", &std::any::type_name::<T>())
			.field("bound", &self.is_bound())
			.finish()
	}
}

impl<T: 'static> Port for Dependency<T> {
	type Target = T;
}

impl<T: Send + Sync + 'static> From<Dependency<T>> for Argument {
	fn from(dependency: Dependency<T>) -> Self {
		Argument::Dependency {
			name: dependency.name,
			value: dependency.value.map(|value| value as crate::AnyValue),
		}
	}
}
