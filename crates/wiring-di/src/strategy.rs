//! Strategy nodes
//!
//! A [`Strategy`] picks one of several composites at resolution time, keyed
//! by a selector that is either a literal or a `Dependency<String>`. Because
//! the selector can be a dependency, override scopes and context settings can
//! re-route a strategy without touching its declaration.

use crate::argument::{AnyValue, Argument, Overrides};
use crate::composite::{Composite, Resolvable};
use crate::dependency::Dependency;
use crate::depth;
use crate::key::Port;
use crate::{DiError, DiResult};
use parking_lot::RwLock;
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Where a strategy reads its branch key from.
#[derive(Debug, Clone)]
pub enum Selector {
	Key(String),
	Dependency(Dependency<String>),
}

impl Selector {
	fn resolve(&self, overrides: &Overrides) -> DiResult<String> {
		match self {
			Self::Key(key) => Ok(key.clone()),
			Self::Dependency(dependency) => match overrides.get(dependency.name()) {
				Some(replacement) => {
					let value = replacement.resolve(overrides)?;
					read_key(dependency.name(), value)
				}
				None => dependency.resolve(),
			},
		}
	}
}

// Overrides may carry the key as an owned or a static string.
fn read_key(name: &str, value: AnyValue) -> DiResult<String> {
	let value = match value.downcast::<String>() {
		Ok(key) => return Ok((*key).clone()),
		Err(value) => value,
	};
	value
		.downcast::<&'static str>()
		.map(|key| (*key).to_string())
		.map_err(|_| DiError::ArgumentType {
			node: type_name::<Selector>(),
			argument: name.to_string(),
			expected: type_name::<String>(),
		})
}

impl From<&str> for Selector {
	fn from(key: &str) -> Self {
		Self::Key(key.to_string())
	}
}

impl From<String> for Selector {
	fn from(key: String) -> Self {
		Self::Key(key)
	}
}

impl From<Dependency<String>> for Selector {
	fn from(dependency: Dependency<String>) -> Self {
		Self::Dependency(dependency)
	}
}

/// Node that resolves to one of several named composites.
///
/// Clones share the selector, so [`select`](Strategy::select) on any clone
/// re-routes all of them, including a copy registered in a context.
///
/// # Examples
///
/// ```
/// use wiring_di::{Composite, Dependency, Overrides, Strategy};
///
/// let channel = Dependency::new("channel", "email".to_string());
/// let notifier = Strategy::new(channel)
/// 	.branch("email", Composite::new(|_| Ok("sent by email")))
/// 	.branch("sms", Composite::new(|_| Ok("sent by sms")));
///
/// assert_eq!(notifier.resolve().unwrap(), "sent by email");
///
/// let overrides = Overrides::new().value("channel", "sms".to_string());
/// assert_eq!(notifier.scoped_override(&overrides).unwrap(), "sent by sms");
///
/// notifier.select("sms");
/// assert_eq!(notifier.resolve().unwrap(), "sent by sms");
/// ```
pub struct Strategy<T> {
	selector: Arc<RwLock<Selector>>,
	branches: Arc<HashMap<String, Composite<T>>>,
}

impl<T: Send + Sync + 'static> Strategy<T> {
	pub fn new(selector: impl Into<Selector>) -> Self {
		Self {
			selector: Arc::new(RwLock::new(selector.into())),
			branches: Arc::new(HashMap::new()),
		}
	}

	/// Adds or replaces the branch chosen by `key`.
	pub fn branch(mut self, key: impl Into<String>, composite: Composite<T>) -> Self {
		Arc::make_mut(&mut self.branches).insert(key.into(), composite);
		self
	}

	/// Re-points the selector for subsequent resolutions.
	pub fn select(&self, selector: impl Into<Selector>) {
		let selector = selector.into();
		tracing::debug!(strategy = type_name::<T>(), ?selector, "strategy selector changed");
		*self.selector.write() = selector;
	}

	pub fn selector(&self) -> Selector {
		self.selector.read().clone()
	}

	/// Branch keys, sorted.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = self.branches.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	pub fn resolve(&self) -> DiResult<T> {
		self.scoped_override(&Overrides::new())
	}

	/// Resolves the selected branch with `overrides` applied.
	///
	/// The selector itself can be overridden when it is a dependency, so the
	/// strategy counts towards the resolution depth before reading it.
	pub fn scoped_override(&self, overrides: &Overrides) -> DiResult<T> {
		let _guard = depth::enter(type_name::<T>())?;
		let key = self.selector().resolve(overrides)?;
		let branch = self
			.branches
			.get(&key)
			.ok_or_else(|| DiError::StrategyNotFound {
				key: key.clone(),
				available: self.keys().into_iter().map(str::to_string).collect(),
			})?;

		tracing::debug!(strategy = type_name::<T>(), key = %key, "selected strategy branch");
		branch.scoped_override(overrides)
	}
}

impl<T> Clone for Strategy<T> {
	fn clone(&self) -> Self {
		Self {
			selector: Arc::clone(&self.selector),
			branches: Arc::clone(&self.branches),
		}
	}
}

impl<T> fmt::Debug for Strategy<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<&String> = self.branches.keys().collect();
		keys.sort_unstable();
		f.debug_struct("Strategy")
			.field("output", &type_name::<T>())
			.field("selector", &*self.selector.read())
			.field("branches", &keys)
			.finish()
	}
}

impl<T: Send + Sync + 'static> Resolvable for Strategy<T> {
	fn resolve_erased(&self, overrides: &Overrides) -> DiResult<AnyValue> {
		self.scoped_override(overrides)
			.map(|value| Arc::new(value) as AnyValue)
	}

	fn output_type(&self) -> &'static str {
		type_name::<T>()
	}
}

impl<T: 'static> Port for Strategy<T> {
	type Target = T;
}

impl<T: Send + Sync + 'static> From<Strategy<T>> for Argument {
	fn from(strategy: Strategy<T>) -> Self {
		Argument::Node(Arc::new(strategy))
	}
}
