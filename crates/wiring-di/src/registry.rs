//! Context instances keyed by definition and thread
//!
//! [`inject`](crate::inject) looks contexts up here: one instance per
//! `(ContextDefinition, thread)` pair, created on first access and reused
//! afterwards. Threads never share an instance. Entries live until they are
//! removed explicitly or the registry is dropped; the global registry lives
//! for the whole process.

use crate::context::{Context, ContextDefinition};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

type RegistryKey = (TypeId, ThreadId);

/// Map from `(context definition, thread)` to a context instance.
pub struct ContextRegistry {
	instances: Mutex<HashMap<RegistryKey, Arc<Context>>>,
}

static GLOBAL_REGISTRY: Lazy<ContextRegistry> = Lazy::new(ContextRegistry::new);

impl ContextRegistry {
	pub fn new() -> Self {
		Self {
			instances: Mutex::new(HashMap::new()),
		}
	}

	/// Process-wide registry used by [`InjectedFn::call`](crate::InjectedFn::call).
	pub fn global() -> &'static ContextRegistry {
		&GLOBAL_REGISTRY
	}

	/// Context of kind `D` for the calling thread, created on first access.
	///
	/// The context is built outside the lock, so a definition may itself use
	/// the registry. If two builds race, the first one stored is kept.
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use wiring_di::{ContextBuilder, ContextDefinition, ContextRegistry};
	///
	/// struct Empty;
	///
	/// impl ContextDefinition for Empty {
	/// 	fn declare(builder: ContextBuilder) -> ContextBuilder {
	/// 		builder
	/// 	}
	/// }
	///
	/// let registry = ContextRegistry::new();
	/// let first = registry.get_instance::<Empty>();
	/// let second = registry.get_instance::<Empty>();
	/// assert!(Arc::ptr_eq(&first, &second));
	/// ```
	pub fn get_instance<D: ContextDefinition>(&self) -> Arc<Context> {
		let key = Self::key::<D>();
		if let Some(context) = self.instances.lock().get(&key) {
			return Arc::clone(context);
		}

		let context = Arc::new(Context::of::<D>());
		let mut instances = self.instances.lock();
		let stored = instances.entry(key).or_insert_with(|| {
			tracing::debug!(
				context = type_name::<D>(),
				thread = ?key.1,
				"created context instance"
			);
			context
		});
		Arc::clone(stored)
	}

	/// Whether the calling thread already has a context of kind `D`.
	pub fn contains<D: ContextDefinition>(&self) -> bool {
		self.instances.lock().contains_key(&Self::key::<D>())
	}

	/// Drops the calling thread's context of kind `D`.
	///
	/// The next access builds a fresh instance.
	pub fn remove<D: ContextDefinition>(&self) -> Option<Arc<Context>> {
		let removed = self.instances.lock().remove(&Self::key::<D>());
		if removed.is_some() {
			tracing::debug!(context = type_name::<D>(), "removed context instance");
		}
		removed
	}

	/// Drops every context of every thread.
	pub fn clear(&self) {
		self.instances.lock().clear();
	}

	pub fn len(&self) -> usize {
		self.instances.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.instances.lock().is_empty()
	}

	fn key<D: ContextDefinition>() -> RegistryKey {
		(TypeId::of::<D>(), thread::current().id())
	}
}

impl Default for ContextRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ContextRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextRegistry")
			.field("instances", &self.len())
			.finish()
	}
}
