//! Composition context
//!
//! A [`Context`] maps ports to the nodes or references that provide them.
//! Declarations are collected by a [`ContextBuilder`], usually from a
//! [`ContextDefinition`], and indexed by the first call to
//! [`initialize`](Context::initialize). Resolving a port walks its node fresh
//! every time.
//!
//! ```
//! use std::sync::Arc;
//! use wiring_di::{Composite, Context, ContextBuilder, ContextDefinition, Dependency};
//!
//! trait Greeter: Send + Sync {
//! 	fn greet(&self) -> String;
//! }
//!
//! struct Plain {
//! 	name: String,
//! }
//!
//! impl Greeter for Plain {
//! 	fn greet(&self) -> String {
//! 		format!("Hello {}", self.name)
//! 	}
//! }
//!
//! struct AppContext;
//!
//! impl ContextDefinition for AppContext {
//! 	fn declare(builder: ContextBuilder) -> ContextBuilder {
//! 		let name = Dependency::new("name", "World".to_string());
//! 		builder.register(
//! 			Composite::new(|args| {
//! 				Ok(Arc::new(Plain {
//! 					name: args.named("name")?,
//! 				}) as Arc<dyn Greeter>)
//! 			})
//! 			.kwarg("name", name),
//! 		)
//! 	}
//! }
//!
//! let context = Context::of::<AppContext>();
//! context.initialize();
//! let greeter = context.resolve::<Arc<dyn Greeter>>().unwrap().unwrap();
//! assert_eq!(greeter.greet(), "Hello World");
//! ```

use crate::argument::{AnyValue, Argument, Overrides, unshare};
use crate::depth;
use crate::key::{Port, PortKey};
use crate::parameters::Signature;
use crate::settings::ContextSettings;
use crate::{DiError, DiResult};
use once_cell::sync::OnceCell;
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;

/// Declares the ports of a context type.
///
/// Each implementing type stands for one kind of context. The
/// [`ContextRegistry`](crate::ContextRegistry) and [`inject`](crate::inject)
/// build instances from it on demand.
pub trait ContextDefinition: 'static {
	fn declare(builder: ContextBuilder) -> ContextBuilder;
}

/// Collects port declarations for a [`Context`].
pub struct ContextBuilder {
	name: &'static str,
	declarations: Vec<(PortKey, Argument)>,
	settings: ContextSettings,
}

impl ContextBuilder {
	fn new(name: &'static str) -> Self {
		Self {
			name,
			declarations: Vec::new(),
			settings: ContextSettings::default(),
		}
	}

	/// Registers a node or reference under the port it produces.
	///
	/// A `Composite<Foo>`, `Strategy<Foo>` or `Dependency<Foo>` is filed
	/// under the key of `Foo`.
	pub fn register<P>(self, declaration: P) -> Self
	where
		P: Port + Into<Argument>,
	{
		self.register_as(PortKey::of_port::<P>(), declaration.into())
	}

	/// Registers a plain value as its own port.
	pub fn bind<T: Send + Sync + 'static>(self, value: T) -> Self {
		self.register_as(PortKey::of::<T>(), Argument::value(value))
	}

	/// Registers an argument under an explicit key.
	pub fn register_as(mut self, key: PortKey, argument: Argument) -> Self {
		self.declarations.push((key, argument));
		self
	}

	pub fn settings(mut self, settings: ContextSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn build(self) -> Context {
		Context {
			name: self.name,
			declarations: self.declarations,
			adapters: OnceCell::new(),
			settings: self.settings,
		}
	}
}

/// Port registry and resolver.
///
/// A context starts uninitialized: every lookup reports "not registered"
/// until [`initialize`](Context::initialize) indexes the declarations.
pub struct Context {
	name: &'static str,
	declarations: Vec<(PortKey, Argument)>,
	adapters: OnceCell<HashMap<PortKey, Argument>>,
	settings: ContextSettings,
}

impl Context {
	/// Starts an anonymous context.
	pub fn builder() -> ContextBuilder {
		ContextBuilder::new("anonymous")
	}

	/// Builds a context from a definition type.
	pub fn of<D: ContextDefinition>() -> Self {
		D::declare(ContextBuilder::new(type_name::<D>())).build()
	}

	/// Composite key of the port `P` stands for.
	pub fn composite_key<P: Port + ?Sized>() -> PortKey {
		PortKey::of_port::<P>()
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn settings(&self) -> &ContextSettings {
		&self.settings
	}

	/// Indexes the declarations by port key.
	///
	/// Only the first call does any work. When two declarations share a key
	/// the later one wins.
	pub fn initialize(&self) {
		self.adapters.get_or_init(|| {
			let mut adapters = HashMap::with_capacity(self.declarations.len());
			for (key, argument) in &self.declarations {
				if adapters.insert(*key, argument.clone()).is_some() {
					tracing::warn!(
						context = self.name,
						port = %key,
						"port declared twice, keeping the later declaration"
					);
				}
			}
			tracing::debug!(
				context = self.name,
				ports = adapters.len(),
				"context initialized"
			);
			adapters
		});
	}

	pub fn is_initialized(&self) -> bool {
		self.adapters.get().is_some()
	}

	pub fn contains(&self, key: &PortKey) -> bool {
		self.adapters
			.get()
			.is_some_and(|adapters| adapters.contains_key(key))
	}

	/// Registered ports, sorted by name.
	pub fn ports(&self) -> Vec<PortKey> {
		let mut ports: Vec<PortKey> = self
			.adapters
			.get()
			.map(|adapters| adapters.keys().copied().collect())
			.unwrap_or_default();
		ports.sort_unstable_by_key(PortKey::name);
		ports
	}

	pub fn len(&self) -> usize {
		self.adapters.get().map_or(0, HashMap::len)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Resolves the port `T`.
	///
	/// `Ok(None)` means no declaration provides `T`. A registered port always
	/// comes back as `Some`, even when its value is itself an `Option`.
	pub fn resolve<T>(&self) -> DiResult<Option<T>>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.resolve_with(&Overrides::new())
	}

	/// Resolves the port `T` with named dependencies overridden for this call.
	pub fn resolve_with<T>(&self, overrides: &Overrides) -> DiResult<Option<T>>
	where
		T: Clone + Send + Sync + 'static,
	{
		let key = PortKey::of::<T>();
		let Some(value) = self.resolve_port(&key, overrides)? else {
			return Ok(None);
		};
		value
			.downcast::<T>()
			.map(|value| Some(unshare(value)))
			.map_err(|_| DiError::PortType {
				port: key.to_string(),
				expected: type_name::<T>(),
			})
	}

	/// Resolves the port `T`, failing when it is not registered.
	pub fn require<T>(&self) -> DiResult<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.resolve::<T>()?
			.ok_or_else(|| DiError::NotRegistered(type_name::<T>().to_string()))
	}

	/// Resolves a port by key into a type-erased value.
	///
	/// Settings bindings apply first and `overrides` win over them.
	pub fn resolve_port(
		&self,
		key: &PortKey,
		overrides: &Overrides,
	) -> DiResult<Option<AnyValue>> {
		let Some(adapter) = self.adapters.get().and_then(|adapters| adapters.get(key)) else {
			tracing::trace!(context = self.name, port = %key, "port not registered");
			return Ok(None);
		};

		tracing::trace!(context = self.name, port = %key, "resolving port");
		let overrides = self.settings.overrides().merged(overrides);
		depth::with_limit(self.settings.max_resolution_depth, || {
			adapter.substitute(&overrides).resolve(&overrides)
		})
		.map(Some)
	}

	/// Resolves every registered port named in `signature`.
	///
	/// Parameters without a port, or whose port is not registered, are left
	/// out of the result.
	pub fn resolve_dependencies(
		&self,
		signature: &Signature,
	) -> DiResult<HashMap<PortKey, AnyValue>> {
		let mut resolved = HashMap::new();
		for parameter in signature.parameters() {
			let Some(key) = parameter.port() else {
				continue;
			};
			if resolved.contains_key(&key) {
				continue;
			}
			if let Some(value) = self.resolve_port(&key, &Overrides::new())? {
				resolved.insert(key, value);
			}
		}
		tracing::trace!(
			context = self.name,
			resolved = resolved.len(),
			"resolved callable dependencies"
		);
		Ok(resolved)
	}
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("name", &self.name)
			.field("initialized", &self.is_initialized())
			.field("ports", &self.ports())
			.finish()
	}
}
