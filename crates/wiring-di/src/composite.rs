//! Composition nodes
//!
//! A [`Composite`] is a recipe for one object of the graph: a factory plus
//! positional and named [`Argument`]s. Arguments can be concrete values,
//! [`Dependency`](crate::Dependency) references or other nodes, so nesting
//! composites builds the graph. Nothing is cached: every resolution walks the
//! graph again and builds fresh instances.
//!
//! # Example
//!
//! ```
//! use wiring_di::{Composite, Dependency, Overrides};
//!
//! #[derive(Clone)]
//! struct Repository {
//! 	dsn: String,
//! }
//!
//! #[derive(Clone)]
//! struct Service {
//! 	repository: Repository,
//! }
//!
//! let dsn = Dependency::new("dsn", "sqlite://".to_string());
//! let repository = Composite::new(|args| {
//! 	Ok(Repository {
//! 		dsn: args.named("dsn")?,
//! 	})
//! })
//! .kwarg("dsn", dsn);
//! let service = Composite::new(|args| {
//! 	Ok(Service {
//! 		repository: args.named("repository")?,
//! 	})
//! })
//! .kwarg("repository", repository);
//!
//! assert_eq!(service.resolve().unwrap().repository.dsn, "sqlite://");
//!
//! // Overrides reach references held by nested nodes too.
//! let overrides = Overrides::new().value("dsn", "postgres://".to_string());
//! let overridden = service.scoped_override(&overrides).unwrap();
//! assert_eq!(overridden.repository.dsn, "postgres://");
//! ```

use crate::argument::{AnyValue, Argument, Arguments, Overrides};
use crate::depth;
use crate::key::Port;
use crate::DiResult;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// A graph node that can be resolved without knowing its output type.
///
/// Implemented by [`Composite`] and [`Strategy`](crate::Strategy); nested
/// nodes are stored behind this trait.
pub trait Resolvable: Send + Sync {
	/// Resolves the node under `overrides` into a shared, type-erased value.
	fn resolve_erased(&self, overrides: &Overrides) -> DiResult<AnyValue>;

	/// Type name of the value the node produces.
	fn output_type(&self) -> &'static str;
}

type Factory<T> = dyn Fn(&Arguments) -> DiResult<T> + Send + Sync;

/// Composition node producing a `T`.
///
/// Cloning is cheap and clones describe the same recipe.
pub struct Composite<T> {
	factory: Arc<Factory<T>>,
	positional: Vec<Argument>,
	named: Vec<(String, Argument)>,
}

impl<T: Send + Sync + 'static> Composite<T> {
	/// Creates a node around `factory`.
	///
	/// The factory receives the resolved arguments and builds the object.
	/// Errors it returns propagate unchanged to whoever resolved the node.
	pub fn new<F>(factory: F) -> Self
	where
		F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
	{
		Self {
			factory: Arc::new(factory),
			positional: Vec::new(),
			named: Vec::new(),
		}
	}

	/// Node building `T::default()`.
	///
	/// # Examples
	///
	/// ```
	/// use wiring_di::Composite;
	///
	/// assert_eq!(Composite::<i32>::from_default().resolve().unwrap(), 0);
	/// ```
	pub fn from_default() -> Self
	where
		T: Default,
	{
		Self::new(|_| Ok(T::default()))
	}

	/// Appends a positional argument.
	pub fn arg(mut self, argument: impl Into<Argument>) -> Self {
		self.positional.push(argument.into());
		self
	}

	/// Sets a named argument, replacing an earlier one with the same name.
	pub fn kwarg(mut self, name: impl Into<String>, argument: impl Into<Argument>) -> Self {
		let name = name.into();
		let argument = argument.into();
		match self.named.iter_mut().find(|(existing, _)| *existing == name) {
			Some((_, slot)) => *slot = argument,
			None => self.named.push((name, argument)),
		}
		self
	}

	pub fn positional_args(&self) -> &[Argument] {
		&self.positional
	}

	pub fn named_args(&self) -> &[(String, Argument)] {
		&self.named
	}

	/// Builds a fresh `T`.
	pub fn resolve(&self) -> DiResult<T> {
		self.scoped_override(&Overrides::new())
	}

	/// Builds a fresh `T` with named dependencies replaced for this call.
	///
	/// Every [`Dependency`](crate::Dependency) argument whose name is a key
	/// of `overrides` is swapped for the override value, at whichever node of
	/// the graph holds it. The node itself is left untouched, whether the
	/// resolution succeeds or fails.
	pub fn scoped_override(&self, overrides: &Overrides) -> DiResult<T> {
		let _guard = depth::enter(type_name::<T>())?;
		if !overrides.is_empty() {
			tracing::trace!(
				node = type_name::<T>(),
				overrides = ?overrides.names(),
				"resolving composite under overrides"
			);
		}

		let arguments = self.resolve_arguments(overrides)?;
		(self.factory)(&arguments)
	}

	/// Transient copy with this node's direct dependency arguments swapped.
	///
	/// Nested nodes are shared with the original, not rewritten.
	pub fn overridden(&self, overrides: &Overrides) -> Self {
		Self {
			factory: Arc::clone(&self.factory),
			positional: self
				.positional
				.iter()
				.map(|argument| argument.substitute(overrides))
				.collect(),
			named: self
				.named
				.iter()
				.map(|(name, argument)| (name.clone(), argument.substitute(overrides)))
				.collect(),
		}
	}

	// Depth-first, left to right, positional before named.
	fn resolve_arguments(&self, overrides: &Overrides) -> DiResult<Arguments> {
		let positional = self
			.positional
			.iter()
			.map(|argument| argument.substitute(overrides).resolve(overrides))
			.collect::<DiResult<Vec<_>>>()?;
		let named = self
			.named
			.iter()
			.map(|(name, argument)| {
				argument
					.substitute(overrides)
					.resolve(overrides)
					.map(|value| (name.clone(), value))
			})
			.collect::<DiResult<Vec<_>>>()?;
		Ok(Arguments::new(type_name::<T>(), positional, named))
	}
}

impl<T> Clone for Composite<T> {
	fn clone(&self) -> Self {
		Self {
			factory: Arc::clone(&self.factory),
			positional: self.positional.clone(),
			named: self.named.clone(),
		}
	}
}

impl<T> fmt::Debug for Composite<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Composite")
			.field("output", &type_name::<T>())
			.field("positional", &self.positional)
			.field("named", &self.named)
			.finish()
	}
}

impl<T: Send + Sync + 'static> Resolvable for Composite<T> {
	fn resolve_erased(&self, overrides: &Overrides) -> DiResult<AnyValue> {
		self.scoped_override(overrides)
			.map(|value| Arc::new(value) as AnyValue)
	}

	fn output_type(&self) -> &'static str {
		type_name::<T>()
	}
}

impl<T: 'static> Port for Composite<T> {
	type Target = T;
}

impl<T: Send + Sync + 'static> From<Composite<T>> for Argument {
	fn from(composite: Composite<T>) -> Self {
		Argument::Node(Arc::new(composite))
	}
}
