//! Node arguments, their resolved form, and override maps

use crate::composite::Resolvable;
use crate::{DiError, DiResult};
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-erased, shared value produced by a resolution.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// One argument of a composition node, before resolution.
#[derive(Clone)]
pub enum Argument {
	/// A concrete value passed through unchanged.
	Value {
		value: AnyValue,
		type_name: &'static str,
	},
	/// A named reference, swappable by an override scope.
	Dependency {
		name: Arc<str>,
		value: Option<AnyValue>,
	},
	/// A nested node, resolved fresh on every walk.
	Node(Arc<dyn Resolvable>),
}

impl Argument {
	/// Wraps a concrete value.
	///
	/// # Examples
	///
	/// ```
	/// use wiring_di::{Argument, Composite};
	///
	/// let port = Composite::new(|args| args.get::<u16>(0)).arg(Argument::value(8080u16));
	/// assert_eq!(port.resolve().unwrap(), 8080);
	/// ```
	pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
		Self::Value {
			value: Arc::new(value),
			type_name: type_name::<T>(),
		}
	}

	/// Name of the reference, if this argument is one.
	pub fn dependency_name(&self) -> Option<&str> {
		match self {
			Self::Dependency { name, .. } => Some(name),
			_ => None,
		}
	}

	/// This argument with a same-named override swapped in.
	pub(crate) fn substitute(&self, overrides: &Overrides) -> Argument {
		match self.dependency_name().and_then(|name| overrides.get(name)) {
			Some(replacement) => replacement.clone(),
			None => self.clone(),
		}
	}

	/// Resolves the argument, carrying the overrides into nested nodes.
	pub(crate) fn resolve(&self, overrides: &Overrides) -> DiResult<AnyValue> {
		match self {
			Self::Value { value, .. } => Ok(Arc::clone(value)),
			Self::Dependency { name, value } => value
				.clone()
				.ok_or_else(|| DiError::UnboundDependency(name.to_string())),
			Self::Node(node) => node.resolve_erased(overrides),
		}
	}
}

impl PartialEq for Argument {
	/// Identity comparison: two arguments are equal when they hold the same
	/// allocation.
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Value { value: a, .. }, Self::Value { value: b, .. }) => Arc::ptr_eq(a, b),
			(
				Self::Dependency {
					name: a_name,
					value: a_value,
				},
				Self::Dependency {
					name: b_name,
					value: b_value,
				},
			) => {
				a_name == b_name
					&& match (a_value, b_value) {
						(Some(a), Some(b)) => Arc::ptr_eq(a, b),
						(None, None) => true,
						_ => false,
					}
			}
			(Self::Node(a), Self::Node(b)) => {
				std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
			}
			_ => false,
		}
	}
}

impl fmt::Debug for Argument {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value { type_name, .. } => f.debug_tuple("Value").field(type_name).finish(),
			Self::Dependency { name, value } => f
				.debug_struct("Dependency")
				.field("name", name)
				.field("bound", &value.is_some())
				.finish(),
			Self::Node(node) => f.debug_tuple("Node").field(&node.output_type()).finish(),
		}
	}
}

/// Resolved arguments handed to a node's factory.
///
/// Accessors report arity and type mismatches as errors so a factory can
/// propagate them with `?`.
pub struct Arguments {
	node: &'static str,
	positional: Vec<AnyValue>,
	named: Vec<(String, AnyValue)>,
}

impl Arguments {
	pub(crate) fn new(
		node: &'static str,
		positional: Vec<AnyValue>,
		named: Vec<(String, AnyValue)>,
	) -> Self {
		Self {
			node,
			positional,
			named,
		}
	}

	pub fn positional_len(&self) -> usize {
		self.positional.len()
	}

	pub fn named_len(&self) -> usize {
		self.named.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.named.is_empty()
	}

	/// Names of the named arguments, in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.named.iter().map(|(name, _)| name.as_str())
	}

	/// Positional argument at `index`, cloned out of its shared slot.
	pub fn get<T: Clone + Send + Sync + 'static>(&self, index: usize) -> DiResult<T> {
		self.get_arc(index).map(unshare)
	}

	pub fn get_arc<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
		let argument = || format!("#{index}");
		let value = self
			.positional
			.get(index)
			.ok_or_else(|| DiError::MissingArgument {
				node: self.node,
				argument: argument(),
			})?;
		self.downcast(value, argument)
	}

	/// Named argument, cloned out of its shared slot.
	pub fn named<T: Clone + Send + Sync + 'static>(&self, name: &str) -> DiResult<T> {
		self.named_arc(name).map(unshare)
	}

	pub fn named_arc<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
		let value = self
			.named
			.iter()
			.find(|(candidate, _)| candidate == name)
			.map(|(_, value)| value)
			.ok_or_else(|| DiError::MissingArgument {
				node: self.node,
				argument: name.to_string(),
			})?;
		self.downcast(value, || name.to_string())
	}

	fn downcast<T: Send + Sync + 'static>(
		&self,
		value: &AnyValue,
		argument: impl FnOnce() -> String,
	) -> DiResult<Arc<T>> {
		Arc::clone(value)
			.downcast::<T>()
			.map_err(|_| DiError::ArgumentType {
				node: self.node,
				argument: argument(),
				expected: type_name::<T>(),
			})
	}
}

impl fmt::Debug for Arguments {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Arguments")
			.field("node", &self.node)
			.field("positional", &self.positional.len())
			.field("named", &self.named.iter().map(|(n, _)| n).collect::<Vec<_>>())
			.finish()
	}
}

/// Takes the value out of a freshly built `Arc`, cloning only when shared.
pub(crate) fn unshare<T: Clone>(value: Arc<T>) -> T {
	Arc::try_unwrap(value).unwrap_or_else(|shared| (*shared).clone())
}

/// Replacements for named dependencies, applied for one resolution.
///
/// # Examples
///
/// ```
/// use wiring_di::{Composite, Dependency, Overrides};
///
/// let greeting = Composite::new(|args| Ok(format!("Hello {}", args.named::<String>("name")?)))
/// 	.kwarg("name", Dependency::new("name", "World".to_string()));
///
/// let overrides = Overrides::new().value("name", "Mars".to_string());
/// assert_eq!(greeting.scoped_override(&overrides).unwrap(), "Hello Mars");
/// assert_eq!(greeting.resolve().unwrap(), "Hello World");
/// ```
#[derive(Clone, Default)]
pub struct Overrides {
	entries: HashMap<String, Argument>,
}

impl Overrides {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the dependency called `name` with `replacement`.
	pub fn with(mut self, name: impl Into<String>, replacement: impl Into<Argument>) -> Self {
		self.insert(name, replacement);
		self
	}

	/// Replaces the dependency called `name` with a raw value.
	///
	/// A `&'static str` is stored as a `String`, so factories read it back
	/// with `named::<String>` like any other string dependency.
	pub fn value<T: Send + Sync + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
		let name = name.into();
		let value: AnyValue = Arc::new(value);
		let value = match value.downcast::<&'static str>() {
			Ok(text) => Arc::new(text.to_string()) as AnyValue,
			Err(value) => value,
		};
		let replacement = Argument::Dependency {
			name: Arc::from(name.as_str()),
			value: Some(value),
		};
		self.entries.insert(name, replacement);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, replacement: impl Into<Argument>) {
		self.entries.insert(name.into(), replacement.into());
	}

	pub fn get(&self, name: &str) -> Option<&Argument> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Names being overridden, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Combines two maps; entries of `other` win.
	pub fn merged(&self, other: &Overrides) -> Overrides {
		let mut entries = self.entries.clone();
		entries.extend(
			other
				.entries
				.iter()
				.map(|(name, argument)| (name.clone(), argument.clone())),
		);
		Overrides { entries }
	}
}

impl fmt::Debug for Overrides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.names().into_iter().map(|name| (name, &self.entries[name])))
			.finish()
	}
}
