//! Parameter resolution for injected callables
//!
//! A callable that wants injection declares its parameters with a
//! [`Signature`]. Parameters tied to a port are filled from resolved
//! dependencies; every other parameter takes what the caller passed in
//! [`CallArgs`]. The merged result is a [`BoundArguments`] the callable reads
//! by parameter name.

use crate::argument::{AnyValue, unshare};
use crate::key::{Port, PortKey};
use crate::{DiError, DiResult};
use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// How a parameter can be supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
	/// Only by position.
	PositionalOnly,
	/// By position, or by name.
	PositionalOrKeyword,
	/// Only by name.
	KeywordOnly,
	/// Catch-all for keywords no other parameter takes.
	VarKeyword,
}

impl ParameterKind {
	pub fn is_positional(self) -> bool {
		matches!(self, Self::PositionalOnly | Self::PositionalOrKeyword)
	}

	pub fn is_keyword(self) -> bool {
		matches!(self, Self::KeywordOnly | Self::VarKeyword)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
	name: String,
	kind: ParameterKind,
	port: Option<PortKey>,
}

impl Parameter {
	pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
		Self {
			name: name.into(),
			kind,
			port: None,
		}
	}

	/// Ties the parameter to the port `T`.
	pub fn with_port<T: ?Sized + 'static>(mut self) -> Self {
		self.port = Some(PortKey::of::<T>());
		self
	}

	/// Ties the parameter to the port `P` stands for, as a context files it.
	///
	/// `Injected<Clock>` and `Composite<Clock>` both key the parameter by
	/// `Clock`.
	pub fn with_port_of<P: Port + ?Sized>(mut self) -> Self {
		self.port = Some(PortKey::of_port::<P>());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> ParameterKind {
		self.kind
	}

	pub fn port(&self) -> Option<PortKey> {
		self.port
	}
}

/// Declared parameter list of a callable.
///
/// # Examples
///
/// ```
/// use wiring_di::{ParameterKind, Signature};
///
/// struct Mailer;
///
/// let signature = Signature::new()
/// 	.positional("to")
/// 	.keyword_only("subject")
/// 	.port::<Mailer>("mailer");
///
/// assert_eq!(signature.len(), 3);
/// assert_eq!(signature.parameters()[2].kind(), ParameterKind::PositionalOrKeyword);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
	parameters: Vec<Parameter>,
}

impl Signature {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn parameter(mut self, parameter: Parameter) -> Self {
		self.parameters.push(parameter);
		self
	}

	/// Positional-or-keyword parameter supplied by the caller.
	pub fn positional(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::PositionalOrKeyword))
	}

	pub fn positional_only(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::PositionalOnly))
	}

	pub fn keyword_only(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::KeywordOnly))
	}

	pub fn var_keyword(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::VarKeyword))
	}

	/// Positional-or-keyword parameter typed as the port `T`.
	pub fn port<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::PositionalOrKeyword).with_port::<T>())
	}

	/// Keyword-only parameter typed as the port `T`.
	pub fn keyword_port<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::KeywordOnly).with_port::<T>())
	}

	/// Positional-or-keyword parameter declared through a wrapper such as
	/// `Injected<T>`, keyed by the port the wrapper stands for.
	pub fn injected<P: Port + ?Sized>(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::PositionalOrKeyword).with_port_of::<P>())
	}

	pub fn keyword_injected<P: Port + ?Sized>(self, name: impl Into<String>) -> Self {
		self.parameter(Parameter::new(name, ParameterKind::KeywordOnly).with_port_of::<P>())
	}

	pub fn parameters(&self) -> &[Parameter] {
		&self.parameters
	}

	pub fn len(&self) -> usize {
		self.parameters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parameters.is_empty()
	}
}

/// Arguments supplied at the call site.
#[derive(Clone, Default)]
pub struct CallArgs {
	positional: Vec<AnyValue>,
	keyword: Vec<(String, AnyValue)>,
}

impl CallArgs {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn arg<T: Send + Sync + 'static>(mut self, value: T) -> Self {
		self.positional.push(Arc::new(value));
		self
	}

	pub fn kwarg<T: Send + Sync + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
		let name = name.into();
		let value: AnyValue = Arc::new(value);
		match self.keyword.iter_mut().find(|(existing, _)| *existing == name) {
			Some((_, slot)) => *slot = value,
			None => self.keyword.push((name, value)),
		}
		self
	}

	pub fn positional_len(&self) -> usize {
		self.positional.len()
	}

	fn keyword(&self, name: &str) -> Option<&AnyValue> {
		self.keyword
			.iter()
			.find(|(candidate, _)| candidate == name)
			.map(|(_, value)| value)
	}
}

impl fmt::Debug for CallArgs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CallArgs")
			.field("positional", &self.positional.len())
			.field("keyword", &self.keyword.iter().map(|(n, _)| n).collect::<Vec<_>>())
			.finish()
	}
}

/// Final parameter values for one call.
pub struct BoundArguments {
	values: Vec<(String, Option<AnyValue>)>,
	extra: Vec<(String, AnyValue)>,
}

impl BoundArguments {
	/// Value of parameter `name`, failing when it was not supplied.
	pub fn get<T: Clone + Send + Sync + 'static>(&self, name: &str) -> DiResult<T> {
		self.get_arc(name).map(unshare)
	}

	/// Value of parameter `name`, `None` when it was not supplied.
	pub fn get_opt<T: Clone + Send + Sync + 'static>(&self, name: &str) -> DiResult<Option<T>> {
		match self.lookup(name) {
			Some(value) => downcast(name, value).map(|value| Some(unshare(value))),
			None => Ok(None),
		}
	}

	pub fn get_arc<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
		let value = self
			.lookup(name)
			.ok_or_else(|| DiError::MissingParameter(name.to_string()))?;
		downcast(name, value)
	}

	/// Whether parameter `name` has a value.
	pub fn contains(&self, name: &str) -> bool {
		self.lookup(name).is_some()
	}

	/// Parameter names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.values.iter().map(|(name, _)| name.as_str())
	}

	/// Keywords collected by the var-keyword parameter.
	pub fn extra(&self) -> &[(String, AnyValue)] {
		&self.extra
	}

	fn lookup(&self, name: &str) -> Option<&AnyValue> {
		self.values
			.iter()
			.find(|(candidate, _)| candidate == name)
			.and_then(|(_, value)| value.as_ref())
	}
}

fn downcast<T: Send + Sync + 'static>(name: &str, value: &AnyValue) -> DiResult<Arc<T>> {
	Arc::clone(value)
		.downcast::<T>()
		.map_err(|_| DiError::ParameterType {
			parameter: name.to_string(),
			expected: type_name::<T>(),
		})
}

impl fmt::Debug for BoundArguments {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BoundArguments")
			.field(
				"values",
				&self
					.values
					.iter()
					.map(|(name, value)| (name, value.is_some()))
					.collect::<Vec<_>>(),
			)
			.field("extra", &self.extra.iter().map(|(n, _)| n).collect::<Vec<_>>())
			.finish()
	}
}

/// Merges resolved dependencies with caller arguments.
///
/// For parameters tied to a registered port the resolved value always wins,
/// even over an explicit caller value. Everything else is left to the caller:
///
/// - positional parameters take the caller's positional value at their
///   index, then (unless positional-only) a keyword of the same name
/// - keyword-only parameters take the caller's keyword of the same name
/// - the var-keyword parameter collects every caller keyword no other
///   parameter took
///
/// A parameter the caller did not supply stays empty.
pub struct ParameterResolver<'a> {
	signature: &'a Signature,
	args: CallArgs,
}

impl<'a> ParameterResolver<'a> {
	pub fn new(signature: &'a Signature, args: CallArgs) -> Self {
		Self { signature, args }
	}

	/// Values for the positional parameters, in declaration order.
	pub fn override_args(
		&self,
		resolved: &HashMap<PortKey, AnyValue>,
	) -> Vec<(String, Option<AnyValue>)> {
		self.signature
			.parameters()
			.iter()
			.filter(|parameter| parameter.kind().is_positional())
			.enumerate()
			.map(|(index, parameter)| {
				let value = injected(parameter, resolved)
					.or_else(|| self.args.positional.get(index).cloned())
					.or_else(|| match parameter.kind() {
						ParameterKind::PositionalOrKeyword => {
							self.args.keyword(parameter.name()).cloned()
						}
						_ => None,
					});
				(parameter.name().to_string(), value)
			})
			.collect()
	}

	/// Values for the keyword-only and var-keyword parameters.
	pub fn override_kwargs(
		&self,
		resolved: &HashMap<PortKey, AnyValue>,
	) -> Vec<(String, Option<AnyValue>)> {
		self.signature
			.parameters()
			.iter()
			.filter(|parameter| parameter.kind().is_keyword())
			.map(|parameter| {
				let value = injected(parameter, resolved).or_else(|| match parameter.kind() {
					ParameterKind::KeywordOnly => self.args.keyword(parameter.name()).cloned(),
					_ => None,
				});
				(parameter.name().to_string(), value)
			})
			.collect()
	}

	pub fn bind(self, resolved: &HashMap<PortKey, AnyValue>) -> BoundArguments {
		let mut values = self.override_args(resolved);
		values.extend(self.override_kwargs(resolved));

		if self.args.positional.len() > self.positional_count() {
			tracing::trace!(
				supplied = self.args.positional.len(),
				declared = self.positional_count(),
				"dropping surplus positional arguments"
			);
		}

		let extra = if self.accepts_var_keyword() {
			let taken: HashSet<&str> = self
				.signature
				.parameters()
				.iter()
				.filter(|parameter| parameter.kind() != ParameterKind::VarKeyword)
				.map(Parameter::name)
				.collect();
			self.args
				.keyword
				.iter()
				.filter(|(name, _)| !taken.contains(name.as_str()))
				.cloned()
				.collect()
		} else {
			Vec::new()
		};

		BoundArguments { values, extra }
	}

	fn positional_count(&self) -> usize {
		self.signature
			.parameters()
			.iter()
			.filter(|parameter| parameter.kind().is_positional())
			.count()
	}

	fn accepts_var_keyword(&self) -> bool {
		self.signature
			.parameters()
			.iter()
			.any(|parameter| parameter.kind() == ParameterKind::VarKeyword)
	}
}

fn injected(parameter: &Parameter, resolved: &HashMap<PortKey, AnyValue>) -> Option<AnyValue> {
	parameter
		.port()
		.and_then(|key| resolved.get(&key))
		.cloned()
}
