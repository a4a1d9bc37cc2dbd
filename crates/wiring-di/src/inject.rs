//! Injection into plain functions
//!
//! [`inject`] ties a function to a context definition. The wrapped function
//! reads its parameters from [`BoundArguments`]; parameters declared with a
//! port are filled from the context, the rest come from the caller.
//!
//! ```
//! use wiring_di::{CallArgs, ContextBuilder, ContextDefinition, Signature, inject};
//!
//! #[derive(Clone)]
//! struct Prefix(String);
//!
//! struct Greetings;
//!
//! impl ContextDefinition for Greetings {
//! 	fn declare(builder: ContextBuilder) -> ContextBuilder {
//! 		builder.bind(Prefix("Hello".to_string()))
//! 	}
//! }
//!
//! let greet = inject::<Greetings>().wrap(
//! 	Signature::new().positional("name").port::<Prefix>("prefix"),
//! 	|args| -> wiring_di::DiResult<String> {
//! 		let name: String = args.get("name")?;
//! 		let prefix: Prefix = args.get("prefix")?;
//! 		Ok(format!("{} {name}", prefix.0))
//! 	},
//! );
//!
//! let message = greet.call(CallArgs::new().arg("Mars".to_string())).unwrap().unwrap();
//! assert_eq!(message, "Hello Mars");
//! ```

use crate::context::{Context, ContextDefinition};
use crate::parameters::{BoundArguments, CallArgs, ParameterResolver, Signature};
use crate::registry::ContextRegistry;
use crate::DiResult;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Starts wrapping a function with the context definition `D`.
pub fn inject<D: ContextDefinition>() -> Inject<D> {
	Inject {
		_definition: PhantomData,
	}
}

/// Pending injection for context definition `D`.
pub struct Inject<D> {
	_definition: PhantomData<fn() -> D>,
}

impl<D: ContextDefinition> Inject<D> {
	/// Wraps `f`, whose parameters are described by `signature`.
	pub fn wrap<F, R>(self, signature: Signature, f: F) -> InjectedFn<D, F>
	where
		F: Fn(&BoundArguments) -> R,
	{
		InjectedFn {
			signature,
			f,
			_definition: PhantomData,
		}
	}
}

/// A function whose port parameters are resolved from a context.
pub struct InjectedFn<D, F> {
	signature: Signature,
	f: F,
	_definition: PhantomData<fn() -> D>,
}

impl<D, F, R> InjectedFn<D, F>
where
	D: ContextDefinition,
	F: Fn(&BoundArguments) -> R,
{
	/// Calls the function with the calling thread's context from the global
	/// registry.
	///
	/// The function's own return value comes back untouched; only failures
	/// while resolving its dependencies surface as `Err`.
	pub fn call(&self, args: CallArgs) -> DiResult<R> {
		self.call_with(ContextRegistry::global(), args)
	}

	/// Calls the function with the calling thread's context from `registry`.
	pub fn call_with(&self, registry: &ContextRegistry, args: CallArgs) -> DiResult<R> {
		let context = registry.get_instance::<D>();
		self.call_in(&context, args)
	}

	/// Calls the function with an explicit context.
	pub fn call_in(&self, context: &Context, args: CallArgs) -> DiResult<R> {
		context.initialize();
		let resolved = context.resolve_dependencies(&self.signature)?;
		tracing::trace!(
			context = context.name(),
			definition = type_name::<D>(),
			injected = resolved.len(),
			"invoking injected function"
		);
		let bound = ParameterResolver::new(&self.signature, args).bind(&resolved);
		Ok((self.f)(&bound))
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}
}

impl<D, F> fmt::Debug for InjectedFn<D, F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InjectedFn")
			.field("definition", &type_name::<D>())
			.field("signature", &self.signature)
			.finish_non_exhaustive()
	}
}
