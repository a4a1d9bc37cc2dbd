//! Typed assembly from a context
//!
//! [`Injected<T>`] holds a port resolved from a [`Context`] and derefs to it.
//! Any tuple of injectable types implements [`FromContext`], which turns a
//! hand-written constructor into compile-time checked wiring:
//!
//! ```
//! use wiring_di::{Composite, Context, Dependency, Injected, OptionalInjected};
//!
//! #[derive(Clone)]
//! struct Config {
//! 	dsn: String,
//! }
//!
//! let context = Context::builder()
//! 	.register(Composite::new(|args| Ok(Config { dsn: args.named("dsn")? }))
//! 		.kwarg("dsn", Dependency::new("dsn", "sqlite://".to_string())))
//! 	.build();
//! context.initialize();
//!
//! let dsn = context
//! 	.invoke(|(config, missing): (Injected<Config>, OptionalInjected<u64>)| {
//! 		assert!(missing.is_none());
//! 		config.dsn.clone()
//! 	})
//! 	.unwrap();
//! assert_eq!(dsn, "sqlite://");
//! ```

use crate::argument::unshare;
use crate::context::Context;
use crate::key::Port;
use crate::DiResult;
use std::ops::Deref;
use std::sync::Arc;

/// Injected dependency wrapper
///
/// Wraps an `Arc<T>` resolved from a context, with transparent access via
/// `Deref`.
#[derive(Debug)]
pub struct Injected<T> {
	inner: Arc<T>,
}

/// An injected port that may not be registered.
pub type OptionalInjected<T> = Option<Injected<T>>;

impl<T> Injected<T> {
	/// Create from value for testing
	///
	/// # Examples
	///
	/// ```
	/// use wiring_di::Injected;
	///
	/// let injected = Injected::from_value(10u32);
	/// assert_eq!(*injected, 10);
	/// ```
	pub fn from_value(value: T) -> Self {
		Self {
			inner: Arc::new(value),
		}
	}

	pub fn as_arc(&self) -> &Arc<T> {
		&self.inner
	}
}

impl<T: Clone> Injected<T> {
	/// Extract inner value
	pub fn into_inner(self) -> T {
		unshare(self.inner)
	}
}

impl<T> Clone for Injected<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Deref for Injected<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.inner
	}
}

impl<T> AsRef<T> for Injected<T> {
	fn as_ref(&self) -> &T {
		&self.inner
	}
}

impl<T: 'static> Port for Injected<T> {
	type Target = T;
}

/// Types that can be assembled from a context.
pub trait FromContext: Sized {
	fn from_context(context: &Context) -> DiResult<Self>;
}

impl<T: Clone + Send + Sync + 'static> FromContext for Injected<T> {
	fn from_context(context: &Context) -> DiResult<Self> {
		context.require::<T>().map(Injected::from_value)
	}
}

impl<T: Clone + Send + Sync + 'static> FromContext for Option<Injected<T>> {
	fn from_context(context: &Context) -> DiResult<Self> {
		context
			.resolve::<T>()
			.map(|value| value.map(Injected::from_value))
	}
}

impl FromContext for () {
	fn from_context(_context: &Context) -> DiResult<Self> {
		Ok(())
	}
}

macro_rules! impl_from_context_for_tuple {
	($($ty:ident),+) => {
		impl<$($ty: FromContext),+> FromContext for ($($ty,)+) {
			fn from_context(context: &Context) -> DiResult<Self> {
				Ok(($($ty::from_context(context)?,)+))
			}
		}
	};
}

impl_from_context_for_tuple!(A);
impl_from_context_for_tuple!(A, B);
impl_from_context_for_tuple!(A, B, C);
impl_from_context_for_tuple!(A, B, C, D);
impl_from_context_for_tuple!(A, B, C, D, E);
impl_from_context_for_tuple!(A, B, C, D, E, F);
impl_from_context_for_tuple!(A, B, C, D, E, F, G);
impl_from_context_for_tuple!(A, B, C, D, E, F, G, H);

impl Context {
	/// Resolves a typed parameter list.
	///
	/// Parameters are resolved in tuple order.
	pub fn assemble<A: FromContext>(&self) -> DiResult<A> {
		A::from_context(self)
	}

	/// Resolves `f`'s parameters and calls it.
	pub fn invoke<A, R>(&self, f: impl FnOnce(A) -> R) -> DiResult<R>
	where
		A: FromContext,
	{
		self.assemble().map(f)
	}
}
