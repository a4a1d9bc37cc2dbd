//! # Wiring Dependency Injection
//!
//! Declarative object composition with swappable implementations.
//!
//! ## Features
//!
//! - **Composite nodes**: Recipes that build a value from positional and named arguments
//! - **Named dependencies**: Placeholders that can be replaced per call without mutation
//! - **Strategies**: Runtime choice between implementations, keyed by a selector
//! - **Contexts**: Port to implementation maps, declared once per context type
//! - **Injection**: Plain functions get their port parameters filled from a context
//! - **Thread isolation**: One context instance per context type and thread
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wiring_di::{
//! 	CallArgs, Composite, ContextBuilder, ContextDefinition, Dependency, Overrides, Signature,
//! 	inject,
//! };
//!
//! trait Greeter: Send + Sync {
//! 	fn greet(&self) -> String;
//! }
//!
//! struct Hello {
//! 	name: String,
//! }
//!
//! impl Greeter for Hello {
//! 	fn greet(&self) -> String {
//! 		format!("Hello {}", self.name)
//! 	}
//! }
//!
//! // Build a node and resolve it with a one-off override
//! let greeter = Composite::new(|args| {
//! 	Ok(Arc::new(Hello {
//! 		name: args.named("name")?,
//! 	}) as Arc<dyn Greeter>)
//! })
//! .kwarg("name", Dependency::new("name", "World".to_string()));
//!
//! assert_eq!(greeter.resolve().unwrap().greet(), "Hello World");
//! let mars = Overrides::new().value("name", "Mars".to_string());
//! assert_eq!(greeter.scoped_override(&mars).unwrap().greet(), "Hello Mars");
//! assert_eq!(greeter.resolve().unwrap().greet(), "Hello World");
//!
//! // Register it in a context and inject it into a function
//! struct AppContext;
//!
//! impl ContextDefinition for AppContext {
//! 	fn declare(builder: ContextBuilder) -> ContextBuilder {
//! 		builder.register(
//! 			Composite::new(|args| {
//! 				Ok(Arc::new(Hello {
//! 					name: args.named("name")?,
//! 				}) as Arc<dyn Greeter>)
//! 			})
//! 			.kwarg("name", Dependency::new("name", "World".to_string())),
//! 		)
//! 	}
//! }
//!
//! let welcome = inject::<AppContext>().wrap(
//! 	Signature::new().port::<Arc<dyn Greeter>>("greeter"),
//! 	|args| args.get::<Arc<dyn Greeter>>("greeter").map(|greeter| greeter.greet()),
//! );
//! assert_eq!(welcome.call(CallArgs::new()).unwrap().unwrap(), "Hello World");
//! ```
//!
//! ## Overrides
//!
//! Overrides never touch the node they are applied to. Every resolution builds
//! the argument tree it needs from the node plus the override map, so a failed
//! factory leaves nothing to restore and concurrent callers cannot observe each
//! other's overrides. Overrides reach dependencies at any nesting depth.
//!
//! ## Recursion
//!
//! Resolution depth is bounded per thread (see [`depth`]). Exceeding the bound
//! fails with [`DiError::MaxDepthExceeded`] naming the chain of nodes.

pub mod argument;
pub mod composite;
pub mod context;
pub mod dependency;
pub mod depth;
pub mod error;
pub mod inject;
pub mod injected;
pub mod key;
pub mod parameters;
pub mod registry;
pub mod settings;
pub mod strategy;

pub use argument::{AnyValue, Argument, Arguments, Overrides};
pub use composite::{Composite, Resolvable};
pub use context::{Context, ContextBuilder, ContextDefinition};
pub use dependency::Dependency;
pub use error::{DiError, DiResult};
pub use inject::{Inject, InjectedFn, inject};
pub use injected::{FromContext, Injected, OptionalInjected};
pub use key::{Port, PortKey};
pub use parameters::{
	BoundArguments, CallArgs, Parameter, ParameterKind, ParameterResolver, Signature,
};
pub use registry::ContextRegistry;
pub use settings::ContextSettings;
pub use strategy::{Selector, Strategy};
