//! # Wiring
//!
//! Declarative dependency injection built from composition graphs.
//!
//! Application code depends on ports (traits or plain types). A context maps
//! each port to a recipe that builds it, and those recipes can be re-routed
//! per call without being mutated.
//!
//! ## Core Principles
//!
//! - **Declare, then resolve**: Graphs are plain data until a port is resolved
//! - **Fresh by default**: Every resolution builds new instances
//! - **Substitution over mutation**: Overrides produce a transient view of the graph
//! - **Typed keys**: Ports are identified by `TypeId`, never by name
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wiring::prelude::*;
//!
//! trait Mailer: Send + Sync {
//! 	fn send(&self, to: &str) -> String;
//! }
//!
//! struct Smtp {
//! 	host: String,
//! }
//!
//! impl Mailer for Smtp {
//! 	fn send(&self, to: &str) -> String {
//! 		format!("{to} via {}", self.host)
//! 	}
//! }
//!
//! struct MailContext;
//!
//! impl ContextDefinition for MailContext {
//! 	fn declare(builder: ContextBuilder) -> ContextBuilder {
//! 		builder.register(
//! 			Composite::new(|args| {
//! 				Ok(Arc::new(Smtp {
//! 					host: args.named("host")?,
//! 				}) as Arc<dyn Mailer>)
//! 			})
//! 			.kwarg("host", Dependency::new("host", "localhost".to_string())),
//! 		)
//! 	}
//! }
//!
//! let notify = inject::<MailContext>().wrap(
//! 	Signature::new().positional("to").port::<Arc<dyn Mailer>>("mailer"),
//! 	|args| -> DiResult<String> {
//! 		let mailer: Arc<dyn Mailer> = args.get("mailer")?;
//! 		Ok(mailer.send(&args.get::<String>("to")?))
//! 	},
//! );
//!
//! let sent = notify.call(CallArgs::new().arg("ada@example.com".to_string())).unwrap().unwrap();
//! assert_eq!(sent, "ada@example.com via localhost");
//! ```

pub use wiring_di::*;

/// Re-exports for building and consuming contexts.
pub mod prelude {
	// Graph
	pub use wiring_di::{Argument, Composite, Dependency, Overrides, Strategy};

	// Contexts
	pub use wiring_di::{
		Context, ContextBuilder, ContextDefinition, ContextRegistry, ContextSettings, FromContext,
		Injected, OptionalInjected,
	};

	// Injection
	pub use wiring_di::{CallArgs, Signature, inject};

	// Errors
	pub use wiring_di::{DiError, DiResult};
}
