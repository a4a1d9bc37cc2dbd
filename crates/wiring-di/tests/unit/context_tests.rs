//! Unit tests for Context declaration, initialization and resolution

use rstest::*;
use std::sync::Arc;
use wiring_di::{
	Composite, Context, ContextBuilder, ContextDefinition, ContextSettings, Dependency, DiError,
	Injected, Overrides, PortKey, Strategy,
};

trait Greeter: Send + Sync {
	fn greet(&self) -> String;
}

struct Hello {
	name: String,
}

impl Greeter for Hello {
	fn greet(&self) -> String {
		format!("Hello {}", self.name)
	}
}

trait Storage: Send + Sync {
	fn kind(&self) -> &'static str;
}

struct Memory;

impl Storage for Memory {
	fn kind(&self) -> &'static str {
		"memory"
	}
}

struct Disk;

impl Storage for Disk {
	fn kind(&self) -> &'static str {
		"disk"
	}
}

struct GreetingContext;

impl ContextDefinition for GreetingContext {
	fn declare(builder: ContextBuilder) -> ContextBuilder {
		let name = Dependency::new("name", "World".to_string());
		builder
			.register(
				Composite::new(|args| {
					Ok(Arc::new(Hello {
						name: args.named("name")?,
					}) as Arc<dyn Greeter>)
				})
				.kwarg("name", name),
			)
			.register(
				Strategy::new(Dependency::new("storage", "memory".to_string()))
					.branch(
						"memory",
						Composite::new(|_| Ok(Arc::new(Memory) as Arc<dyn Storage>)),
					)
					.branch("disk", Composite::new(|_| Ok(Arc::new(Disk) as Arc<dyn Storage>))),
			)
	}
}

#[fixture]
fn context() -> Context {
	let context = Context::of::<GreetingContext>();
	context.initialize();
	context
}

#[rstest]
fn hello_world_then_mars_then_world(context: Context) {
	// Arrange
	let mars = Overrides::new().value("name", "Mars".to_string());

	// Act
	let plain = context.require::<Arc<dyn Greeter>>().unwrap();
	let overridden = context
		.resolve_with::<Arc<dyn Greeter>>(&mars)
		.unwrap()
		.unwrap();
	let again = context.require::<Arc<dyn Greeter>>().unwrap();

	// Assert
	assert_eq!(plain.greet(), "Hello World");
	assert_eq!(overridden.greet(), "Hello Mars");
	assert_eq!(again.greet(), "Hello World");
}

#[rstest]
fn initialize_twice_keeps_the_same_ports() {
	// Arrange
	let once = Context::of::<GreetingContext>();
	let twice = Context::of::<GreetingContext>();

	// Act
	once.initialize();
	twice.initialize();
	twice.initialize();

	// Assert
	assert_eq!(once.ports(), twice.ports());
	assert_eq!(twice.len(), 2);
}

#[rstest]
fn unregistered_type_is_none(context: Context) {
	// Act
	let result = context.resolve::<String>();

	// Assert
	assert!(matches!(result, Ok(None)));
}

#[rstest]
fn registered_ports_are_listed_by_key(context: Context) {
	// Act
	let ports = context.ports();

	// Assert
	assert!(ports.contains(&PortKey::of::<Arc<dyn Greeter>>()));
	assert!(ports.contains(&PortKey::of::<Arc<dyn Storage>>()));
	assert!(context.contains(&Context::composite_key::<Injected<Arc<dyn Storage>>>()));
	assert!(context.name().ends_with("GreetingContext"));
}

#[rstest]
fn strategy_port_follows_overrides(context: Context) {
	// Arrange
	let disk = Overrides::new().value("storage", "disk");

	// Act
	let default = context.require::<Arc<dyn Storage>>().unwrap();
	let overridden = context
		.resolve_with::<Arc<dyn Storage>>(&disk)
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(default.kind(), "memory");
	assert_eq!(overridden.kind(), "disk");
}

#[rstest]
fn settings_bind_strategy_selectors() {
	// Arrange
	let settings = ContextSettings::from_toml_str("[bindings]\nstorage = \"disk\"\n").unwrap();
	let context = GreetingContext::declare(Context::builder())
		.settings(settings)
		.build();
	context.initialize();

	// Act
	let storage = context.require::<Arc<dyn Storage>>().unwrap();

	// Assert
	assert_eq!(storage.kind(), "disk");
}

#[rstest]
fn mismatched_port_value_is_a_port_error() {
	// Arrange
	let context = Context::builder()
		.register_as(PortKey::of::<u32>(), wiring_di::Argument::value("not a number"))
		.build();
	context.initialize();

	// Act
	let result = context.resolve::<u32>();

	// Assert
	assert!(matches!(result, Err(DiError::PortType { expected: "u32", .. })));
}

#[rstest]
fn construction_errors_propagate() {
	// Arrange
	let context = Context::builder()
		.register(Composite::<u64>::new(|_| {
			"eleventy".parse::<u64>().map_err(DiError::construction)
		}))
		.build();
	context.initialize();

	// Act
	let result = context.resolve::<u64>();

	// Assert
	assert!(matches!(result, Err(DiError::Construction(_))));
}
