//! Unit tests for Strategy nodes

use rstest::*;
use std::sync::Arc;
use wiring_di::{Composite, Dependency, DiError, Overrides, Selector, Strategy};

trait Notifier: Send + Sync {
	fn channel(&self) -> &'static str;
}

struct Email;

impl Notifier for Email {
	fn channel(&self) -> &'static str {
		"email"
	}
}

struct Sms;

impl Notifier for Sms {
	fn channel(&self) -> &'static str {
		"sms"
	}
}

#[fixture]
fn notifier() -> Strategy<Arc<dyn Notifier>> {
	Strategy::new(Dependency::new("channel", "sms".to_string()))
		.branch(
			"email",
			Composite::new(|_| Ok(Arc::new(Email) as Arc<dyn Notifier>)),
		)
		.branch("sms", Composite::new(|_| Ok(Arc::new(Sms) as Arc<dyn Notifier>)))
}

#[rstest]
fn resolves_the_selected_branch(notifier: Strategy<Arc<dyn Notifier>>) {
	// Act
	let selected = notifier.resolve().unwrap();

	// Assert
	assert_eq!(selected.channel(), "sms");
}

#[rstest]
fn changing_the_selector_affects_the_next_call(notifier: Strategy<Arc<dyn Notifier>>) {
	// Arrange
	let first = notifier.resolve().unwrap();

	// Act
	notifier.select(Dependency::new("channel", "email".to_string()));
	let second = notifier.resolve().unwrap();

	// Assert
	assert_eq!(first.channel(), "sms");
	assert_eq!(second.channel(), "email");
}

#[rstest]
fn clones_share_the_selector(notifier: Strategy<Arc<dyn Notifier>>) {
	// Arrange
	let registered = notifier.clone();

	// Act
	notifier.select("email");

	// Assert
	assert_eq!(registered.resolve().unwrap().channel(), "email");
	assert!(matches!(registered.selector(), Selector::Key(key) if key == "email"));
}

#[rstest]
#[case::owned(Overrides::new().value("channel", "email".to_string()))]
#[case::borrowed(Overrides::new().value("channel", "email"))]
fn selector_override_accepts_strings(
	notifier: Strategy<Arc<dyn Notifier>>,
	#[case] overrides: Overrides,
) {
	// Act
	let overridden = notifier.scoped_override(&overrides).unwrap();

	// Assert
	assert_eq!(overridden.channel(), "email");
	assert_eq!(notifier.resolve().unwrap().channel(), "sms");
}

#[rstest]
fn missing_branch_lists_available_keys(notifier: Strategy<Arc<dyn Notifier>>) {
	// Arrange
	notifier.select("pigeon");

	// Act
	let result = notifier.resolve();

	// Assert
	match result {
		Err(DiError::StrategyNotFound { key, available }) => {
			assert_eq!(key, "pigeon");
			assert_eq!(available, vec!["email", "sms"]);
		}
		Err(other) => panic!("unexpected error: {other}"),
		Ok(_) => panic!("resolution should fail"),
	}
}

#[rstest]
fn overrides_reach_the_chosen_branch() {
	// Arrange
	let greeting = Strategy::new("formal")
		.branch(
			"formal",
			Composite::new(|args| Ok(format!("Good day, {}", args.named::<String>("name")?)))
				.kwarg("name", Dependency::new("name", "World".to_string())),
		)
		.branch("casual", Composite::new(|_| Ok("Hey".to_string())));
	let overrides = Overrides::new().value("name", "Mars".to_string());

	// Act
	let result = greeting.scoped_override(&overrides).unwrap();

	// Assert
	assert_eq!(result, "Good day, Mars");
	assert_eq!(greeting.keys(), vec!["casual", "formal"]);
}

#[rstest]
fn nested_strategy_resolves_inside_a_composite(notifier: Strategy<Arc<dyn Notifier>>) {
	// Arrange
	let report = Composite::new(|args| {
		let notifier: Arc<dyn Notifier> = args.get(0)?;
		Ok(format!("via {}", notifier.channel()))
	})
	.arg(notifier);
	let overrides = Overrides::new().value("channel", "email".to_string());

	// Act
	let default = report.resolve().unwrap();
	let overridden = report.scoped_override(&overrides).unwrap();

	// Assert
	assert_eq!(default, "via sms");
	assert_eq!(overridden, "via email");
}
