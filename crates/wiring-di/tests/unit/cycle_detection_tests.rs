//! Unit tests for the resolution depth guard

use once_cell::sync::OnceCell;
use rstest::*;
use std::sync::Arc;
use wiring_di::depth::{DEFAULT_MAX_DEPTH, current_depth};
use wiring_di::{Composite, Context, ContextSettings, Dependency, DiError, Overrides, Strategy};

#[derive(Clone, Debug)]
struct Node(usize);

/// A composite whose factory resolves itself again.
fn self_referencing() -> Composite<Node> {
	let cell: Arc<OnceCell<Composite<Node>>> = Arc::new(OnceCell::new());
	let node = {
		let cell = Arc::clone(&cell);
		Composite::new(move |_| {
			let inner = cell.get().ok_or_else(|| DiError::construction("cycle not wired"))?;
			inner.resolve().map(|node| Node(node.0 + 1))
		})
	};
	let _ = cell.set(node.clone());
	node
}

fn chain(length: usize) -> Composite<Node> {
	(1..length).fold(Composite::new(|_| Ok(Node(1))), |inner, _| {
		Composite::new(|args| args.get::<Node>(0).map(|node| Node(node.0 + 1))).arg(inner)
	})
}

#[rstest]
fn cycle_fails_instead_of_overflowing() {
	// Act
	let result = self_referencing().resolve();

	// Assert
	match result {
		Err(DiError::MaxDepthExceeded { depth, path }) => {
			assert_eq!(depth, DEFAULT_MAX_DEPTH + 1);
			assert!(path.contains("Node"));
			assert!(path.contains("..."));
		}
		other => panic!("unexpected result: {other:?}"),
	}
	assert_eq!(current_depth(), 0);
}

#[rstest]
fn strategy_selected_by_itself_fails_instead_of_overflowing() {
	// Arrange
	let strategy = Strategy::new(Dependency::new("key", "a".to_string()))
		.branch("a", Composite::new(|_| Ok("leaf".to_string())));
	let overrides = Overrides::new().with("key", strategy.clone());

	// Act
	let result = strategy.scoped_override(&overrides);

	// Assert
	match result {
		Err(DiError::MaxDepthExceeded { depth, path }) => {
			assert_eq!(depth, DEFAULT_MAX_DEPTH + 1);
			assert!(path.contains("String"));
		}
		other => panic!("unexpected result: {other:?}"),
	}
	assert_eq!(current_depth(), 0);
	assert_eq!(strategy.resolve().unwrap(), "leaf");
}

#[rstest]
fn deep_acyclic_chain_within_the_limit_resolves() {
	// Act
	let result = chain(DEFAULT_MAX_DEPTH).resolve();

	// Assert
	assert_eq!(result.unwrap().0, DEFAULT_MAX_DEPTH);
	assert_eq!(current_depth(), 0);
}

#[rstest]
#[case::within(4, true)]
#[case::beyond(5, false)]
fn context_settings_bound_the_depth(#[case] length: usize, #[case] resolves: bool) {
	// Arrange
	let context = Context::builder()
		.register(chain(length))
		.settings(ContextSettings::default().with_max_resolution_depth(4))
		.build();
	context.initialize();

	// Act
	let result = context.resolve::<Node>();

	// Assert
	assert_eq!(result.is_ok(), resolves);
	if !resolves {
		assert!(matches!(result, Err(DiError::MaxDepthExceeded { depth: 5, .. })));
	}
}

#[rstest]
fn limit_is_restored_after_a_context_walk() {
	// Arrange
	let context = Context::builder()
		.register(chain(2))
		.settings(ContextSettings::default().with_max_resolution_depth(2))
		.build();
	context.initialize();
	context.resolve::<Node>().unwrap();

	// Act
	let result = chain(10).resolve();

	// Assert
	assert_eq!(result.unwrap().0, 10);
}
