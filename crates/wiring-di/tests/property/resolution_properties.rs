//! Property-based tests for composition graph resolution
//!
//! Uses proptest to verify invariants of graph resolution:
//! 1. Resolution equals applying the factory to the resolved arguments
//! 2. Overrides never mutate the node
//! 3. Overriding a name the graph does not use changes nothing
//! 4. Strategy resolution follows the selector

use proptest::prelude::*;
use wiring_di::{Argument, Composite, Dependency, Overrides, Strategy};

fn weighted_sum(values: &[i64], named: &[i64]) -> Composite<i64> {
	let mut node = Composite::new(|args| {
		let mut total = 0i64;
		for index in 0..args.positional_len() {
			total = total.wrapping_add(args.get::<i64>(index)?.wrapping_mul(index as i64 + 1));
		}
		for name in args.names().map(str::to_string).collect::<Vec<_>>() {
			total = total.wrapping_add(args.named::<i64>(&name)?);
		}
		Ok(total)
	});
	for value in values {
		node = node.arg(Argument::value(*value));
	}
	for (index, value) in named.iter().enumerate() {
		let name = format!("n{index}");
		node = node.kwarg(name.clone(), Dependency::new(name, *value));
	}
	node
}

fn expected_sum(values: &[i64], named: &[i64]) -> i64 {
	let positional = values
		.iter()
		.enumerate()
		.fold(0i64, |total, (index, value)| {
			total.wrapping_add(value.wrapping_mul(index as i64 + 1))
		});
	named.iter().fold(positional, |total, value| total.wrapping_add(*value))
}

proptest! {
	#[test]
	fn resolution_applies_factory_to_resolved_arguments(
		values in prop::collection::vec(any::<i64>(), 0..8),
		named in prop::collection::vec(any::<i64>(), 0..8),
	) {
		let node = weighted_sum(&values, &named);

		prop_assert_eq!(node.resolve().unwrap(), expected_sum(&values, &named));
	}

	#[test]
	fn nested_nodes_resolve_like_their_values(
		inner in prop::collection::vec(any::<i64>(), 0..6),
		outer in prop::collection::vec(any::<i64>(), 0..6),
	) {
		let node = Composite::new(|args| {
			Ok(args.get::<i64>(0)?.wrapping_add(args.get::<i64>(1)?))
		})
		.arg(weighted_sum(&inner, &[]))
		.arg(weighted_sum(&outer, &[]));

		prop_assert_eq!(
			node.resolve().unwrap(),
			expected_sum(&inner, &[]).wrapping_add(expected_sum(&outer, &[]))
		);
	}

	#[test]
	fn overrides_leave_the_node_untouched(
		named in prop::collection::vec(any::<i64>(), 1..6),
		replacement in any::<i64>(),
	) {
		let node = weighted_sum(&[], &named);
		let before = node.named_args().to_vec();
		let overrides = Overrides::new().value("n0", replacement);

		let overridden = node.scoped_override(&overrides).unwrap();
		let mut swapped = named.clone();
		swapped[0] = replacement;

		prop_assert_eq!(overridden, expected_sum(&[], &swapped));
		prop_assert_eq!(node.named_args(), before.as_slice());
		prop_assert_eq!(node.resolve().unwrap(), expected_sum(&[], &named));
	}

	#[test]
	fn unknown_override_names_change_nothing(
		named in prop::collection::vec(any::<i64>(), 0..6),
		name in "[a-m][a-z]{0,8}",
		replacement in any::<i64>(),
	) {
		let node = weighted_sum(&[], &named);
		let overrides = Overrides::new().value(name, replacement);

		prop_assert_eq!(
			node.scoped_override(&overrides).unwrap(),
			node.resolve().unwrap()
		);
	}

	#[test]
	fn strategy_follows_its_selector(
		keys in prop::collection::btree_set("[a-z]{1,6}", 1..6),
		pick in any::<prop::sample::Index>(),
	) {
		let keys: Vec<String> = keys.into_iter().collect();
		let strategy = keys.iter().fold(
			Strategy::new(keys[0].clone()),
			|strategy, key| {
				let label = key.clone();
				strategy.branch(key.clone(), Composite::new(move |_| Ok(label.clone())))
			},
		);
		let chosen = pick.get(&keys).clone();

		strategy.select(chosen.clone());

		prop_assert_eq!(strategy.resolve().unwrap(), chosen);
	}
}
