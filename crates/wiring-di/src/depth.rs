//! Thread-local resolution depth guard
//!
//! Composition graphs must be acyclic, and nothing checks that up front. A
//! cycle shows up as unbounded recursion during resolution, so every node
//! resolution registers itself here and fails once the stack grows past the
//! active limit. Resolution never suspends, so a thread-local stack follows
//! exactly one walk at a time.
//!
//! - **RAII**: `DepthGuard` pops the stack on drop, including on error paths
//! - **Scoped limits**: `with_limit` sets the limit for one top-level walk

use crate::{DiError, DiResult};
use std::cell::RefCell;

/// Default maximum resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

struct DepthState {
	limit: usize,
	/// Output types of the nodes being resolved, outermost first.
	path: Vec<&'static str>,
}

thread_local! {
	static DEPTH_STATE: RefCell<DepthState> = const {
		RefCell::new(DepthState {
			limit: DEFAULT_MAX_DEPTH,
			path: Vec::new(),
		})
	};
}

/// Record entry into a node's resolution.
///
/// The returned guard pops the entry when dropped.
pub(crate) fn enter(node: &'static str) -> DiResult<DepthGuard> {
	DEPTH_STATE.with(|state| {
		let mut state = state.borrow_mut();
		let depth = state.path.len() + 1;
		if depth > state.limit {
			let mut path = state.path.clone();
			path.push(node);
			return Err(DiError::MaxDepthExceeded {
				depth,
				path: render_path(&path),
			});
		}
		state.path.push(node);
		Ok(DepthGuard { _private: () })
	})
}

/// Run `f` with `limit` as the maximum depth.
///
/// Nested calls keep the outer limit: the limit belongs to the walk that
/// started first.
pub(crate) fn with_limit<R>(limit: usize, f: impl FnOnce() -> R) -> R {
	let outermost = DEPTH_STATE.with(|state| state.borrow().path.is_empty());
	if !outermost {
		return f();
	}

	let previous =
		DEPTH_STATE.with(|state| std::mem::replace(&mut state.borrow_mut().limit, limit));
	let _restore = LimitRestore(previous);
	f()
}

/// Current depth on this thread.
pub fn current_depth() -> usize {
	DEPTH_STATE.with(|state| state.borrow().path.len())
}

fn render_path(path: &[&'static str]) -> String {
	let shown: Vec<&str> = if path.len() > 8 {
		path.iter()
			.take(3)
			.copied()
			.chain(std::iter::once("..."))
			.chain(path[path.len() - 4..].iter().copied())
			.collect()
	} else {
		path.to_vec()
	};
	shown.join(" -> ")
}

/// RAII guard: pops the resolution stack on drop.
#[derive(Debug)]
pub(crate) struct DepthGuard {
	_private: (),
}

impl Drop for DepthGuard {
	fn drop(&mut self) {
		DEPTH_STATE.with(|state| {
			state.borrow_mut().path.pop();
		});
	}
}

struct LimitRestore(usize);

impl Drop for LimitRestore {
	fn drop(&mut self) {
		DEPTH_STATE.with(|state| state.borrow_mut().limit = self.0);
	}
}
