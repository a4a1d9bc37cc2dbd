//! Port identity
//!
//! Every registry in this crate is keyed by [`PortKey`]. The key carries the
//! `TypeId` of the port type, which is what equality and hashing use, and the
//! type's path name for display.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Composite key identifying a port.
///
/// # Examples
///
/// ```
/// use wiring_di::{Composite, PortKey};
///
/// struct Mailer;
///
/// assert_eq!(PortKey::of::<Mailer>(), PortKey::of_port::<Composite<Mailer>>());
/// assert!(PortKey::of::<Mailer>().name().ends_with("::Mailer"));
/// ```
#[derive(Clone, Copy)]
pub struct PortKey {
	type_id: TypeId,
	name: &'static str,
}

impl PortKey {
	/// Key of `T` used as its own port.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	/// Key of the port wrapped by `P`, one level of wrapping stripped.
	pub fn of_port<P: Port + ?Sized>() -> Self {
		Self::of::<P::Target>()
	}

	/// Module path and name of the port type.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}
}

impl PartialEq for PortKey {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for PortKey {}

impl Hash for PortKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for PortKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PortKey").field(&self.name).finish()
	}
}

impl fmt::Display for PortKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// A declaration that stands for some port type.
///
/// Graph nodes and references implement this so a context can file them
/// under the type they produce rather than under their own wrapper type.
pub trait Port {
	/// The port this declaration provides.
	type Target: ?Sized + 'static;
}
