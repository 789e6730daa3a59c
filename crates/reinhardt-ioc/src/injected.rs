//! Injectable members
//!
//! [`Inject`] is the marker attached to a member in a component descriptor;
//! [`Injected`] is the slot type used for injectable fields.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Marker requesting injection of a member, with an optional name qualifier.
///
/// # Examples
///
/// ```
/// use reinhardt_ioc::Inject;
///
/// assert_eq!(Inject::new().name(), None);
/// assert_eq!(Inject::named("replica").name(), Some("replica"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inject {
	name: Option<String>,
}

impl Inject {
	/// Marker resolving the default (unnamed) registration.
	pub fn new() -> Self {
		Self { name: None }
	}

	/// Marker resolving the registration named `name`.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
		}
	}

	/// Returns the name qualifier.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

/// Field slot filled in by injection.
///
/// The slot is interior-mutable so that a component shared behind an `Arc`
/// can still be injected after construction. Injecting again overwrites the
/// previous value.
///
/// # Examples
///
/// ```
/// use reinhardt_ioc::Injected;
/// use std::sync::Arc;
///
/// let slot: Injected<str> = Injected::new();
/// assert!(!slot.is_set());
///
/// slot.set(Some(Arc::from("ready")));
/// assert_eq!(slot.get().as_deref(), Some("ready"));
/// ```
pub struct Injected<S: ?Sized> {
	slot: RwLock<Option<Arc<S>>>,
}

impl<S: ?Sized> Injected<S> {
	/// Creates an empty slot.
	pub fn new() -> Self {
		Self {
			slot: RwLock::new(None),
		}
	}

	/// Returns the injected value.
	pub fn get(&self) -> Option<Arc<S>> {
		self.slot.read().clone()
	}

	/// Replaces the injected value.
	pub fn set(&self, value: Option<Arc<S>>) {
		*self.slot.write() = value;
	}

	/// Returns true if a value is present.
	pub fn is_set(&self) -> bool {
		self.slot.read().is_some()
	}
}

impl<S: ?Sized> Default for Injected<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: ?Sized> fmt::Debug for Injected<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Injected")
			.field("is_set", &self.is_set())
			.finish()
	}
}
