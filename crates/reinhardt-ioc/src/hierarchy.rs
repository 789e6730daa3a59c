//! Declared assignability between service types
//!
//! Rust trait objects carry no inheritance information at runtime, so the
//! "is assignable from" relation used by
//! [`Container::resolve_all_type`](crate::Container::resolve_all_type) is
//! declared explicitly, e.g. `dyn FileLog` is assignable to `dyn Log`.

use crate::key::TypeKey;
use std::collections::{HashMap, HashSet};

/// Declared subtype edges between types.
#[derive(Debug, Default, Clone)]
pub struct TypeHierarchy {
	supertypes: HashMap<TypeKey, Vec<TypeKey>>,
}

impl TypeHierarchy {
	/// Creates a hierarchy with no declarations.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares that values of `sub` are assignable to `sup`.
	pub fn declare(&mut self, sub: TypeKey, sup: TypeKey) {
		let supertypes = self.supertypes.entry(sub).or_default();
		if !supertypes.contains(&sup) {
			supertypes.push(sup);
		}
	}

	/// Returns true if a value of `source` may be used where `target` is
	/// expected: the types are equal, or `target` is reachable from `source`
	/// through declared edges.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_ioc::{TypeHierarchy, TypeKey};
	///
	/// trait Log {}
	/// trait FileLog: Log {}
	///
	/// let mut hierarchy = TypeHierarchy::new();
	/// hierarchy.declare(TypeKey::of::<dyn FileLog>(), TypeKey::of::<dyn Log>());
	///
	/// assert!(hierarchy.is_assignable(&TypeKey::of::<dyn Log>(), &TypeKey::of::<dyn FileLog>()));
	/// assert!(!hierarchy.is_assignable(&TypeKey::of::<dyn FileLog>(), &TypeKey::of::<dyn Log>()));
	/// ```
	pub fn is_assignable(&self, target: &TypeKey, source: &TypeKey) -> bool {
		if target == source {
			return true;
		}

		let mut visited = HashSet::new();
		let mut pending = vec![*source];
		while let Some(current) = pending.pop() {
			if !visited.insert(current) {
				continue;
			}
			for sup in self.supertypes.get(&current).into_iter().flatten() {
				if sup == target {
					return true;
				}
				pending.push(*sup);
			}
		}
		false
	}

	/// Direct supertypes declared for `ty`.
	pub fn supertypes_of(&self, ty: &TypeKey) -> &[TypeKey] {
		self.supertypes.get(ty).map(Vec::as_slice).unwrap_or_default()
	}
}
