//! Lookup keys for the registry tables
//!
//! Every table is keyed by a [`KeyedPair`]: an immutable two-part key with
//! component-wise equality and a hash that is the exclusive-or of the
//! component hashes. An absent component (`None`) contributes `0`.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

/// Identifies a `'static` type, sized or not.
///
/// Equality and hashing only look at the [`TypeId`]; the type name is kept
/// for diagnostics.
///
/// # Examples
///
/// ```
/// use reinhardt_ioc::TypeKey;
///
/// trait Cache {}
///
/// let key = TypeKey::of::<dyn Cache>();
/// assert_eq!(key, TypeKey::of::<dyn Cache>());
/// assert_ne!(key, TypeKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	/// Returns the key of type `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	/// Returns the [`TypeId`] of this type.
	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Returns the human-readable type name.
	pub fn type_name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TypeKey").field(&self.name).finish()
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// A component of a [`KeyedPair`].
pub trait KeyPart: Eq {
	/// Hash contribution of this component.
	fn part_hash(&self) -> u64;
}

impl KeyPart for TypeKey {
	fn part_hash(&self) -> u64 {
		hash_of(&self.id)
	}
}

impl<T: Hash + Eq> KeyPart for Option<T> {
	fn part_hash(&self) -> u64 {
		self.as_ref().map_or(0, hash_of)
	}
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
	let mut hasher = DefaultHasher::new();
	value.hash(&mut hasher);
	hasher.finish()
}

/// Immutable two-part lookup key.
///
/// # Examples
///
/// ```
/// use reinhardt_ioc::{KeyedPair, TypeKey};
///
/// let a = KeyedPair::new(TypeKey::of::<u8>(), TypeKey::of::<u16>());
/// let b = KeyedPair::new(TypeKey::of::<u8>(), TypeKey::of::<u16>());
/// assert_eq!(a, b);
/// assert_eq!(a.combined_hash(), b.combined_hash());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedPair<A, B> {
	first: A,
	second: B,
}

impl<A, B> KeyedPair<A, B> {
	/// Creates a key from its two components.
	pub fn new(first: A, second: B) -> Self {
		Self { first, second }
	}

	/// Returns the first component.
	pub fn first(&self) -> &A {
		&self.first
	}

	/// Returns the second component.
	pub fn second(&self) -> &B {
		&self.second
	}
}

impl<A: KeyPart, B: KeyPart> KeyedPair<A, B> {
	/// Exclusive-or of the component hashes.
	pub fn combined_hash(&self) -> u64 {
		self.first.part_hash() ^ self.second.part_hash()
	}
}

impl<A: KeyPart, B: KeyPart> Hash for KeyedPair<A, B> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_u64(self.combined_hash());
	}
}

/// Optional name qualifier. Empty names are stored as `None`.
pub type Name = Option<Arc<str>>;

/// Key of the mapping and instance tables: a service type and an optional name.
pub type NamedKey = KeyedPair<TypeKey, Name>;

/// Key of the relation table: a context type and a base type.
pub type RelationKey = KeyedPair<TypeKey, TypeKey>;

impl NamedKey {
	/// Creates a key for `service` qualified by `name`.
	///
	/// An empty name is the same key as no name at all.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_ioc::{NamedKey, TypeKey};
	///
	/// let unnamed = NamedKey::named(TypeKey::of::<String>(), None);
	/// let empty = NamedKey::named(TypeKey::of::<String>(), Some(""));
	/// let primary = NamedKey::named(TypeKey::of::<String>(), Some("primary"));
	///
	/// assert_eq!(unnamed, empty);
	/// assert_ne!(unnamed, primary);
	/// ```
	pub fn named(service: TypeKey, name: Option<&str>) -> Self {
		Self::new(service, name.filter(|n| !n.is_empty()).map(Arc::from))
	}

	/// Returns the name qualifier, if any.
	pub fn name(&self) -> Option<&str> {
		self.second.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	trait Cache {}

	#[rstest]
	fn type_key_equality_ignores_name() {
		let key = TypeKey::of::<dyn Cache>();
		assert_eq!(key, TypeKey::of::<dyn Cache>());
		assert!(key.type_name().contains("Cache"));
	}

	#[rstest]
	fn absent_component_contributes_zero() {
		let service = TypeKey::of::<u32>();
		let key = NamedKey::named(service, None);
		assert_eq!(key.combined_hash(), service.part_hash());
	}

	#[rstest]
	fn hash_is_exclusive_or_of_parts() {
		let key = RelationKey::new(TypeKey::of::<u8>(), TypeKey::of::<u16>());
		assert_eq!(
			key.combined_hash(),
			TypeKey::of::<u8>().part_hash() ^ TypeKey::of::<u16>().part_hash()
		);
	}

	#[rstest]
	#[case(None, None, true)]
	#[case(Some(""), None, true)]
	#[case(Some("a"), Some("a"), true)]
	#[case(Some("a"), None, false)]
	#[case(Some("a"), Some("b"), false)]
	fn named_key_equality(
		#[case] left: Option<&str>,
		#[case] right: Option<&str>,
		#[case] equal: bool,
	) {
		let service = TypeKey::of::<String>();
		let left = NamedKey::named(service, left);
		let right = NamedKey::named(service, right);
		assert_eq!(left == right, equal);
	}

	#[rstest]
	fn named_key_works_as_map_key() {
		let mut map = HashMap::new();
		map.insert(NamedKey::named(TypeKey::of::<String>(), Some("db")), 1);

		assert_eq!(
			map.get(&NamedKey::named(TypeKey::of::<String>(), Some("db"))),
			Some(&1)
		);
		assert_eq!(map.get(&NamedKey::named(TypeKey::of::<String>(), None)), None);
	}
}
