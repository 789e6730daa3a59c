//! Registry tables
//!
//! A [`Table`] is an insertion-ordered map with indexer semantics: reads
//! return `None` instead of failing, writes upsert unconditionally and keep
//! the first position of an overwritten key.

use crate::component::ComponentType;
use crate::instance::Instance;
use crate::key::{NamedKey, RelationKey};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// Insertion-ordered lookup table.
pub struct Table<K, V> {
	entries: IndexMap<K, V>,
}

/// (service type, name) to the concrete type constructed for it.
pub type MappingTable = Table<NamedKey, ComponentType>;

/// (service type, name) to a registered instance; `None` is a registered null.
pub type InstanceTable = Table<NamedKey, Option<Instance>>;

/// (context type, base type) to the concrete type constructed for it.
pub type RelationTable = Table<RelationKey, ComponentType>;

impl<K: Hash + Eq, V> Table<K, V> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &K) -> Option<&V> {
		self.entries.get(key)
	}

	/// Stores `value` under `key`, returning the value it replaced.
	pub fn set(&mut self, key: K, value: V) -> Option<V> {
		self.entries.insert(key, value)
	}

	/// Returns true if `key` has a value.
	pub fn contains(&self, key: &K) -> bool {
		self.entries.contains_key(key)
	}

	/// Removes every entry.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the table has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
		self.entries.iter()
	}
}

impl<K: Hash + Eq, V> Default for Table<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Table<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.entries.iter()).finish()
	}
}
