//! Per-type metadata cache
//!
//! Descriptors are run once per component type and the frozen
//! [`TypeMetadata`] is shared afterwards. Entries are never invalidated:
//! a descriptor is a static property of its type. The cache is an explicit
//! object, so containers that should share it hold the same `Arc`.

use crate::component::{ComponentType, TypeMetadata};
use crate::key::TypeKey;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Append-only cache of [`TypeMetadata`] keyed by component type.
#[derive(Default)]
pub struct MetadataCache {
	entries: RwLock<HashMap<TypeId, Arc<TypeMetadata>>>,
}

impl MetadataCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached metadata of `component`, describing it on first use.
	///
	/// The descriptor runs outside the lock; if two callers race on the first
	/// build, the first one stored wins and both receive it.
	pub fn get_or_build(&self, component: &ComponentType) -> Arc<TypeMetadata> {
		let id = component.key().id();
		if let Some(metadata) = self.entries.read().get(&id) {
			return Arc::clone(metadata);
		}

		let built = Arc::new(component.describe());
		tracing::debug!(
			component = %component.key(),
			constructors = built.constructors().len(),
			properties = built.properties().len(),
			fields = built.fields().len(),
			"built component metadata"
		);
		Arc::clone(self.entries.write().entry(id).or_insert(built))
	}

	/// Returns the cached metadata of `ty` without building it.
	pub fn get(&self, ty: &TypeKey) -> Option<Arc<TypeMetadata>> {
		self.entries.read().get(&ty.id()).cloned()
	}

	/// Returns true if `ty` has been described.
	pub fn contains(&self, ty: &TypeKey) -> bool {
		self.entries.read().contains_key(&ty.id())
	}

	/// Number of described types.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns true if nothing has been described yet.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

impl std::fmt::Debug for MetadataCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MetadataCache")
			.field("len", &self.len())
			.finish()
	}
}
