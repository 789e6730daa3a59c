//! Erased object references

use crate::component::TypeMetadata;
use crate::error::{IocError, IocResult};
use crate::key::TypeKey;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased reference to a resolved object.
///
/// An instance remembers its runtime type and can be viewed as any service
/// type that type provides. Cloning is cheap and keeps reference identity.
///
/// Component instances are created by the container (see
/// [`Container::instance_of`](crate::Container::instance_of)); plain values
/// without a descriptor are wrapped with [`Instance::value`].
#[derive(Clone)]
pub struct Instance {
	runtime_type: TypeKey,
	value: Arc<dyn Any + Send + Sync>,
	address: usize,
	metadata: Option<Arc<TypeMetadata>>,
}

impl Instance {
	pub(crate) fn component(value: Arc<dyn Any + Send + Sync>, metadata: Arc<TypeMetadata>) -> Self {
		Self {
			runtime_type: metadata.type_key(),
			address: Arc::as_ptr(&value).cast::<()>() as usize,
			value,
			metadata: Some(metadata),
		}
	}

	/// Wraps a plain value. It has no injectable members and is only
	/// viewable as `S`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_ioc::Instance;
	/// use std::sync::Arc;
	///
	/// let instance = Instance::value(Arc::new(String::from("postgres://")));
	/// assert_eq!(instance.downcast::<String>().as_deref().map(String::as_str), Some("postgres://"));
	/// assert!(instance.downcast::<u32>().is_none());
	/// ```
	pub fn value<S: ?Sized + Send + Sync + 'static>(value: Arc<S>) -> Self {
		Self {
			runtime_type: TypeKey::of::<S>(),
			address: Arc::as_ptr(&value).cast::<()>() as usize,
			value: Arc::new(value),
			metadata: None,
		}
	}

	/// Returns the runtime type of the referenced object.
	pub fn runtime_type(&self) -> TypeKey {
		self.runtime_type
	}

	/// Returns the descriptor metadata, if this is a component instance.
	pub fn metadata(&self) -> Option<&Arc<TypeMetadata>> {
		self.metadata.as_ref()
	}

	/// Returns true if the instance can be viewed as `ty`.
	pub fn can_view(&self, ty: &TypeKey) -> bool {
		match &self.metadata {
			Some(metadata) => metadata.provides(ty),
			None => self.runtime_type == *ty,
		}
	}

	/// Views the instance as `S`.
	pub fn downcast<S: ?Sized + 'static>(&self) -> Option<Arc<S>> {
		match &self.metadata {
			Some(metadata) => metadata
				.view(TypeId::of::<S>(), Arc::clone(&self.value))
				.and_then(|view| view.downcast::<Arc<S>>().ok())
				.map(|view| *view),
			None => (*self.value).downcast_ref::<Arc<S>>().cloned(),
		}
	}

	/// Views the instance as `S`, failing with [`IocError::InvalidCast`].
	pub fn cast<S: ?Sized + 'static>(&self) -> IocResult<Arc<S>> {
		self.downcast::<S>().ok_or_else(|| IocError::InvalidCast {
			from: self.runtime_type.type_name(),
			to: type_name::<S>(),
		})
	}

	/// Returns true if both instances reference the same object.
	pub fn ptr_eq(this: &Self, other: &Self) -> bool {
		this.address == other.address
	}

	pub(crate) fn target(&self) -> &(dyn Any + Send + Sync) {
		&*self.value
	}
}

impl fmt::Debug for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Instance")
			.field("runtime_type", &self.runtime_type)
			.field("address", &format_args!("{:#x}", self.address))
			.finish()
	}
}
