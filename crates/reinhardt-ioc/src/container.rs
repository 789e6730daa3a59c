//! The registry and resolver
//!
//! A [`Container`] owns three tables and consults them in a fixed order:
//!
//! 1. **Instances**: `(service, name)` to an already-built object. A
//!    registered instance always wins, even a registered null.
//! 2. **Mappings**: `(service, name)` to the concrete component built on
//!    demand, with constructor parameters resolved recursively.
//! 3. **Relations**: `(context, base)` to the concrete component built when a
//!    base type is requested on behalf of a particular context type.
//!
//! Every built or registered component then has its marked members
//! injected. Nothing found is `Ok(None)`, never an error; errors only come
//! from constructing or viewing objects.

use crate::component::{Argument, Arguments, Component, ComponentType, Param, ParamKind};
use crate::error::{IocError, IocResult};
use crate::hierarchy::TypeHierarchy;
use crate::instance::Instance;
use crate::key::{NamedKey, RelationKey, TypeKey};
use crate::metadata::MetadataCache;
use crate::settings::ContainerSettings;
use crate::table::{InstanceTable, MappingTable, RelationTable};
use std::any::type_name;
use std::sync::Arc;

/// Runtime object registry and factory.
///
/// # Examples
///
/// ```
/// use reinhardt_ioc::{Component, Container, Descriptor};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// impl Component for English {
///     fn describe(d: &mut Descriptor<Self>) {
///         d.constructor(vec![], |_| Ok(English))
///             .provides(|this| -> Arc<dyn Greeter> { this });
///     }
/// }
///
/// let mut container = Container::new();
/// container.register::<dyn Greeter, English>();
///
/// let greeter = container.resolve::<dyn Greeter>().unwrap().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[derive(Debug, Default)]
pub struct Container {
	mappings: MappingTable,
	instances: InstanceTable,
	relations: RelationTable,
	hierarchy: TypeHierarchy,
	metadata: Arc<MetadataCache>,
	settings: ContainerSettings,
}

impl Container {
	/// Creates an empty container with default settings and its own
	/// metadata cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty container with `settings`.
	pub fn with_settings(settings: ContainerSettings) -> Self {
		Self {
			settings,
			..Self::default()
		}
	}

	/// Creates an empty container sharing `metadata` with other containers.
	pub fn with_metadata_cache(metadata: Arc<MetadataCache>) -> Self {
		Self {
			metadata,
			..Self::default()
		}
	}

	/// Active settings.
	pub fn settings(&self) -> &ContainerSettings {
		&self.settings
	}

	/// The metadata cache used by this container.
	pub fn metadata_cache(&self) -> &Arc<MetadataCache> {
		&self.metadata
	}

	/// Declared assignability between service types.
	pub fn hierarchy(&self) -> &TypeHierarchy {
		&self.hierarchy
	}

	// ------------------------------------------------------------------
	// Registration
	// ------------------------------------------------------------------

	/// Maps requests for `service` named `name` to constructing `concrete`.
	///
	/// Nothing checks that `concrete` provides `service`; a mismatch only
	/// shows up when a typed resolve tries to view the result.
	pub fn register_type(&mut self, service: TypeKey, concrete: ComponentType, name: Option<&str>) {
		tracing::debug!(%service, concrete = %concrete.key(), name, "registering mapping");
		self.mappings.set(NamedKey::named(service, name), concrete);
	}

	/// Maps requests for `S` to constructing `C`.
	pub fn register<S: ?Sized + 'static, C: Component>(&mut self) {
		self.register_type(TypeKey::of::<S>(), ComponentType::of::<C>(), None);
	}

	/// Maps requests for `S` named `name` to constructing `C`.
	pub fn register_named<S: ?Sized + 'static, C: Component>(&mut self, name: &str) {
		self.register_type(TypeKey::of::<S>(), ComponentType::of::<C>(), Some(name));
	}

	/// Registers `instance` as the answer to requests for `service` named
	/// `name`. With `inject_now`, its members are injected right after it is
	/// stored, so a member may resolve to the instance itself. Injecting a
	/// null instance does nothing.
	pub fn register_instance_type(
		&mut self,
		service: TypeKey,
		instance: Option<Instance>,
		name: Option<&str>,
		inject_now: bool,
	) -> IocResult<()> {
		tracing::debug!(
			%service,
			runtime_type = ?instance.as_ref().map(Instance::runtime_type),
			name,
			inject_now,
			"registering instance"
		);
		self.instances
			.set(NamedKey::named(service, name), instance.clone());
		if inject_now {
			self.inject(instance.as_ref())?;
		}
		Ok(())
	}

	/// Registers component `instance` for requests of `S` named `name`.
	pub fn register_instance<S: ?Sized + 'static, C: Component>(
		&mut self,
		instance: Option<Arc<C>>,
		name: Option<&str>,
		inject_now: bool,
	) -> IocResult<()> {
		let instance = instance.map(|component| self.instance_of(component));
		self.register_instance_type(TypeKey::of::<S>(), instance, name, inject_now)
	}

	/// Registers `instance` as the default answer for `S`, injecting it
	/// according to [`ContainerSettings::inject_registered_instances`].
	pub fn register_singleton<S: ?Sized + 'static, C: Component>(
		&mut self,
		instance: Arc<C>,
	) -> IocResult<()> {
		let inject_now = self.settings.inject_registered_instances;
		self.register_instance::<S, C>(Some(instance), None, inject_now)
	}

	/// Registers a plain value for requests of `S` named `name`. Plain values
	/// have no injectable members.
	pub fn register_value<S: ?Sized + Send + Sync + 'static>(
		&mut self,
		value: Option<Arc<S>>,
		name: Option<&str>,
	) {
		tracing::debug!(service = type_name::<S>(), name, "registering value");
		self.instances
			.set(NamedKey::named(TypeKey::of::<S>(), name), value.map(Instance::value));
	}

	/// Maps requests for `base` made on behalf of `context` to constructing
	/// `concrete`.
	pub fn register_relation_type(&mut self, context: TypeKey, base: TypeKey, concrete: ComponentType) {
		tracing::debug!(%context, %base, concrete = %concrete.key(), "registering relation");
		self.relations.set(RelationKey::new(context, base), concrete);
	}

	/// Maps requests for `B` made on behalf of `Ctx` to constructing `C`.
	pub fn register_relation<Ctx: ?Sized + 'static, B: ?Sized + 'static, C: Component>(&mut self) {
		self.register_relation_type(TypeKey::of::<Ctx>(), TypeKey::of::<B>(), ComponentType::of::<C>());
	}

	/// Declares that `Sub` is assignable to `Super` for
	/// [`resolve_all`](Self::resolve_all).
	pub fn declare_supertype<Sub: ?Sized + 'static, Super: ?Sized + 'static>(&mut self) {
		self.hierarchy
			.declare(TypeKey::of::<Sub>(), TypeKey::of::<Super>());
	}

	/// Empties the instance, mapping and relation tables. Cached metadata and
	/// declared supertypes are kept.
	pub fn clear(&mut self) {
		tracing::debug!(
			instances = self.instances.len(),
			mappings = self.mappings.len(),
			relations = self.relations.len(),
			"clearing container"
		);
		self.instances.clear();
		self.mappings.clear();
		self.relations.clear();
	}

	// ------------------------------------------------------------------
	// Resolution
	// ------------------------------------------------------------------

	/// Resolves `service` named `name`.
	///
	/// A registered instance is returned as-is, without injection. With
	/// `require_instance`, nothing is constructed. Otherwise the mapped
	/// component is constructed with `args` (see
	/// [`create_instance`](Self::create_instance)).
	pub fn resolve_type(
		&self,
		service: TypeKey,
		name: Option<&str>,
		require_instance: bool,
		args: &[Argument],
	) -> IocResult<Option<Instance>> {
		let key = NamedKey::named(service, name);

		if let Some(instance) = self.instances.get(&key) {
			tracing::trace!(%service, name = key.name(), "resolved registered instance");
			return Ok(instance.clone());
		}
		if require_instance {
			tracing::trace!(%service, name = key.name(), "no registered instance");
			return Ok(None);
		}
		let Some(concrete) = self.mappings.get(&key) else {
			tracing::trace!(%service, name = key.name(), "nothing registered");
			return Ok(None);
		};

		tracing::trace!(%service, name = key.name(), concrete = %concrete.key(), "constructing mapped component");
		self.create_instance(concrete, args).map(Some)
	}

	/// Resolves the default registration of `S`.
	pub fn resolve<S: ?Sized + 'static>(&self) -> IocResult<Option<Arc<S>>> {
		self.resolve_with::<S>(None, &[])
	}

	/// Resolves the registration of `S` named `name`.
	pub fn resolve_named<S: ?Sized + 'static>(&self, name: &str) -> IocResult<Option<Arc<S>>> {
		self.resolve_with::<S>(Some(name), &[])
	}

	/// Returns the registered instance of `S` named `name`, never constructing.
	pub fn resolve_instance<S: ?Sized + 'static>(&self, name: Option<&str>) -> IocResult<Option<Arc<S>>> {
		view(self.resolve_type(TypeKey::of::<S>(), name, true, &[])?)
	}

	/// Resolves `S` named `name`, constructing a mapped component with `args`.
	pub fn resolve_with<S: ?Sized + 'static>(
		&self,
		name: Option<&str>,
		args: &[Argument],
	) -> IocResult<Option<Arc<S>>> {
		view(self.resolve_type(TypeKey::of::<S>(), name, false, args)?)
	}

	/// Lazily enumerates every named registration for `service`.
	///
	/// Yields, in registration order, first the non-null instances registered
	/// under exactly `service`, then a freshly default-constructed and
	/// injected component for every mapping whose service type is assignable
	/// to `service`. Unnamed registrations are skipped. Each call starts a new
	/// enumeration.
	pub fn resolve_all_type(&self, service: TypeKey) -> impl Iterator<Item = IocResult<Instance>> + '_ {
		let registered = self
			.instances
			.iter()
			.filter(move |(key, _)| *key.first() == service && key.name().is_some())
			.filter_map(|(_, instance)| instance.clone())
			.map(Ok);

		let constructed = self
			.mappings
			.iter()
			.filter(move |(key, _)| {
				key.name().is_some() && self.hierarchy.is_assignable(&service, key.first())
			})
			.map(move |(key, concrete)| {
				tracing::trace!(%service, name = key.name(), concrete = %concrete.key(), "constructing for enumeration");
				self.construct_default(concrete)
			});

		registered.chain(constructed)
	}

	/// Lazily enumerates every named registration for `S`, viewed as `S`.
	pub fn resolve_all<S: ?Sized + 'static>(&self) -> impl Iterator<Item = IocResult<Arc<S>>> + '_ {
		self.resolve_all_type(TypeKey::of::<S>())
			.map(|instance| instance.and_then(|instance| instance.cast::<S>()))
	}

	/// Returns true if an instance or mapping exists for `S` named `name`.
	pub fn is_registered<S: ?Sized + 'static>(&self, name: Option<&str>) -> bool {
		let key = NamedKey::named(TypeKey::of::<S>(), name);
		self.instances.contains(&key) || self.mappings.contains(&key)
	}

	/// Number of mapping entries.
	pub fn mapping_count(&self) -> usize {
		self.mappings.len()
	}

	/// Number of instance entries.
	pub fn instance_count(&self) -> usize {
		self.instances.len()
	}

	/// Number of relation entries.
	pub fn relation_count(&self) -> usize {
		self.relations.len()
	}

	// ------------------------------------------------------------------
	// Injection
	// ------------------------------------------------------------------

	/// Sets every marked property, then every marked field, of `instance`
	/// to the resolution of its declared type and marker name. Members that
	/// resolve to nothing are cleared. A null instance is ignored, and so is
	/// a plain value, which has no members.
	pub fn inject(&self, instance: Option<&Instance>) -> IocResult<()> {
		let Some(instance) = instance else {
			return Ok(());
		};
		let Some(metadata) = instance.metadata() else {
			return Ok(());
		};

		for member in metadata.members() {
			let resolved = self.resolve_type(member.declared_type(), member.qualifier(), false, &[])?;
			if resolved.is_none() && self.settings.warn_on_unresolved_members {
				tracing::warn!(
					component = %metadata.type_key(),
					member = member.name(),
					declared_type = %member.declared_type(),
					qualifier = member.qualifier(),
					"injectable member resolved to nothing"
				);
			}
			member.assign(instance.target(), resolved.as_ref())?;
		}
		Ok(())
	}

	/// Injects the marked members of `component`.
	pub fn inject_component<C: Component>(&self, component: &Arc<C>) -> IocResult<()> {
		let instance = self.instance_of(Arc::clone(component));
		self.inject(Some(&instance))
	}

	/// Wraps `component` as an [`Instance`] carrying its cached metadata.
	pub fn instance_of<C: Component>(&self, component: Arc<C>) -> Instance {
		let metadata = self.metadata.get_or_build(&ComponentType::of::<C>());
		Instance::component(component, metadata)
	}

	// ------------------------------------------------------------------
	// Construction
	// ------------------------------------------------------------------

	/// Constructs and injects `concrete`.
	///
	/// With explicit `args`, the first declared constructor accepting them is
	/// used. Without, a type declaring no constructors is default-constructed;
	/// otherwise the constructor with the most parameters is chosen and each
	/// parameter is bound in order: a sequence to every named registration of
	/// its element type, a single value to the default registration of its
	/// type or, failing that, to the registration named after the parameter.
	/// Unresolved parameters are passed as absent.
	pub fn create_instance(&self, concrete: &ComponentType, args: &[Argument]) -> IocResult<Instance> {
		let metadata = self.metadata.get_or_build(concrete);

		let value = if !args.is_empty() {
			let ctor = metadata
				.matching_constructor(args)
				.ok_or(IocError::NoMatchingConstructor {
					type_name: concrete.key().type_name(),
					arity: args.len(),
				})?;
			ctor.invoke(&Arguments::new(args.to_vec()))?
		} else if let Some(ctor) = metadata.greediest_constructor() {
			let bound = ctor
				.params()
				.iter()
				.map(|param| self.bind_parameter(param))
				.collect::<IocResult<Vec<_>>>()?;
			tracing::trace!(component = %concrete.key(), arity = ctor.arity(), "invoking greediest constructor");
			ctor.invoke(&Arguments::new(bound))?
		} else {
			metadata.construct_default()?
		};

		let instance = Instance::component(value, metadata);
		self.inject(Some(&instance))?;
		Ok(instance)
	}

	/// Constructs and injects component `C`, viewed as itself.
	pub fn create<C: Component>(&self, args: &[Argument]) -> IocResult<Arc<C>> {
		self.create_instance(&ComponentType::of::<C>(), args)?
			.cast::<C>()
	}

	fn bind_parameter(&self, param: &Param) -> IocResult<Argument> {
		match param.kind() {
			ParamKind::Sequence(element) => self
				.resolve_all_type(element)
				.collect::<IocResult<Vec<_>>>()
				.map(Argument::Sequence),
			ParamKind::Single(ty) => {
				let resolved = match self.resolve_type(ty, None, false, &[])? {
					Some(instance) => Some(instance),
					None => self.resolve_type(ty, Some(param.name()), false, &[])?,
				};
				Ok(Argument::Single(resolved))
			}
		}
	}

	fn construct_default(&self, concrete: &ComponentType) -> IocResult<Instance> {
		let metadata = self.metadata.get_or_build(concrete);
		let value = metadata.construct_default()?;
		let instance = Instance::component(value, metadata);
		self.inject(Some(&instance))?;
		Ok(instance)
	}

	// ------------------------------------------------------------------
	// Relations
	// ------------------------------------------------------------------

	/// Constructs the component related to `base` for `context`, or returns
	/// `Ok(None)` when no relation is registered.
	pub fn resolve_relation_type(
		&self,
		context: TypeKey,
		base: TypeKey,
		args: &[Argument],
	) -> IocResult<Option<Instance>> {
		let Some(concrete) = self.relations.get(&RelationKey::new(context, base)) else {
			tracing::trace!(%context, %base, "no relation registered");
			return Ok(None);
		};
		tracing::trace!(%context, %base, concrete = %concrete.key(), "constructing related component");
		self.create_instance(concrete, args).map(Some)
	}

	/// Constructs the component related to `B` for `Ctx`, viewed as `B`.
	///
	/// A related component that cannot be viewed as `B` is reported as
	/// [`IocError::RelationConstruction`] wrapping the cast failure.
	pub fn resolve_relation<Ctx: ?Sized + 'static, B: ?Sized + 'static>(
		&self,
		args: &[Argument],
	) -> IocResult<Option<Arc<B>>> {
		let Some(instance) = self.resolve_relation_type(TypeKey::of::<Ctx>(), TypeKey::of::<B>(), args)? else {
			return Ok(None);
		};
		instance
			.cast::<B>()
			.map(Some)
			.map_err(|source| IocError::RelationConstruction {
				base: type_name::<B>(),
				context: type_name::<Ctx>(),
				source: Box::new(source),
			})
	}
}

fn view<S: ?Sized + 'static>(instance: Option<Instance>) -> IocResult<Option<Arc<S>>> {
	instance.map(|instance| instance.cast::<S>()).transpose()
}
