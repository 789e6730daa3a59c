//! Component descriptors
//!
//! Rust has no runtime reflection, so every constructible type describes
//! itself once through [`Component::describe`]. The descriptor lists
//!
//! 1. the public constructors, in declaration order, with their parameters,
//! 2. an optional default value used when no constructor is declared,
//! 3. the injectable properties and fields with their [`Inject`] markers,
//! 4. the service types the component can be viewed as.
//!
//! The container turns a descriptor into an immutable [`TypeMetadata`] the
//! first time it meets the type and caches it (see
//! [`MetadataCache`](crate::MetadataCache)).
//!
//! # Examples
//!
//! ```
//! use reinhardt_ioc::{Component, Descriptor, Inject, Injected, Param};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! trait Store: Send + Sync {}
//!
//! struct Journal {
//!     store: Option<Arc<dyn Store>>,
//!     clock: Injected<dyn Clock>,
//! }
//!
//! impl Component for Journal {
//!     fn describe(d: &mut Descriptor<Self>) {
//!         d.constructor(vec![Param::single::<dyn Store>("store")], |args| {
//!             Ok(Journal {
//!                 store: args.get::<dyn Store>(0)?,
//!                 clock: Injected::new(),
//!             })
//!         })
//!         .field(Inject::new(), "clock", |journal| &journal.clock);
//!     }
//! }
//! ```

use crate::error::{IocError, IocResult};
use crate::injected::{Inject, Injected};
use crate::instance::Instance;
use crate::key::TypeKey;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type the container can construct and inject.
pub trait Component: Send + Sync + Sized + 'static {
	/// Declares constructors, injectable members and provided service types.
	fn describe(descriptor: &mut Descriptor<Self>);
}

type ErasedBuild = Box<dyn Fn(&Arguments) -> IocResult<Arc<dyn Any + Send + Sync>> + Send + Sync>;
type ErasedDefault = Box<dyn Fn() -> Arc<dyn Any + Send + Sync> + Send + Sync>;
type ErasedAssign =
	Box<dyn Fn(&(dyn Any + Send + Sync), Option<&Instance>) -> IocResult<()> + Send + Sync>;
type Caster = Box<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any>> + Send + Sync>;

/// Shape of a constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
	/// One value of the given type.
	Single(TypeKey),
	/// Every named registration assignable to the given element type.
	Sequence(TypeKey),
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	name: &'static str,
	kind: ParamKind,
}

impl Param {
	/// Parameter bound to one resolved `S`.
	pub fn single<S: ?Sized + 'static>(name: &'static str) -> Self {
		Self {
			name,
			kind: ParamKind::Single(TypeKey::of::<S>()),
		}
	}

	/// Parameter bound to all named registrations of `S`.
	pub fn sequence<S: ?Sized + 'static>(name: &'static str) -> Self {
		Self {
			name,
			kind: ParamKind::Sequence(TypeKey::of::<S>()),
		}
	}

	/// Parameter name, used as a fallback name qualifier.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Parameter shape.
	pub fn kind(&self) -> ParamKind {
		self.kind
	}
}

/// A value bound to a constructor parameter.
#[derive(Debug, Clone)]
pub enum Argument {
	/// A single value, possibly absent.
	Single(Option<Instance>),
	/// A sequence of values.
	Sequence(Vec<Instance>),
}

impl Argument {
	/// Single argument wrapping a plain value.
	pub fn value<S: ?Sized + Send + Sync + 'static>(value: Arc<S>) -> Self {
		Self::Single(Some(Instance::value(value)))
	}

	/// Single argument wrapping an instance.
	pub fn instance(instance: Instance) -> Self {
		Self::Single(Some(instance))
	}

	/// Absent single argument.
	pub fn null() -> Self {
		Self::Single(None)
	}

	fn kind_name(&self) -> &'static str {
		match self {
			Self::Single(_) => "single value",
			Self::Sequence(_) => "sequence",
		}
	}

	fn fits(&self, param: &Param) -> bool {
		match (param.kind, self) {
			(ParamKind::Single(ty), Self::Single(value)) => {
				value.as_ref().is_none_or(|instance| instance.can_view(&ty))
			}
			(ParamKind::Sequence(ty), Self::Sequence(items)) => {
				items.iter().all(|instance| instance.can_view(&ty))
			}
			_ => false,
		}
	}
}

/// Positional arguments handed to a constructor.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
	values: Vec<Argument>,
}

impl Arguments {
	pub(crate) fn new(values: Vec<Argument>) -> Self {
		Self { values }
	}

	/// Number of arguments.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true if there are no arguments.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	fn at(&self, index: usize) -> IocResult<&Argument> {
		self.values.get(index).ok_or(IocError::ArgumentOutOfRange {
			index,
			len: self.values.len(),
		})
	}

	/// Single argument at `index`, viewed as `S`. `Ok(None)` when nothing was resolved.
	pub fn get<S: ?Sized + 'static>(&self, index: usize) -> IocResult<Option<Arc<S>>> {
		match self.at(index)? {
			Argument::Single(value) => value.as_ref().map(Instance::cast::<S>).transpose(),
			other => Err(IocError::ArgumentKind {
				index,
				expected: "single value",
				found: other.kind_name(),
			}),
		}
	}

	/// Single argument at `index`, viewed as `S`, failing when it is absent.
	pub fn require<S: ?Sized + 'static>(&self, index: usize) -> IocResult<Arc<S>> {
		self.get::<S>(index)?.ok_or(IocError::MissingArgument {
			index,
			type_name: type_name::<S>(),
		})
	}

	/// Sequence argument at `index`, each element viewed as `S`.
	pub fn all<S: ?Sized + 'static>(&self, index: usize) -> IocResult<Vec<Arc<S>>> {
		match self.at(index)? {
			Argument::Sequence(items) => items.iter().map(Instance::cast::<S>).collect(),
			other => Err(IocError::ArgumentKind {
				index,
				expected: "sequence",
				found: other.kind_name(),
			}),
		}
	}
}

/// A declared constructor.
pub struct ConstructorInfo {
	params: Vec<Param>,
	build: ErasedBuild,
}

impl ConstructorInfo {
	/// Declared parameters.
	pub fn params(&self) -> &[Param] {
		&self.params
	}

	/// Number of parameters.
	pub fn arity(&self) -> usize {
		self.params.len()
	}

	/// Returns true if `args` can be passed to this constructor as-is.
	pub fn accepts(&self, args: &[Argument]) -> bool {
		self.params.len() == args.len()
			&& self.params.iter().zip(args).all(|(param, arg)| arg.fits(param))
	}

	pub(crate) fn invoke(&self, args: &Arguments) -> IocResult<Arc<dyn Any + Send + Sync>> {
		(self.build)(args)
	}
}

impl fmt::Debug for ConstructorInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConstructorInfo")
			.field("params", &self.params)
			.finish_non_exhaustive()
	}
}

/// How an injectable member is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
	/// Written through a setter.
	Property,
	/// An [`Injected`] slot.
	Field,
}

/// An injectable member.
pub struct MemberInfo {
	name: &'static str,
	kind: MemberKind,
	declared_type: TypeKey,
	marker: Inject,
	assign: ErasedAssign,
}

impl MemberInfo {
	/// Member name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Property or field.
	pub fn kind(&self) -> MemberKind {
		self.kind
	}

	/// Declared type of the member.
	pub fn declared_type(&self) -> TypeKey {
		self.declared_type
	}

	/// Name qualifier carried by the marker.
	pub fn qualifier(&self) -> Option<&str> {
		self.marker.name()
	}

	pub(crate) fn assign(
		&self,
		target: &(dyn Any + Send + Sync),
		value: Option<&Instance>,
	) -> IocResult<()> {
		(self.assign)(target, value)
	}
}

impl fmt::Debug for MemberInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemberInfo")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("declared_type", &self.declared_type)
			.field("marker", &self.marker)
			.finish_non_exhaustive()
	}
}

/// Builder passed to [`Component::describe`].
pub struct Descriptor<C: Component> {
	constructors: Vec<ConstructorInfo>,
	default_value: Option<ErasedDefault>,
	properties: Vec<MemberInfo>,
	fields: Vec<MemberInfo>,
	casters: HashMap<TypeId, Caster>,
	provided: Vec<TypeKey>,
	_component: PhantomData<fn() -> C>,
}

impl<C: Component> Descriptor<C> {
	fn new() -> Self {
		let mut descriptor = Self {
			constructors: Vec::new(),
			default_value: None,
			properties: Vec::new(),
			fields: Vec::new(),
			casters: HashMap::new(),
			provided: Vec::new(),
			_component: PhantomData,
		};
		descriptor.provides(|this: Arc<C>| this);
		descriptor
	}

	/// Declares a public constructor.
	pub fn constructor<F>(&mut self, params: Vec<Param>, build: F) -> &mut Self
	where
		F: Fn(&Arguments) -> IocResult<C> + Send + Sync + 'static,
	{
		self.constructors.push(ConstructorInfo {
			params,
			build: Box::new(move |args| {
				build(args).map(|component| Arc::new(component) as Arc<dyn Any + Send + Sync>)
			}),
		});
		self
	}

	/// Declares the value produced by default construction when the type
	/// has no constructors.
	pub fn default_value<F>(&mut self, factory: F) -> &mut Self
	where
		F: Fn() -> C + Send + Sync + 'static,
	{
		self.default_value = Some(Box::new(move || {
			Arc::new(factory()) as Arc<dyn Any + Send + Sync>
		}));
		self
	}

	/// Declares an injectable property written through `setter`.
	pub fn property<S, F>(&mut self, marker: Inject, name: &'static str, setter: F) -> &mut Self
	where
		S: ?Sized + 'static,
		F: Fn(&C, Option<Arc<S>>) + Send + Sync + 'static,
	{
		self.properties.push(MemberInfo {
			name,
			kind: MemberKind::Property,
			declared_type: TypeKey::of::<S>(),
			marker,
			assign: Box::new(move |target, value| {
				let target = downcast_target::<C>(target)?;
				setter(target, value.map(Instance::cast::<S>).transpose()?);
				Ok(())
			}),
		});
		self
	}

	/// Declares an injectable field reached through `slot`.
	pub fn field<S, F>(&mut self, marker: Inject, name: &'static str, slot: F) -> &mut Self
	where
		S: ?Sized + 'static,
		F: Fn(&C) -> &Injected<S> + Send + Sync + 'static,
	{
		self.fields.push(MemberInfo {
			name,
			kind: MemberKind::Field,
			declared_type: TypeKey::of::<S>(),
			marker,
			assign: Box::new(move |target, value| {
				let target = downcast_target::<C>(target)?;
				slot(target).set(value.map(Instance::cast::<S>).transpose()?);
				Ok(())
			}),
		});
		self
	}

	/// Declares that the component can be viewed as `S`.
	pub fn provides<S, F>(&mut self, view: F) -> &mut Self
	where
		S: ?Sized + 'static,
		F: Fn(Arc<C>) -> Arc<S> + Send + Sync + 'static,
	{
		let ty = TypeKey::of::<S>();
		if !self.provided.contains(&ty) {
			self.provided.push(ty);
		}
		self.casters.insert(
			ty.id(),
			Box::new(move |value| {
				value
					.downcast::<C>()
					.ok()
					.map(|component| Box::new(view(component)) as Box<dyn Any>)
			}),
		);
		self
	}

	fn finish(self) -> TypeMetadata {
		TypeMetadata {
			type_key: TypeKey::of::<C>(),
			constructors: self.constructors,
			default_value: self.default_value,
			properties: self.properties,
			fields: self.fields,
			casters: self.casters,
			provided: self.provided,
		}
	}
}

fn downcast_target<C: Component>(target: &(dyn Any + Send + Sync)) -> IocResult<&C> {
	target.downcast_ref::<C>().ok_or(IocError::InvalidCast {
		from: "<injection target>",
		to: type_name::<C>(),
	})
}

/// Immutable description of a component type, built once per type.
pub struct TypeMetadata {
	type_key: TypeKey,
	constructors: Vec<ConstructorInfo>,
	default_value: Option<ErasedDefault>,
	properties: Vec<MemberInfo>,
	fields: Vec<MemberInfo>,
	casters: HashMap<TypeId, Caster>,
	provided: Vec<TypeKey>,
}

impl TypeMetadata {
	/// Runs `C::describe` and freezes the result.
	pub fn of<C: Component>() -> Self {
		let mut descriptor = Descriptor::<C>::new();
		C::describe(&mut descriptor);
		descriptor.finish()
	}

	/// The described type.
	pub fn type_key(&self) -> TypeKey {
		self.type_key
	}

	/// Constructors in declaration order.
	pub fn constructors(&self) -> &[ConstructorInfo] {
		&self.constructors
	}

	/// Injectable properties in declaration order.
	pub fn properties(&self) -> &[MemberInfo] {
		&self.properties
	}

	/// Injectable fields in declaration order.
	pub fn fields(&self) -> &[MemberInfo] {
		&self.fields
	}

	/// Properties followed by fields.
	pub fn members(&self) -> impl Iterator<Item = &MemberInfo> {
		self.properties.iter().chain(&self.fields)
	}

	/// Service types the component can be viewed as, itself first.
	pub fn provided_types(&self) -> &[TypeKey] {
		&self.provided
	}

	/// Returns true if the component can be viewed as `ty`.
	pub fn provides(&self, ty: &TypeKey) -> bool {
		self.casters.contains_key(&ty.id())
	}

	/// The constructor with the most parameters; the first declared wins a tie.
	pub fn greediest_constructor(&self) -> Option<&ConstructorInfo> {
		self.constructors.iter().reduce(|best, candidate| {
			if candidate.arity() > best.arity() {
				candidate
			} else {
				best
			}
		})
	}

	/// The first constructor that accepts `args` unchanged.
	pub fn matching_constructor(&self, args: &[Argument]) -> Option<&ConstructorInfo> {
		self.constructors.iter().find(|ctor| ctor.accepts(args))
	}

	pub(crate) fn construct_default(&self) -> IocResult<Arc<dyn Any + Send + Sync>> {
		if let Some(ctor) = self.constructors.iter().find(|ctor| ctor.arity() == 0) {
			return ctor.invoke(&Arguments::default());
		}
		match &self.default_value {
			Some(factory) if self.constructors.is_empty() => Ok(factory()),
			_ => Err(IocError::NotConstructible {
				type_name: self.type_key.type_name(),
			}),
		}
	}

	pub(crate) fn view(
		&self,
		ty: TypeId,
		value: Arc<dyn Any + Send + Sync>,
	) -> Option<Box<dyn Any>> {
		self.casters.get(&ty).and_then(|cast| cast(value))
	}
}

impl fmt::Debug for TypeMetadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeMetadata")
			.field("type_key", &self.type_key)
			.field("constructors", &self.constructors)
			.field("properties", &self.properties)
			.field("fields", &self.fields)
			.field("provided", &self.provided)
			.finish_non_exhaustive()
	}
}

/// Erased handle of a component type, as stored in the mapping and
/// relation tables.
#[derive(Clone, Copy)]
pub struct ComponentType {
	key: TypeKey,
	describe: fn() -> TypeMetadata,
}

impl ComponentType {
	/// Handle of component `C`.
	pub fn of<C: Component>() -> Self {
		Self {
			key: TypeKey::of::<C>(),
			describe: TypeMetadata::of::<C>,
		}
	}

	/// The component's type key.
	pub fn key(&self) -> TypeKey {
		self.key
	}

	pub(crate) fn describe(&self) -> TypeMetadata {
		(self.describe)()
	}
}

impl PartialEq for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ComponentType").field(&self.key).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	trait Shape: Send + Sync {
		fn sides(&self) -> usize;
	}

	#[derive(Debug, Default)]
	struct Square;

	impl Shape for Square {
		fn sides(&self) -> usize {
			4
		}
	}

	impl Component for Square {
		fn describe(d: &mut Descriptor<Self>) {
			d.provides(|this| -> Arc<dyn Shape> { this });
		}
	}

	struct Canvas {
		label: String,
		shape: Injected<dyn Shape>,
	}

	impl Component for Canvas {
		fn describe(d: &mut Descriptor<Self>) {
			d.constructor(vec![], |_| {
				Ok(Canvas {
					label: "empty".into(),
					shape: Injected::new(),
				})
			})
			.constructor(
				vec![Param::single::<String>("label"), Param::single::<dyn Shape>("shape")],
				|args| {
					Ok(Canvas {
						label: args.require::<String>(0)?.to_string(),
						shape: Injected::new(),
					})
				},
			)
			.constructor(
				vec![Param::single::<String>("title"), Param::sequence::<dyn Shape>("shapes")],
				|args| {
					Ok(Canvas {
						label: format!("{}:{}", args.require::<String>(0)?, args.all::<dyn Shape>(1)?.len()),
						shape: Injected::new(),
					})
				},
			)
			.field(Inject::named("primary"), "shape", |canvas| &canvas.shape);
		}
	}

	#[rstest]
	fn every_component_provides_itself() {
		let metadata = TypeMetadata::of::<Square>();

		assert!(metadata.provides(&TypeKey::of::<Square>()));
		assert!(metadata.provides(&TypeKey::of::<dyn Shape>()));
		assert!(!metadata.provides(&TypeKey::of::<String>()));
		assert_eq!(
			metadata.provided_types(),
			&[TypeKey::of::<Square>(), TypeKey::of::<dyn Shape>()]
		);

		let instance = Instance::component(Arc::new(Square), Arc::new(metadata));
		assert_eq!(instance.downcast::<dyn Shape>().unwrap().sides(), 4);
		assert!(instance.downcast::<Square>().is_some());
	}

	#[rstest]
	fn greediest_constructor_prefers_first_declared_on_ties() {
		let metadata = TypeMetadata::of::<Canvas>();

		let ctor = metadata.greediest_constructor().unwrap();

		assert_eq!(ctor.arity(), 2);
		assert_eq!(ctor.params()[1].name(), "shape");
	}

	#[rstest]
	fn members_record_marker_and_declared_type() {
		let metadata = TypeMetadata::of::<Canvas>();

		let members: Vec<_> = metadata.members().collect();

		assert_eq!(members.len(), 1);
		assert_eq!(members[0].kind(), MemberKind::Field);
		assert_eq!(members[0].declared_type(), TypeKey::of::<dyn Shape>());
		assert_eq!(members[0].qualifier(), Some("primary"));
	}

	#[rstest]
	fn matching_constructor_checks_argument_shapes() {
		let metadata = TypeMetadata::of::<Canvas>();
		let title = Argument::value(Arc::new(String::from("t")));

		let single = metadata
			.matching_constructor(&[title.clone(), Argument::null()])
			.unwrap();
		let sequence = metadata
			.matching_constructor(&[title.clone(), Argument::Sequence(Vec::new())])
			.unwrap();

		assert_eq!(single.params()[1].kind(), ParamKind::Single(TypeKey::of::<dyn Shape>()));
		assert_eq!(sequence.params()[1].kind(), ParamKind::Sequence(TypeKey::of::<dyn Shape>()));
		assert!(metadata.matching_constructor(&[title]).is_none());
	}

	#[rstest]
	fn construct_default_uses_parameterless_constructor() {
		let metadata = TypeMetadata::of::<Canvas>();

		let value = metadata.construct_default().unwrap();

		assert_eq!(value.downcast::<Canvas>().unwrap().label, "empty");
	}

	#[rstest]
	fn construct_default_without_constructors_or_default_fails() {
		let metadata = TypeMetadata::of::<Square>();

		let error = metadata.construct_default().unwrap_err();

		assert!(matches!(error, IocError::NotConstructible { .. }));
	}

	#[rstest]
	fn arguments_report_kind_and_range_errors() {
		let args = Arguments::new(vec![Argument::Sequence(Vec::new())]);

		assert!(matches!(args.get::<String>(0), Err(IocError::ArgumentKind { index: 0, .. })));
		assert!(matches!(args.all::<String>(1), Err(IocError::ArgumentOutOfRange { index: 1, len: 1 })));
		assert!(args.all::<String>(0).unwrap().is_empty());
	}

	#[rstest]
	fn require_fails_on_absent_argument() {
		let args = Arguments::new(vec![Argument::null()]);

		assert!(args.get::<String>(0).unwrap().is_none());
		assert!(matches!(args.require::<String>(0), Err(IocError::MissingArgument { index: 0, .. })));
	}
}
