//! # Reinhardt IoC
//!
//! Runtime object registry and factory for Reinhardt.
//!
//! ## Features
//!
//! - **Named registrations**: map a service type, optionally qualified by a
//!   name, to a concrete component or to a ready-made instance
//! - **Constructor selection**: components are built through their greediest
//!   constructor, with parameters resolved recursively
//! - **Member injection**: properties and fields marked with [`Inject`] are
//!   filled in after construction
//! - **Relations**: resolve a base type differently depending on the context
//!   type asking for it
//! - **Enumeration**: resolve every named registration assignable to a type
//!
//! Components describe themselves once through [`Component::describe`]; the
//! resulting [`TypeMetadata`] is cached per type in a [`MetadataCache`].
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_ioc::{Component, Container, Descriptor, Inject, Injected, Param};
//! use std::sync::Arc;
//!
//! trait Transport: Send + Sync {
//!     fn send(&self, body: &str) -> String;
//! }
//!
//! struct Smtp;
//!
//! impl Transport for Smtp {
//!     fn send(&self, body: &str) -> String {
//!         format!("smtp:{body}")
//!     }
//! }
//!
//! impl Component for Smtp {
//!     fn describe(d: &mut Descriptor<Self>) {
//!         d.constructor(vec![], |_| Ok(Smtp))
//!             .provides(|this| -> Arc<dyn Transport> { this });
//!     }
//! }
//!
//! struct Mailer {
//!     sender: Arc<String>,
//!     transport: Injected<dyn Transport>,
//! }
//!
//! impl Component for Mailer {
//!     fn describe(d: &mut Descriptor<Self>) {
//!         d.constructor(vec![Param::single::<String>("sender")], |args| {
//!             Ok(Mailer {
//!                 sender: args.require::<String>(0)?,
//!                 transport: Injected::new(),
//!             })
//!         })
//!         .field(Inject::new(), "transport", |mailer| &mailer.transport);
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register::<dyn Transport, Smtp>();
//! container.register::<Mailer, Mailer>();
//! container.register_value(Some(Arc::new(String::from("noreply"))), Some("sender"));
//!
//! let mailer = container.resolve::<Mailer>().unwrap().unwrap();
//! assert_eq!(mailer.sender.as_str(), "noreply");
//! assert_eq!(mailer.transport.get().unwrap().send("hi"), "smtp:hi");
//! ```

mod component;
mod container;
mod error;
mod hierarchy;
mod injected;
mod instance;
mod key;
mod metadata;
mod settings;
mod table;

pub use component::{
	Argument, Arguments, Component, ComponentType, ConstructorInfo, Descriptor, MemberInfo,
	MemberKind, Param, ParamKind, TypeMetadata,
};
pub use container::Container;
pub use error::{IocError, IocResult};
pub use hierarchy::TypeHierarchy;
pub use injected::{Inject, Injected};
pub use instance::Instance;
pub use key::{KeyPart, KeyedPair, Name, NamedKey, RelationKey, TypeKey};
pub use metadata::MetadataCache;
pub use settings::ContainerSettings;
pub use table::{InstanceTable, MappingTable, RelationTable, Table};
