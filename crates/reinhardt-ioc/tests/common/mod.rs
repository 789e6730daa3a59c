//! Shared components and fixtures for the integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use reinhardt_ioc::{Component, Container, Descriptor, Inject, Injected, Param};
use rstest::fixture;
use std::sync::Arc;

pub trait Greeter: Send + Sync {
	fn greet(&self) -> String;
}

/// Greeter with a parameterless constructor.
pub struct English;

impl Greeter for English {
	fn greet(&self) -> String {
		"hello".into()
	}
}

impl Component for English {
	fn describe(d: &mut Descriptor<Self>) {
		d.constructor(vec![], |_| Ok(English))
			.provides(|this| -> Arc<dyn Greeter> { this });
	}
}

/// Greeter without constructors, built from its default value.
#[derive(Default)]
pub struct French;

impl Greeter for French {
	fn greet(&self) -> String {
		"bonjour".into()
	}
}

impl Component for French {
	fn describe(d: &mut Descriptor<Self>) {
		d.default_value(French::default)
			.provides(|this| -> Arc<dyn Greeter> { this });
	}
}

/// Greeter carrying a caller-chosen phrase; registered as an instance.
pub struct Phrase(pub &'static str);

impl Greeter for Phrase {
	fn greet(&self) -> String {
		self.0.into()
	}
}

impl Component for Phrase {
	fn describe(d: &mut Descriptor<Self>) {
		d.provides(|this| -> Arc<dyn Greeter> { this });
	}
}

pub trait Log: Send + Sync {
	fn sink(&self) -> &'static str;
}

pub trait FileLog: Log {}

pub struct ConsoleLog;

impl Log for ConsoleLog {
	fn sink(&self) -> &'static str {
		"console"
	}
}

impl Component for ConsoleLog {
	fn describe(d: &mut Descriptor<Self>) {
		d.constructor(vec![], |_| Ok(ConsoleLog))
			.provides(|this| -> Arc<dyn Log> { this });
	}
}

pub struct RollingFileLog;

impl Log for RollingFileLog {
	fn sink(&self) -> &'static str {
		"file"
	}
}

impl FileLog for RollingFileLog {}

impl Component for RollingFileLog {
	fn describe(d: &mut Descriptor<Self>) {
		d.constructor(vec![], |_| Ok(RollingFileLog))
			.provides(|this| -> Arc<dyn Log> { this })
			.provides(|this| -> Arc<dyn FileLog> { this });
	}
}

/// Component with marked fields, a marked property and one unmarked field.
pub struct Notifier {
	pub greeter: Injected<dyn Greeter>,
	pub backup: Injected<dyn Greeter>,
	pub unmarked: Injected<dyn Greeter>,
	pub log: Mutex<Option<Arc<dyn Log>>>,
}

impl Notifier {
	pub fn new() -> Self {
		Self {
			greeter: Injected::new(),
			backup: Injected::new(),
			unmarked: Injected::new(),
			log: Mutex::new(None),
		}
	}

	pub fn log(&self) -> Option<Arc<dyn Log>> {
		self.log.lock().clone()
	}
}

impl Component for Notifier {
	fn describe(d: &mut Descriptor<Self>) {
		d.constructor(vec![], |_| Ok(Notifier::new()))
			.property(Inject::new(), "log", |notifier: &Notifier, log: Option<Arc<dyn Log>>| {
				*notifier.log.lock() = log;
			})
			.field(Inject::new(), "greeter", |notifier| &notifier.greeter)
			.field(Inject::named("backup"), "backup", |notifier| &notifier.backup);
	}
}

#[fixture]
pub fn container() -> Container {
	Container::new()
}
