//! Container settings

use crate::error::IocResult;
use serde::{Deserialize, Serialize};

/// Behavioural switches of a [`Container`](crate::Container).
///
/// Missing keys take their default values, so an empty document is valid.
///
/// # Examples
///
/// ```
/// use reinhardt_ioc::ContainerSettings;
///
/// let settings = ContainerSettings::from_toml_str(
///     r#"
///     warn_on_unresolved_members = true
///     "#,
/// )
/// .unwrap();
///
/// assert!(settings.warn_on_unresolved_members);
/// assert!(settings.inject_registered_instances);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
	/// Whether `register_singleton` injects the instance right away.
	pub inject_registered_instances: bool,
	/// Log a warning when an injectable member resolves to nothing.
	pub warn_on_unresolved_members: bool,
}

impl Default for ContainerSettings {
	fn default() -> Self {
		Self {
			inject_registered_instances: true,
			warn_on_unresolved_members: false,
		}
	}
}

impl ContainerSettings {
	/// Parses settings from a TOML document.
	pub fn from_toml_str(source: &str) -> IocResult<Self> {
		Ok(toml::from_str(source)?)
	}
}
