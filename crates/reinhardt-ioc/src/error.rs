//! Error types for the registry.
//!
//! Resolution that finds nothing is not an error: it yields `Ok(None)`.
//! The variants below cover the construction and introspection failures
//! that surface while building or viewing an object.

use thiserror::Error;

/// Result type alias for registry operations.
pub type IocResult<T> = Result<T, IocError>;

/// Registry errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IocError {
	/// An instance was requested as a type it does not provide.
	#[error("cannot view an instance of `{from}` as `{to}`")]
	InvalidCast {
		/// Runtime type of the instance.
		from: &'static str,
		/// Requested type.
		to: &'static str,
	},

	/// Explicit constructor arguments matched no declared constructor.
	#[error("no constructor of `{type_name}` accepts the {arity} supplied argument(s)")]
	NoMatchingConstructor {
		/// Type being constructed.
		type_name: &'static str,
		/// Number of supplied arguments.
		arity: usize,
	},

	/// The type has neither a parameterless constructor nor a default value.
	#[error("`{type_name}` cannot be default-constructed")]
	NotConstructible {
		/// Type being constructed.
		type_name: &'static str,
	},

	/// A constructor read an argument position that was not supplied.
	#[error("argument {index} is out of range ({len} supplied)")]
	ArgumentOutOfRange {
		/// Requested position.
		index: usize,
		/// Number of supplied arguments.
		len: usize,
	},

	/// A constructor read a single value where a sequence was bound, or the reverse.
	#[error("argument {index} is a {found}, expected a {expected}")]
	ArgumentKind {
		/// Requested position.
		index: usize,
		/// Kind the constructor asked for.
		expected: &'static str,
		/// Kind that was bound.
		found: &'static str,
	},

	/// A constructor required an argument that resolved to nothing.
	#[error("argument {index} of type `{type_name}` is required but was not resolved")]
	MissingArgument {
		/// Requested position.
		index: usize,
		/// Requested type.
		type_name: &'static str,
	},

	/// A relation resolved to an instance of the wrong type.
	#[error("failed to construct `{base}` for context `{context}`")]
	RelationConstruction {
		/// Expected base type.
		base: &'static str,
		/// Context type the relation was resolved for.
		context: &'static str,
		/// Underlying failure.
		#[source]
		source: Box<IocError>,
	},

	/// A component constructor reported a failure of its own.
	#[error("failed to construct `{type_name}`: {message}")]
	Construction {
		/// Type being constructed.
		type_name: &'static str,
		/// Error message.
		message: String,
	},

	/// Container settings could not be parsed.
	#[error("invalid container settings: {0}")]
	Settings(#[from] toml::de::Error),
}

impl IocError {
	/// Builds a [`IocError::Construction`] for component type `C`.
	pub fn construction<C: ?Sized + 'static>(message: impl Into<String>) -> Self {
		Self::Construction {
			type_name: std::any::type_name::<C>(),
			message: message.into(),
		}
	}
}
