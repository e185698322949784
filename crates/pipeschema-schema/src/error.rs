//! # Error Types
//!
//! Every failure the composition pipeline checks for. Any of them aborts the
//! whole run: an incomplete schema is worse than none, so there is no
//! partial-success path.

use thiserror::Error;

/// Error during schema reflection, composition, or serialization.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A reflected fragment did not fit the schema data model.
    #[error("failed to reflect {type_name}: {source}")]
    Reflection {
        /// Rust type that was reflected.
        type_name: &'static str,
        /// Why the reflected JSON could not be read.
        source: serde_json::Error,
    },

    /// A definition the composition depends on is absent from the table.
    #[error("definition {name:?} is missing ({context})")]
    MissingDefinition {
        /// Name of the absent definition.
        name: String,
        /// The composition stage that needed it.
        context: &'static str,
    },

    /// A step variant reflected to an inline shape instead of a reference,
    /// so there is no named definition to receive the hook fields.
    #[error("step variant {type_name} reflected inline; expected a reference to a named definition")]
    UnnamedVariant {
        /// Rust type of the variant.
        type_name: &'static str,
    },

    /// Relaxation was attempted on a placeholder with no union members,
    /// which would leave a schema that matches anything.
    #[error("refusing to relax {name:?}: its anyOf union is empty")]
    EmptyUnion {
        /// Name of the placeholder definition.
        name: String,
    },

    /// The composed document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
