//! # Manual Overrides
//!
//! Two hand-specified edits applied to the finished document, outside the
//! general composition algorithm:
//!
//! 1. The root accepts unrecognized top-level keys, so configuration files
//!    written for newer releases still validate.
//! 2. The `CheckEvery` leaf is typed `string`. Its reflected shape is the
//!    in-memory struct, but configuration files write it as text
//!    (`never`, `10m`).

use crate::document::{Definitions, InstanceType, PropertyType, SchemaDocument};
use crate::error::SchemaError;

/// Definition of the textual check interval.
pub const DURATION_LEAF_DEFINITION: &str = "CheckEvery";

/// Set the root document's `additionalProperties` to `true`.
pub fn allow_unknown_top_level_keys(document: &mut SchemaDocument) {
    document.root.additional_properties = Some(Box::new(PropertyType::Bool(true)));
}

/// Replace the `type` of a named definition. Everything else is kept.
pub fn override_type(
    definitions: &mut Definitions,
    name: &str,
    instance_type: InstanceType,
) -> Result<(), SchemaError> {
    let definition = definitions
        .get_mut(name)
        .ok_or_else(|| SchemaError::MissingDefinition {
            name: name.to_string(),
            context: "type override",
        })?;
    definition.instance_type = Some(instance_type.into());
    Ok(())
}

/// Apply both overrides.
pub fn apply_overrides(document: &mut SchemaDocument) -> Result<(), SchemaError> {
    allow_unknown_top_level_keys(document);
    override_type(
        &mut document.definitions,
        DURATION_LEAF_DEFINITION,
        InstanceType::String,
    )
}
