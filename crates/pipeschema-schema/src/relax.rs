//! # Placeholder Relaxation
//!
//! Once the abstract step definition is backed by the union of concrete
//! variants, its own reflected shape (a loose object) must go: otherwise a
//! value would have to satisfy both the loose shape and one variant, and
//! editors would offer the loose shape's completions. After relaxation the
//! placeholder is satisfiable solely through `anyOf`.

use crate::document::Definitions;
use crate::error::SchemaError;

/// Clear `type`, `properties`, `required` and `additionalProperties` of the
/// named placeholder. Other keywords (`anyOf`, `description`, …) stay.
///
/// # Errors
///
/// - [`SchemaError::MissingDefinition`] when `name` is not in the table.
/// - [`SchemaError::EmptyUnion`] when the placeholder has no `anyOf`
///   members yet; relaxing it would produce a schema matching anything.
pub fn relax(definitions: &mut Definitions, name: &str) -> Result<(), SchemaError> {
    let placeholder = definitions
        .get_mut(name)
        .ok_or_else(|| SchemaError::MissingDefinition {
            name: name.to_string(),
            context: "placeholder relaxation",
        })?;

    if placeholder.any_of.is_empty() {
        return Err(SchemaError::EmptyUnion {
            name: name.to_string(),
        });
    }

    placeholder.instance_type = None;
    placeholder.properties.clear();
    placeholder.required.clear();
    placeholder.additional_properties = None;
    Ok(())
}
