//! # Step Union
//!
//! Appends each concrete variant's top-level descriptor to the abstract
//! step placeholder's `anyOf`. The descriptor is embedded as reflected (a
//! `$ref` for named variants), not looked up in the table. No
//! deduplication: one entry per variant, in caller order.

use crate::document::{Definition, PropertyType};
use crate::error::SchemaError;

/// Append every variant to `placeholder.any_of`.
///
/// `variants` pairs each variant's type name with its top-level descriptor.
/// Returns the definition name each appended entry refers to, in order, so
/// the hook injector knows which definitions to extend.
///
/// # Errors
///
/// [`SchemaError::UnnamedVariant`] when a descriptor is not a reference to a
/// named definition.
pub fn build_union(
    placeholder: &mut Definition,
    variants: impl IntoIterator<Item = (&'static str, PropertyType)>,
) -> Result<Vec<String>, SchemaError> {
    let mut names = Vec::new();
    for (type_name, descriptor) in variants {
        let name = descriptor
            .reference_name()
            .ok_or(SchemaError::UnnamedVariant { type_name })?
            .to_string();
        placeholder.any_of.push(descriptor);
        names.push(name);
    }
    Ok(names)
}
