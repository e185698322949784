//! # Reflection: Types to Schema Fragments
//!
//! The composer never inspects Rust types itself. It asks a [`Reflect`]
//! implementation for a [`Fragment`]: the type's top-level descriptor plus
//! the table of named sub-definitions that descriptor transitively needs.
//!
//! [`Reflector`] implements the seam with `schemars`. Each reflection uses a
//! fresh draft-07 generator, so fragments are independent of each other, and
//! asks for the type as a *subschema*: a type that has a name comes back as
//! `{"$ref": "#/definitions/<Name>"}` with its own shape placed in the
//! definitions table alongside its dependencies.

use std::fmt;
use std::marker::PhantomData;

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::Value;

use crate::document::{Definitions, PropertyType};
use crate::error::SchemaError;

/// The result of reflecting one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Descriptor of the type itself, normally a `$ref`.
    pub top_level: PropertyType,
    /// Named sub-definitions, including the type's own when it is named.
    pub definitions: Definitions,
}

/// Something that can be reflected into a [`Fragment`].
pub trait Reflect {
    /// Name of the reflected type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Produce the type's schema fragment.
    fn reflect(&self) -> Result<Fragment, SchemaError>;
}

/// [`Reflect`] for any `T: JsonSchema`, backed by `schemars`.
pub struct Reflector<T: ?Sized> {
    marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized> Reflector<T> {
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for Reflector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Reflector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reflector")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: JsonSchema + ?Sized> Reflect for Reflector<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn reflect(&self) -> Result<Fragment, SchemaError> {
        let type_name = self.type_name();
        let reflection_error = |source| SchemaError::Reflection { type_name, source };

        let mut generator = SchemaSettings::draft07().into_generator();
        let top_level = generator.subschema_for::<T>();
        let top_level = serde_json::to_value(&top_level)
            .and_then(serde_json::from_value::<PropertyType>)
            .map_err(reflection_error)?;

        let definitions = Value::Object(generator.definitions().clone());
        let definitions =
            serde_json::from_value::<Definitions>(definitions).map_err(reflection_error)?;

        Ok(Fragment {
            top_level,
            definitions,
        })
    }
}

/// Reflect `T` with a [`Reflector`].
pub fn reflect<T: JsonSchema + ?Sized>() -> Result<Fragment, SchemaError> {
    Reflector::<T>::new().reflect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{InstanceType, TypeTag};
    use pipeschema_core::{AcrossModifier, GetStep, Step};

    #[test]
    fn test_named_type_reflects_to_reference() {
        let fragment = reflect::<GetStep>().unwrap();
        assert_eq!(fragment.top_level.reference_name(), Some("GetStep"));

        let get = &fragment.definitions["GetStep"];
        assert!(get.properties.contains_key("get"));
        assert!(get.required.contains("get"));
        assert!(
            !get.required.contains("trigger"),
            "optional fields must not be required"
        );
        assert!(
            fragment.definitions.contains_key("VersionConfig"),
            "sub-definitions are reflected alongside the type: {:?}",
            fragment.definitions.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sub_definitions_follow_references() {
        let fragment = reflect::<AcrossModifier>().unwrap();
        assert_eq!(fragment.top_level.reference_name(), Some("AcrossModifier"));
        assert!(fragment.definitions.contains_key("AcrossVarConfig"));
    }

    #[test]
    fn test_step_placeholder_is_loose_object() {
        let fragment = reflect::<Step>().unwrap();
        let step = &fragment.definitions["Step"];
        assert_eq!(
            step.instance_type,
            Some(TypeTag::Single(InstanceType::Object))
        );
        assert!(step.any_of.is_empty());
    }

    #[test]
    fn test_primitive_reflects_inline() {
        let fragment = reflect::<String>().unwrap();
        assert_eq!(fragment.top_level, PropertyType::primitive(InstanceType::String));
        assert!(fragment.definitions.is_empty());
    }

    #[test]
    fn test_reflection_is_repeatable() {
        assert_eq!(reflect::<GetStep>().unwrap(), reflect::<GetStep>().unwrap());
    }

    #[test]
    fn test_type_name_for_diagnostics() {
        assert!(Reflector::<GetStep>::new().type_name().ends_with("GetStep"));
    }
}
