//! # Hook Injection
//!
//! Every concrete step variant accepts the same 9 optional hook/modifier
//! fields. Their schema types are fixed here rather than reflected:
//!
//! | Property | Schema |
//! |----------|--------|
//! | `on_success`, `on_failure`, `on_abort`, `on_error`, `ensure` | `$ref: #/definitions/Step` |
//! | `timeout` | `string` |
//! | `attempts` | `integer` |
//! | `across` | array of `$ref: #/definitions/AcrossVarConfig` |
//! | `fail_fast` | `boolean` |
//!
//! The five step-valued hooks refer back to the abstract step, so a hook's
//! step may carry hooks of its own to any depth.

use pipeschema_core::HookKind;

use crate::document::{Definitions, InstanceType, PropertyType};
use crate::error::SchemaError;

/// Name of the abstract step definition.
pub const STEP_DEFINITION: &str = "Step";

/// Name of the definition `across` items refer to.
pub const ACROSS_VAR_DEFINITION: &str = "AcrossVarConfig";

/// One injected property.
#[derive(Debug, Clone, PartialEq)]
pub struct HookProperty {
    pub name: String,
    pub property_type: PropertyType,
}

/// The fixed schema type of a hook or modifier field.
pub fn hook_property_type(kind: HookKind) -> PropertyType {
    match kind {
        HookKind::OnSuccess
        | HookKind::OnFailure
        | HookKind::OnAbort
        | HookKind::OnError
        | HookKind::Ensure => PropertyType::reference(STEP_DEFINITION),
        HookKind::Timeout => PropertyType::primitive(InstanceType::String),
        HookKind::Attempts => PropertyType::primitive(InstanceType::Integer),
        HookKind::Across => PropertyType::array_of(PropertyType::reference(ACROSS_VAR_DEFINITION)),
        HookKind::FailFast => PropertyType::primitive(InstanceType::Boolean),
    }
}

/// All 9 hook properties in canonical order.
pub fn pipeline_hooks() -> Vec<HookProperty> {
    HookKind::all()
        .iter()
        .map(|kind| HookProperty {
            name: kind.as_str().to_string(),
            property_type: hook_property_type(*kind),
        })
        .collect()
}

/// Set every hook property on every named variant definition.
///
/// A property the variant already declares under the same name is
/// overwritten in place; new properties are appended in `hooks` order.
///
/// # Errors
///
/// [`SchemaError::MissingDefinition`] when a variant name is not in the
/// table. Nothing is injected in that case.
pub fn inject(
    hooks: &[HookProperty],
    variant_names: &[String],
    definitions: &mut Definitions,
) -> Result<(), SchemaError> {
    if let Some(missing) = variant_names
        .iter()
        .find(|name| !definitions.contains_key(name.as_str()))
    {
        return Err(SchemaError::MissingDefinition {
            name: missing.clone(),
            context: "hook injection into step variant",
        });
    }

    for name in variant_names {
        if let Some(variant) = definitions.get_mut(name) {
            for hook in hooks {
                variant
                    .properties
                    .insert(hook.name.clone(), hook.property_type.clone());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Definition;

    fn variant(properties: &[(&str, PropertyType)]) -> Definition {
        Definition {
            instance_type: Some(InstanceType::Object.into()),
            properties: properties
                .iter()
                .map(|(name, t)| (name.to_string(), t.clone()))
                .collect(),
            ..Definition::default()
        }
    }

    #[test]
    fn test_pipeline_hooks_fixed_set() {
        let hooks = pipeline_hooks();
        let names: Vec<_> = hooks.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "on_success",
                "on_failure",
                "on_abort",
                "on_error",
                "ensure",
                "timeout",
                "attempts",
                "across",
                "fail_fast",
            ]
        );

        let self_referential = hooks
            .iter()
            .filter(|h| h.property_type.reference_name() == Some(STEP_DEFINITION))
            .count();
        assert_eq!(self_referential, 5);
    }

    #[test]
    fn test_across_is_array_of_var_config() {
        let across = hook_property_type(HookKind::Across);
        let items = across.as_definition().unwrap().items.as_deref().unwrap();
        assert_eq!(items.reference_name(), Some(ACROSS_VAR_DEFINITION));
    }

    #[test]
    fn test_inject_adds_all_hooks_after_own_properties() {
        let mut definitions = Definitions::new();
        definitions.insert(
            "A".into(),
            variant(&[("foo", PropertyType::primitive(InstanceType::String))]),
        );

        inject(&pipeline_hooks(), &["A".to_string()], &mut definitions).unwrap();

        let keys: Vec<_> = definitions["A"].properties.keys().cloned().collect();
        assert_eq!(keys.len(), 10);
        assert_eq!(keys[0], "foo");
        for kind in HookKind::all() {
            assert!(keys.iter().any(|k| k == kind.as_str()), "missing hook {kind}");
        }
    }

    #[test]
    fn test_inject_overwrites_declared_property() {
        let mut definitions = Definitions::new();
        definitions.insert(
            "A".into(),
            variant(&[
                ("attempts", PropertyType::primitive(InstanceType::String)),
                ("foo", PropertyType::primitive(InstanceType::String)),
            ]),
        );

        inject(&pipeline_hooks(), &["A".to_string()], &mut definitions).unwrap();

        let properties = &definitions["A"].properties;
        assert_eq!(
            properties["attempts"],
            PropertyType::primitive(InstanceType::Integer),
            "injected type must win over the variant's own declaration"
        );
        assert_eq!(
            properties.get_index_of("attempts"),
            Some(0),
            "overwritten property keeps its position"
        );
        assert_eq!(properties.len(), 10);
    }

    #[test]
    fn test_inject_leaves_other_definitions_alone() {
        let mut definitions = Definitions::new();
        definitions.insert("A".into(), variant(&[]));
        definitions.insert("Unrelated".into(), variant(&[]));

        inject(&pipeline_hooks(), &["A".to_string()], &mut definitions).unwrap();
        assert!(definitions["Unrelated"].properties.is_empty());
    }

    #[test]
    fn test_inject_missing_variant_is_error() {
        let mut definitions = Definitions::new();
        definitions.insert("A".into(), variant(&[]));

        let err = inject(
            &pipeline_hooks(),
            &["A".to_string(), "Ghost".to_string()],
            &mut definitions,
        )
        .unwrap_err();

        assert!(matches!(err, SchemaError::MissingDefinition { ref name, .. } if name == "Ghost"));
        assert!(
            definitions["A"].properties.is_empty(),
            "no variant is touched when one is missing"
        );
    }
}
