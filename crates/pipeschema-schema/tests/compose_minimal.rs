//! Integration test: composition over a minimal hand-written type model.
//!
//! A root with one step field, two trivial variants `A = {foo: string}` and
//! `B = {bar: integer}`, and a `CheckEvery` leaf for the type override.

#![allow(dead_code)]

use pipeschema_core::HookKind;
use pipeschema_schema::{
    apply_overrides, InstanceType, PropertyType, Reflector, SchemaComposer, SchemaDocument,
    TypeTag,
};
use schemars::JsonSchema;

#[derive(JsonSchema)]
struct Step {
    kind: String,
}

#[derive(JsonSchema)]
struct CheckEvery {
    seconds: u64,
}

#[derive(JsonSchema)]
struct Root {
    step: Step,
    check_every: CheckEvery,
}

#[derive(JsonSchema)]
struct A {
    foo: String,
}

#[derive(JsonSchema)]
struct B {
    bar: i64,
}

/// Declares a property named like a hook with a conflicting type.
#[derive(JsonSchema)]
struct C {
    timeout: u64,
    attempts: String,
}

/// Fields declared out of name order.
#[derive(JsonSchema)]
struct D {
    zeta: String,
    alpha: String,
}

/// A modifier contributing a definition that no variant references.
#[derive(JsonSchema)]
struct Extra {
    value: String,
}

#[derive(JsonSchema)]
struct Modifier {
    extra: Extra,
}

fn compose(variants: &[&dyn pipeschema_schema::Reflect]) -> SchemaDocument {
    let mut document = SchemaComposer::new()
        .compose(
            &Reflector::<Root>::new(),
            variants,
            &[&Reflector::<Modifier>::new()],
        )
        .expect("composition should succeed");
    apply_overrides(&mut document).expect("overrides should apply");
    document
}

fn property_names(document: &SchemaDocument, name: &str) -> Vec<String> {
    document.definitions[name]
        .properties
        .keys()
        .cloned()
        .collect()
}

#[test]
fn test_union_is_references_in_order() {
    let document = compose(&[&Reflector::<A>::new(), &Reflector::<B>::new()]);
    assert_eq!(
        document.definitions["Step"].any_of,
        vec![PropertyType::reference("A"), PropertyType::reference("B")]
    );
}

#[test]
fn test_variants_carry_own_fields_and_hooks() {
    let document = compose(&[&Reflector::<A>::new(), &Reflector::<B>::new()]);

    let mut expected_a = vec!["foo".to_string()];
    let mut expected_b = vec!["bar".to_string()];
    for hook in HookKind::all() {
        expected_a.push(hook.as_str().to_string());
        expected_b.push(hook.as_str().to_string());
    }
    assert_eq!(property_names(&document, "A"), expected_a);
    assert_eq!(property_names(&document, "B"), expected_b);
}

#[test]
fn test_placeholder_is_relaxed() {
    let document = compose(&[&Reflector::<A>::new(), &Reflector::<B>::new()]);
    let step = &document.definitions["Step"];
    assert!(step.instance_type.is_none());
    assert!(step.properties.is_empty());
    assert!(step.required.is_empty());
    assert!(step.additional_properties.is_none());
    assert_eq!(step.any_of.len(), 2);
}

#[test]
fn test_manual_overrides_applied() {
    let document = compose(&[&Reflector::<A>::new(), &Reflector::<B>::new()]);
    assert_eq!(
        document.root.additional_properties.as_deref(),
        Some(&PropertyType::Bool(true))
    );
    assert_eq!(
        document.definitions["CheckEvery"].instance_type,
        Some(TypeTag::Single(InstanceType::String))
    );
}

#[test]
fn test_injected_hooks_override_variant_declarations() {
    let document = compose(&[&Reflector::<C>::new()]);
    let c = &document.definitions["C"];
    assert_eq!(
        c.properties["timeout"],
        PropertyType::primitive(InstanceType::String)
    );
    assert_eq!(
        c.properties["attempts"],
        PropertyType::primitive(InstanceType::Integer)
    );
    assert_eq!(c.properties.len(), 9);
}

#[test]
fn test_modifier_definitions_merged_but_not_in_union() {
    let document = compose(&[&Reflector::<A>::new()]);
    assert!(document.definitions.contains_key("Extra"));
    assert!(document.definitions.contains_key("Modifier"));

    let members: Vec<_> = document.definitions["Step"]
        .any_of
        .iter()
        .filter_map(PropertyType::reference_name)
        .collect();
    assert_eq!(members, vec!["A"]);
}

#[test]
fn test_output_is_deterministic() {
    let first = compose(&[&Reflector::<A>::new(), &Reflector::<B>::new()])
        .to_json()
        .unwrap();
    let second = compose(&[&Reflector::<A>::new(), &Reflector::<B>::new()])
        .to_json()
        .unwrap();
    assert_eq!(first, second);

    let parsed: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(parsed["$ref"], "#/definitions/Root");
}

#[test]
fn test_reflected_properties_sorted_before_hooks() {
    let document = compose(&[&Reflector::<D>::new()]);
    let names = property_names(&document, "D");
    assert_eq!(names[..2], ["alpha".to_string(), "zeta".to_string()]);
    assert_eq!(names[2], HookKind::all()[0].as_str(), "hooks follow own fields");
    assert_eq!(names.len(), 2 + HookKind::all().len());
}
