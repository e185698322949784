//! # pipeschema-schema: Pipeline Schema Composition
//!
//! Produces the draft-07 JSON Schema that editors and validators use to check
//! pipeline configuration files before they are run.
//!
//! ## Composition
//!
//! Reflection alone cannot describe a step: the abstract [`Step`] type is an
//! open mapping whose concrete shape is chosen by key. The [`compose`]
//! module therefore assembles the document from independent fragments:
//!
//! - [`reflect`]: type → fragment (top-level descriptor + definitions).
//! - [`merge`]: first-writer-wins union of definition tables.
//! - [`union`]: the step variants become `Step.anyOf`.
//! - [`hooks`]: the 9 hook/modifier properties are added to every variant.
//! - [`relax`]: `Step` loses its own shape and validates only via `anyOf`.
//! - [`overrides`]: root `additionalProperties: true`; `CheckEvery` typed
//!   `string`.
//!
//! [`pipeline_schema`] runs all of it over the real type model.
//!
//! ## Crate Policy
//!
//! - Depends only on `pipeschema-core` internally.
//! - Composition is synchronous and in-memory; the definitions table is
//!   owned by one [`SchemaDocument`] and threaded through each stage by
//!   `&mut`.
//! - Every precondition a stage relies on is checked and reported as a
//!   [`SchemaError`]; no stage silently no-ops on an absent definition.
//!
//! [`Step`]: pipeschema_core::Step

pub mod compose;
pub mod document;
pub mod error;
pub mod hooks;
pub mod merge;
pub mod overrides;
pub mod pipeline;
pub mod reflect;
pub mod relax;
pub mod union;

pub use compose::SchemaComposer;
pub use document::{
    definition_ref, Definition, Definitions, InstanceType, PropertyType, SchemaDocument, TypeTag,
    DRAFT_07,
};
pub use error::SchemaError;
pub use hooks::{pipeline_hooks, HookProperty, ACROSS_VAR_DEFINITION, STEP_DEFINITION};
pub use merge::{conflicting_definitions, MergeOutcome};
pub use overrides::{apply_overrides, DURATION_LEAF_DEFINITION};
pub use pipeline::{hook_reflector, pipeline_schema, step_reflector};
pub use reflect::{Fragment, Reflect, Reflector};
