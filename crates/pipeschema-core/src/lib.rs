//! # pipeschema-core: Pipeline Configuration Type Model
//!
//! Declares the shape of a pipeline configuration document as plain Rust
//! types. Every type derives `serde` for (de)serialization and
//! `schemars::JsonSchema` so the schema crate can reflect it into draft-07
//! fragments. The types are the single source of truth for the emitted
//! schema: there are no hand-written shape descriptors that could drift.
//!
//! ## Closed Sets
//!
//! - [`StepKind`]: the 8 concrete step variants (`get`, `put`, `task`,
//!   `set_pipeline`, `load_var`, `in_parallel`, `do`, `try`).
//! - [`HookKind`]: the 9 cross-cutting hook/modifier fields accepted on any
//!   step (`on_success`, `on_failure`, `on_abort`, `on_error`, `ensure`,
//!   `timeout`, `attempts`, `across`, `fail_fast`).
//!
//! Adding a variant to either enum forces every exhaustive `match` in the
//! workspace to handle it.
//!
//! ## Abstract Step
//!
//! [`Step`] is an open mapping of keys. Which concrete variant it holds is
//! decided by its identifying key (see [`Step::kind`]), so the type itself
//! reflects to a loose object. The schema crate replaces that shape with a
//! union of the concrete variants.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pipeschema-*` crates.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod duration;
pub mod error;
pub mod hook;
pub mod step;

pub use config::{
    BuildLogRetention, Config, DisplayConfig, GroupConfig, JobConfig, ResourceConfig,
    ResourceTypeConfig, VarSourceConfig,
};
pub use duration::CheckEvery;
pub use error::ModelError;
pub use hook::{
    AcrossModifier, AcrossVarConfig, EnsureHook, FailFastModifier, HookKind, OnAbortHook,
    OnErrorHook, OnFailureHook, OnSuccessHook, RetryModifier, TimeoutModifier, HOOK_KIND_COUNT,
};
pub use step::{
    ContainerLimits, DoStep, GetStep, ImageResource, InParallelConfig, InParallelOptions,
    InParallelStep, InputsConfig, InputsKeyword, LoadVarFormat, LoadVarStep, Params, PutStep,
    SetPipelineStep, Step, StepKind, TaskCacheConfig, TaskConfig, TaskInputConfig,
    TaskOutputConfig, TaskRunConfig, TaskStep, TryStep, VersionConfig, VersionKeyword,
    STEP_KIND_COUNT,
};
