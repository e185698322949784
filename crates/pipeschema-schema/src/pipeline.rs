//! # Pipeline Schema
//!
//! Wires the pipeline type model from `pipeschema-core` into the composer:
//! root [`Config`], the 8 [`StepKind`] variants and the 9 [`HookKind`]
//! modifier types, followed by the manual overrides.

use pipeschema_core::{
    AcrossModifier, Config, DoStep, EnsureHook, FailFastModifier, GetStep, HookKind,
    InParallelStep, LoadVarStep, OnAbortHook, OnErrorHook, OnFailureHook, OnSuccessHook, PutStep,
    RetryModifier, SetPipelineStep, StepKind, TaskStep, TimeoutModifier, TryStep,
};

use crate::compose::SchemaComposer;
use crate::document::SchemaDocument;
use crate::error::SchemaError;
use crate::overrides::apply_overrides;
use crate::reflect::{Reflect, Reflector};

/// Reflector for a step variant's struct.
pub fn step_reflector(kind: StepKind) -> Box<dyn Reflect> {
    match kind {
        StepKind::Get => Box::new(Reflector::<GetStep>::new()),
        StepKind::Put => Box::new(Reflector::<PutStep>::new()),
        StepKind::Task => Box::new(Reflector::<TaskStep>::new()),
        StepKind::SetPipeline => Box::new(Reflector::<SetPipelineStep>::new()),
        StepKind::LoadVar => Box::new(Reflector::<LoadVarStep>::new()),
        StepKind::InParallel => Box::new(Reflector::<InParallelStep>::new()),
        StepKind::Do => Box::new(Reflector::<DoStep>::new()),
        StepKind::Try => Box::new(Reflector::<TryStep>::new()),
    }
}

/// Reflector for a hook or modifier's struct.
pub fn hook_reflector(kind: HookKind) -> Box<dyn Reflect> {
    match kind {
        HookKind::OnSuccess => Box::new(Reflector::<OnSuccessHook>::new()),
        HookKind::OnFailure => Box::new(Reflector::<OnFailureHook>::new()),
        HookKind::OnAbort => Box::new(Reflector::<OnAbortHook>::new()),
        HookKind::OnError => Box::new(Reflector::<OnErrorHook>::new()),
        HookKind::Ensure => Box::new(Reflector::<EnsureHook>::new()),
        HookKind::Timeout => Box::new(Reflector::<TimeoutModifier>::new()),
        HookKind::Attempts => Box::new(Reflector::<RetryModifier>::new()),
        HookKind::Across => Box::new(Reflector::<AcrossModifier>::new()),
        HookKind::FailFast => Box::new(Reflector::<FailFastModifier>::new()),
    }
}

/// Compose the complete pipeline configuration schema.
pub fn pipeline_schema() -> Result<SchemaDocument, SchemaError> {
    let root = Reflector::<Config>::new();
    let steps: Vec<_> = StepKind::all().iter().map(|k| step_reflector(*k)).collect();
    let hooks: Vec<_> = HookKind::all().iter().map(|k| hook_reflector(*k)).collect();

    let step_refs: Vec<&dyn Reflect> = steps.iter().map(|r| r.as_ref()).collect();
    let hook_refs: Vec<&dyn Reflect> = hooks.iter().map(|r| r.as_ref()).collect();

    let mut document = SchemaComposer::new().compose(&root, &step_refs, &hook_refs)?;
    apply_overrides(&mut document)?;
    Ok(document)
}
