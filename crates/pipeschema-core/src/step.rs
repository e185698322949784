//! # Steps: The Abstract Step and Its 8 Concrete Variants
//!
//! A job's plan is a list of [`Step`]s. Each step is a mapping whose
//! identifying key (`get`, `put`, `task`, …) selects one of the closed set
//! of [`StepKind`]s. The remaining keys are either the variant's own fields
//! or one of the hook/modifier fields from [`crate::hook::HookKind`], which
//! any variant accepts.
//!
//! The concrete variant structs below describe only the variant's own
//! fields and reject any other key, so a misspelled field or a second
//! identifying key fails validation. Hook fields are added to every
//! variant by the schema composer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::hook::HookKind;

/// Free-form parameters handed to resource and task implementations.
pub type Params = BTreeMap<String, Value>;

/// The concrete kinds of step a plan may contain.
///
/// # Kinds
///
/// | # | Key | Definition | Purpose |
/// |---|-----|------------|---------|
/// | 1 | `get` | `GetStep` | Fetch a resource version |
/// | 2 | `put` | `PutStep` | Publish a resource version |
/// | 3 | `task` | `TaskStep` | Run a task in a container |
/// | 4 | `set_pipeline` | `SetPipelineStep` | Configure a pipeline from a file |
/// | 5 | `load_var` | `LoadVarStep` | Load a file into a local variable |
/// | 6 | `in_parallel` | `InParallelStep` | Run steps concurrently |
/// | 7 | `do` | `DoStep` | Run steps in sequence |
/// | 8 | `try` | `TryStep` | Run a step, ignoring its failure |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Fetch a resource version.
    Get,
    /// Publish a resource version.
    Put,
    /// Run a task.
    Task,
    /// Configure a pipeline.
    SetPipeline,
    /// Load a value into a local variable.
    LoadVar,
    /// Run steps concurrently.
    InParallel,
    /// Run steps in sequence.
    Do,
    /// Run a step and swallow its failure.
    Try,
}

/// Total number of step kinds.
pub const STEP_KIND_COUNT: usize = 8;

impl StepKind {
    /// Returns all step kinds in canonical order.
    ///
    /// This order is also the order of the schema's step union and the
    /// precedence used by [`Step::kind`].
    pub fn all() -> &'static [StepKind] {
        &[
            Self::Get,
            Self::Put,
            Self::Task,
            Self::SetPipeline,
            Self::LoadVar,
            Self::InParallel,
            Self::Do,
            Self::Try,
        ]
    }

    /// The identifying key of this kind in a step mapping.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Task => "task",
            Self::SetPipeline => "set_pipeline",
            Self::LoadVar => "load_var",
            Self::InParallel => "in_parallel",
            Self::Do => "do",
            Self::Try => "try",
        }
    }

    /// Name of the schema definition this kind's struct reflects to.
    pub fn definition_name(&self) -> &'static str {
        match self {
            Self::Get => "GetStep",
            Self::Put => "PutStep",
            Self::Task => "TaskStep",
            Self::SetPipeline => "SetPipelineStep",
            Self::LoadVar => "LoadVarStep",
            Self::InParallel => "InParallelStep",
            Self::Do => "DoStep",
            Self::Try => "TryStep",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStepKind(s.to_string()))
    }
}

/// A step as written in a plan: an open mapping of keys.
///
/// The mapping holds the identifying key of one [`StepKind`], that
/// variant's fields, and any hook/modifier fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Step {
    /// Every key of the step mapping.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Step {
    /// Which concrete variant this step holds.
    ///
    /// When several identifying keys are present the earliest kind in
    /// [`StepKind::all`] wins. Returns `None` for a mapping with no
    /// identifying key.
    pub fn kind(&self) -> Option<StepKind> {
        StepKind::all()
            .iter()
            .copied()
            .find(|kind| self.fields.contains_key(kind.as_str()))
    }

    /// Hook and modifier fields present on this step, in canonical order.
    pub fn hooks(&self) -> Vec<HookKind> {
        HookKind::all()
            .iter()
            .copied()
            .filter(|hook| self.fields.contains_key(hook.as_str()))
            .collect()
    }

    /// The value under `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Which resource version a `get` fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum VersionConfig {
    /// `latest` or `every`.
    Keyword(VersionKeyword),
    /// A specific version, given as its key/value pairs.
    Pinned(BTreeMap<String, String>),
}

/// Keyword forms of [`VersionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VersionKeyword {
    /// Only the newest version.
    Latest,
    /// Every version, in order.
    Every,
}

/// Fetch a version of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetStep {
    /// Artifact name the fetched bits are placed under.
    pub get: String,
    /// Resource to fetch, when it differs from the artifact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    /// Only versions that passed through these jobs are fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<Vec<String>>,
    /// Trigger a new build when a new version appears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Keyword forms of [`InputsConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputsKeyword {
    /// Every artifact in the build.
    All,
    /// Artifacts referenced from `params`.
    Detect,
}

/// Which artifacts a `put` receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum InputsConfig {
    /// `all` or `detect`.
    Keyword(InputsKeyword),
    /// An explicit list of artifact names.
    Names(Vec<String>),
}

/// Publish a new version of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PutStep {
    /// Name of the resource to publish to.
    pub put: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<InputsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    /// Parameters for the implicit `get` that follows the `put`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_params: Option<Params>,
    /// Skip the implicit `get`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_get: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Container resource limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ContainerLimits {
    /// CPU shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u64>,
    /// Memory limit in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

/// Image a task container is created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ImageResource {
    /// Resource type used to fetch the image.
    #[serde(rename = "type")]
    pub resource_type: String,
    pub source: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<BTreeMap<String, String>>,
}

/// Command run inside a task container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaskRunConfig {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaskInputConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaskOutputConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaskCacheConfig {
    pub path: String,
}

/// Inline task definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Worker platform the task runs on (`linux`, `darwin`, `windows`).
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_resource: Option<ImageResource>,
    pub run: TaskRunConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<TaskInputConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<TaskOutputConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caches: Option<Vec<TaskCacheConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_limits: Option<ContainerLimits>,
}

/// Run a task, either inline or loaded from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaskStep {
    /// Name of the task, used for display and artifact naming.
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TaskConfig>,
    /// Path to a task config file inside an artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Artifact to use as the task image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_limits: Option<ContainerLimits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Configure a pipeline from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SetPipelineStep {
    /// Name of the pipeline to configure, or `self`.
    pub set_pipeline: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_vars: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// Formats `load_var` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadVarFormat {
    Json,
    Yaml,
    Yml,
    Trim,
    Raw,
}

/// Load a file's content into a build-local variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoadVarStep {
    /// Name of the local variable.
    pub load_var: String,
    pub file: String,
    /// Detected from the file extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<LoadVarFormat>,
    /// Show the value in build output instead of redacting it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<bool>,
}

/// Long form of `in_parallel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InParallelOptions {
    pub steps: Vec<Step>,
    /// Maximum number of steps running at once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Abort remaining steps once one fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
}

/// Either a bare list of steps or the long form with options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum InParallelConfig {
    Steps(Vec<Step>),
    Options(InParallelOptions),
}

/// Run steps concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InParallelStep {
    pub in_parallel: InParallelConfig,
}

/// Run steps in sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DoStep {
    #[serde(rename = "do")]
    pub steps: Vec<Step>,
}

/// Run a step and succeed even when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TryStep {
    #[serde(rename = "try")]
    pub step: Step,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(value: Value) -> Step {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(StepKind::all().len(), STEP_KIND_COUNT);
    }

    #[test]
    fn test_all_kinds_unique() {
        let mut keys = std::collections::HashSet::new();
        let mut names = std::collections::HashSet::new();
        for kind in StepKind::all() {
            assert!(keys.insert(kind.as_str()), "duplicate key: {kind}");
            assert!(
                names.insert(kind.definition_name()),
                "duplicate definition: {}",
                kind.definition_name()
            );
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in StepKind::all() {
            assert_eq!(kind.as_str().parse::<StepKind>().unwrap(), *kind);
        }
        assert!("Get".parse::<StepKind>().is_err());
        assert!("on_failure".parse::<StepKind>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for kind in StepKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_step_kind_detection() {
        assert_eq!(step(json!({"get": "repo"})).kind(), Some(StepKind::Get));
        assert_eq!(
            step(json!({"do": [], "timeout": "1h"})).kind(),
            Some(StepKind::Do)
        );
        assert_eq!(
            step(json!({"set_pipeline": "self", "file": "ci/pipeline.yml"})).kind(),
            Some(StepKind::SetPipeline)
        );
        assert_eq!(step(json!({"attempts": 3})).kind(), None);
    }

    #[test]
    fn test_step_kind_precedence() {
        let ambiguous = step(json!({"task": "unit", "get": "repo"}));
        assert_eq!(ambiguous.kind(), Some(StepKind::Get));
    }

    #[test]
    fn test_step_hooks_in_canonical_order() {
        let s = step(json!({
            "task": "unit",
            "timeout": "10m",
            "on_failure": {"put": "alert"},
            "attempts": 2,
        }));
        assert_eq!(
            s.hooks(),
            vec![HookKind::OnFailure, HookKind::Timeout, HookKind::Attempts]
        );
    }

    #[test]
    fn test_step_preserves_unknown_keys() {
        let s = step(json!({"get": "repo", "x-note": "kept"}));
        assert_eq!(s.get("x-note"), Some(&json!("kept")));
        assert_eq!(serde_json::to_value(&s).unwrap()["x-note"], "kept");
    }

    #[test]
    fn test_variant_structs_parse_their_step() {
        let get: GetStep =
            serde_json::from_value(json!({"get": "repo", "trigger": true, "version": "every"}))
                .unwrap();
        assert_eq!(get.version, Some(VersionConfig::Keyword(VersionKeyword::Every)));

        let put: PutStep =
            serde_json::from_value(json!({"put": "image", "inputs": ["build"]})).unwrap();
        assert_eq!(put.inputs, Some(InputsConfig::Names(vec!["build".into()])));

        let do_step: DoStep = serde_json::from_value(json!({"do": [{"get": "a"}]})).unwrap();
        assert_eq!(do_step.steps[0].kind(), Some(StepKind::Get));

        let try_step: TryStep =
            serde_json::from_value(json!({"try": {"put": "notify"}})).unwrap();
        assert_eq!(try_step.step.kind(), Some(StepKind::Put));

        let parallel: InParallelStep = serde_json::from_value(
            json!({"in_parallel": {"steps": [{"get": "a"}], "limit": 2}}),
        )
        .unwrap();
        assert!(matches!(parallel.in_parallel, InParallelConfig::Options(_)));
    }

    #[test]
    fn test_variant_structs_reject_foreign_keys() {
        let misspelled = serde_json::from_value::<GetStep>(json!({"get": "repo", "trigerr": true}));
        assert!(misspelled.is_err(), "misspelled field should be rejected");

        let mixed = serde_json::from_value::<GetStep>(json!({"get": "repo", "put": "repo"}));
        assert!(mixed.is_err(), "a second identifying key should be rejected");

        let nested = serde_json::from_value::<TaskStep>(json!({
            "task": "unit",
            "config": {"platform": "linux", "run": {"path": "make", "cwd": "src"}}
        }));
        assert!(nested.is_err(), "sub-structs are closed as well");
    }
}
