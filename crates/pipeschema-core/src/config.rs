//! # Pipeline Config: The Root Document
//!
//! [`Config`] is the root of a pipeline configuration file. Its jobs hold
//! plans of [`Step`]s; its resources and resource types carry textual
//! [`CheckEvery`] intervals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::duration::CheckEvery;
use crate::step::{Params, Step, VersionConfig};

/// A complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<ResourceConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<ResourceTypeConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_sources: Option<Vec<VarSourceConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,
}

impl Config {
    /// Every step of every job plan, outermost steps only.
    pub fn plan_steps(&self) -> impl Iterator<Item = &Step> {
        self.jobs.iter().flat_map(|job| job.plan.iter())
    }

    /// Look up a resource by name.
    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|resource| resource.name == name)
    }
}

/// How many builds of a job are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BuildLogRetention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_succeeded_builds: Option<u32>,
}

/// A job: a named plan plus scheduling options and job-level hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobConfig {
    pub name: String,
    pub plan: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_in_flight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_manual_trigger: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruptible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_log_retention: Option<BuildLogRetention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_abort: Option<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure: Option<Step>,
}

/// A versioned external artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub source: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_every: Option<CheckEvery>,
    /// Duration text bounding a single check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_token: Option<String>,
}

/// A custom resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceTypeConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub source: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_every: Option<CheckEvery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Named grouping of jobs in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<String>>,
}

/// A source of `((vars))` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VarSourceConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub config: Params,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_filter: Option<String>,
}
