//! # Hooks and Modifiers
//!
//! Optional cross-cutting fields that may be attached to any step variant.
//! Five are hooks that run another step (`on_success`, `on_failure`,
//! `on_abort`, `on_error`, `ensure`); four modify how the step itself runs
//! (`timeout`, `attempts`, `across`, `fail_fast`).
//!
//! Each field has a small modifier struct naming it. The structs exist so
//! their sub-types (notably [`AcrossVarConfig`]) can be reflected into the
//! schema's definitions; they are never members of the step union.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::step::Step;

/// The hook and modifier fields accepted on every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Step run after the step succeeds.
    OnSuccess,
    /// Step run after the step fails.
    OnFailure,
    /// Step run after the build is aborted during the step.
    OnAbort,
    /// Step run after the step errors.
    OnError,
    /// Step run after the step regardless of outcome.
    Ensure,
    /// Maximum run time of the step.
    Timeout,
    /// Number of attempts before the step is considered failed.
    Attempts,
    /// Run the step once per combination of variable values.
    Across,
    /// Stop remaining `across` combinations after the first failure.
    FailFast,
}

/// Total number of hook and modifier fields.
pub const HOOK_KIND_COUNT: usize = 9;

impl HookKind {
    /// Returns all hooks and modifiers in canonical order.
    pub fn all() -> &'static [HookKind] {
        &[
            Self::OnSuccess,
            Self::OnFailure,
            Self::OnAbort,
            Self::OnError,
            Self::Ensure,
            Self::Timeout,
            Self::Attempts,
            Self::Across,
            Self::FailFast,
        ]
    }

    /// The property name of this field on a step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnSuccess => "on_success",
            Self::OnFailure => "on_failure",
            Self::OnAbort => "on_abort",
            Self::OnError => "on_error",
            Self::Ensure => "ensure",
            Self::Timeout => "timeout",
            Self::Attempts => "attempts",
            Self::Across => "across",
            Self::FailFast => "fail_fast",
        }
    }

    /// Whether the field's value is itself a step.
    pub fn takes_step(&self) -> bool {
        matches!(
            self,
            Self::OnSuccess | Self::OnFailure | Self::OnAbort | Self::OnError | Self::Ensure
        )
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| ModelError::UnknownHook(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OnSuccessHook {
    pub on_success: Step,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OnFailureHook {
    pub on_failure: Step,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OnAbortHook {
    pub on_abort: Step,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OnErrorHook {
    pub on_error: Step,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnsureHook {
    pub ensure: Step,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeoutModifier {
    /// Duration text such as `1h30m`.
    pub timeout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RetryModifier {
    pub attempts: u32,
}

/// One variable an `across` step iterates over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AcrossVarConfig {
    /// Name the current value is bound to.
    pub var: String,
    /// Values to iterate over.
    pub values: Vec<Value>,
    /// Number of combinations run at once. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_in_flight: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AcrossModifier {
    pub across: Vec<AcrossVarConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FailFastModifier {
    pub fail_fast: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_hooks_count() {
        assert_eq!(HookKind::all().len(), HOOK_KIND_COUNT);
    }

    #[test]
    fn test_all_hooks_unique() {
        let mut seen = std::collections::HashSet::new();
        for hook in HookKind::all() {
            assert!(seen.insert(hook.as_str()), "duplicate hook: {hook}");
        }
    }

    #[test]
    fn test_hook_names_never_collide_with_step_keys() {
        for hook in HookKind::all() {
            assert!(
                hook.as_str().parse::<crate::StepKind>().is_err(),
                "hook {hook} shadows a step key"
            );
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for hook in HookKind::all() {
            assert_eq!(hook.as_str().parse::<HookKind>().unwrap(), *hook);
            assert_eq!(hook.to_string(), hook.as_str());
        }
        assert!("retry".parse::<HookKind>().is_err());
    }

    #[test]
    fn test_takes_step() {
        let stepped: Vec<_> = HookKind::all().iter().filter(|h| h.takes_step()).collect();
        assert_eq!(stepped.len(), 5);
        assert!(!HookKind::Across.takes_step());
    }

    #[test]
    fn test_across_parses() {
        let across: AcrossModifier = serde_json::from_value(json!({
            "across": [{"var": "go", "values": ["1.21", "1.22"], "max_in_flight": 2}]
        }))
        .unwrap();
        assert_eq!(across.across[0].var, "go");
        assert_eq!(across.across[0].max_in_flight, Some(2));
    }
}
