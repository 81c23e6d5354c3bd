// error.rs — Kernel error taxonomy.
//
// Three families, raised synchronously before any analyzer runs: TypeError
// (a required value is absent or empty), ValidationError (a value is
// present but structurally wrong), ConfigurationError (construction
// options are out of range). Malformed output text is never an error —
// it is scored by the analyzers instead.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// No capsule was supplied. Unreachable from the typed
    /// `ComplianceKernel::new` constructor; reachable from
    /// `Capsule::from_json` when the input value is `null` or missing
    /// entirely.
    #[error("capsule is required")]
    MissingCapsule,

    /// `task.id` was absent or empty.
    #[error("task.id is required and must be non-empty")]
    MissingTaskId,

    /// `output` was empty.
    #[error("output must be a non-empty string")]
    EmptyOutput,

    /// The capsule's `governance` block is absent or structurally
    /// incomplete (only reachable via `Capsule::from_json`).
    #[error("capsule.governance is missing or invalid: {reason}")]
    InvalidGovernanceBlock { reason: String },

    /// A capsule or task field has the wrong JSON type (only reachable
    /// via `Capsule::from_json` / `Task::from_json`).
    #[error("field `{field}` must be {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },

    /// Custom weights did not sum to 1.0 within tolerance.
    #[error("weights must sum to 1.0 (±0.001), got {sum}")]
    WeightsDoNotSumToOne { sum: f64 },

    /// Threshold outside `[0, 100]`.
    #[error("threshold must be in [0, 100], got {threshold}")]
    ThresholdOutOfRange { threshold: i64 },
}
