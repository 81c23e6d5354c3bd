// report.rs — the frozen ComplianceReport shape (§6) and its enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Risk;

/// `HEADER_SCHEMA_EXTRA`, `SPS_RISKY_OPERATION`, and `RETRY_PRESSURE_HIGH`
/// are reserved: they remain on the enum for wire-protocol parity but no
/// v1.0 code path emits them (no documented detector for "extra" headers,
/// risky-operation scanning, or a standalone high-retry-pressure code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCode {
    HeaderSchemaMissing,
    HeaderSchemaExtra,
    SegScopeDrift,
    SpsRiskyOperation,
    FopEscalationMissed,
    FopFalseEscalation,
    RetryPressureHigh,
}

impl ViolationCode {
    pub fn wire(self) -> &'static str {
        match self {
            ViolationCode::HeaderSchemaMissing => "HEADER_SCHEMA_MISSING",
            ViolationCode::HeaderSchemaExtra => "HEADER_SCHEMA_EXTRA",
            ViolationCode::SegScopeDrift => "SEG_SCOPE_DRIFT",
            ViolationCode::SpsRiskyOperation => "SPS_RISKY_OPERATION",
            ViolationCode::FopEscalationMissed => "FOP_ESCALATION_MISSED",
            ViolationCode::FopFalseEscalation => "FOP_FALSE_ESCALATION",
            ViolationCode::RetryPressureHigh => "RETRY_PRESSURE_HIGH",
        }
    }
}

impl Serialize for ViolationCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire())
    }
}

impl<'de> Deserialize<'de> for ViolationCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "HEADER_SCHEMA_MISSING" => Ok(ViolationCode::HeaderSchemaMissing),
            "HEADER_SCHEMA_EXTRA" => Ok(ViolationCode::HeaderSchemaExtra),
            "SEG_SCOPE_DRIFT" => Ok(ViolationCode::SegScopeDrift),
            "SPS_RISKY_OPERATION" => Ok(ViolationCode::SpsRiskyOperation),
            "FOP_ESCALATION_MISSED" => Ok(ViolationCode::FopEscalationMissed),
            "FOP_FALSE_ESCALATION" => Ok(ViolationCode::FopFalseEscalation),
            "RETRY_PRESSURE_HIGH" => Ok(ViolationCode::RetryPressureHigh),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &[
                    "HEADER_SCHEMA_MISSING",
                    "HEADER_SCHEMA_EXTRA",
                    "SEG_SCOPE_DRIFT",
                    "SPS_RISKY_OPERATION",
                    "FOP_ESCALATION_MISSED",
                    "FOP_FALSE_ESCALATION",
                    "RETRY_PRESSURE_HIGH",
                ],
            )),
        }
    }
}

/// Declared ascending by severity so violations can be sorted
/// severity-descending with a single reversed comparison, mirroring
/// `ta-audit::drift::DriftSeverity`'s ascending `Normal < Warning < Alert`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Declared in the ascending order the ordering rule names directly
/// (`ALLOW < BLOCK < ESCALATE < RETRY`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Allow,
    Block,
    Escalate,
    Retry,
}

/// Ascending by priority, same rationale as `Severity`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub code: ViolationCode,
    pub severity: Severity,
    pub message: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub priority: Priority,
    pub reason: String,
    /// Reserved for future per-action context; no v1.0 code path populates
    /// it, kept for wire parity the same way `ViolationCode`'s reserved
    /// variants are.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderAnalysis {
    pub compliant: bool,
    /// `[0, 1]`.
    pub coverage: f64,
    pub missing: Vec<String>,
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftAnalysisBlock {
    pub score: i64,
    pub signals: Vec<String>,
    pub incidents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryPressureAnalysisBlock {
    pub score: i64,
    pub signals: Vec<String>,
    /// `[0, 1]`.
    pub normalized: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscalationAnalysisBlock {
    pub required: Option<bool>,
    pub detected: bool,
    pub triggers: Vec<String>,
    pub confidence: f64,
    pub ok: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub headers: HeaderAnalysis,
    pub drift: DriftAnalysisBlock,
    #[serde(rename = "retryPressure")]
    pub retry_pressure: RetryPressureAnalysisBlock,
    pub escalation: EscalationAnalysisBlock,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deltas {
    #[serde(rename = "driftReduction")]
    pub drift_reduction: i64,
    #[serde(rename = "retryReduction")]
    pub retry_reduction: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub score: i64,
    pub threshold: i64,
    pub compliant: bool,
    pub confidence: f64,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weights {
    pub headers: f64,
    pub drift: f64,
    pub retry: f64,
    pub escalation: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights { headers: 0.25, drift: 0.30, retry: 0.20, escalation: 0.25 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    #[serde(rename = "capsuleVersion")]
    pub capsule_version: String,
    #[serde(rename = "engineVersion")]
    pub engine_version: String,
    #[serde(rename = "evaluatedAt")]
    pub evaluated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<Risk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub task: TaskRef,
    pub analysis: Analysis,
    pub deltas: Option<Deltas>,
    pub verdict: Verdict,
    #[serde(rename = "recommendedActions")]
    pub recommended_actions: Vec<RecommendedAction>,
    pub metadata: ReportMetadata,
}
