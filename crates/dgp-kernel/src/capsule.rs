// capsule.rs — Capsule value type.
//
// A capsule is a declarative policy value: three governance blocks (RFE,
// SEG, FOP) plus a version string echoed back into report metadata. It is
// borrowed for the duration of one `evaluate` call and never mutated.

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Capsule {
    pub version: String,
    pub governance: Governance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Governance {
    #[serde(rename = "RFE")]
    pub rfe: Rfe,
    #[serde(rename = "SEG")]
    pub seg: Seg,
    #[serde(rename = "FOP")]
    pub fop: Fop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Rfe {
    #[serde(rename = "requiredHeaders", default)]
    pub required_headers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Seg {
    #[serde(rename = "driftKeywords", default)]
    pub drift_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Fop {
    #[serde(rename = "escalationTriggers", default)]
    pub escalation_triggers: Vec<String>,
    #[serde(rename = "requiredForHighRisk", default)]
    pub required_for_high_risk: bool,
}

impl Capsule {
    /// Parse and structurally validate a capsule from a raw JSON value —
    /// the boundary a host process uses when capsules arrive off the wire
    /// rather than already typed. Absent or malformed `governance` is
    /// reported as `ValidationError`; a `null`/missing capsule as
    /// `TypeError`.
    pub fn from_json(raw: serde_json::Value) -> Result<Capsule, KernelError> {
        if raw.is_null() {
            return Err(KernelError::MissingCapsule);
        }
        let object = raw.as_object().ok_or_else(|| KernelError::InvalidGovernanceBlock {
            reason: "capsule must be a JSON object".to_string(),
        })?;
        if !object.contains_key("governance") {
            return Err(KernelError::InvalidGovernanceBlock {
                reason: "missing governance block".to_string(),
            });
        }
        serde_json::from_value(raw).map_err(|e| KernelError::InvalidGovernanceBlock {
            reason: e.to_string(),
        })
    }
}
