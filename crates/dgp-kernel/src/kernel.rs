// kernel.rs — ComplianceKernel, the single evaluate() chokepoint.
//
// Construct once per capsule (validating thresholds/weights up front, the
// way `ta-policy::engine::PolicyEngine` validates manifests at load time),
// then call `evaluate` as many times as needed — it never mutates the
// kernel and never retains its inputs.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::aggregator::{self, AggregationInput};
use crate::capsule::Capsule;
use crate::error::KernelError;
use crate::report::{
    Analysis, DriftAnalysisBlock, EscalationAnalysisBlock, HeaderAnalysis, Report, ReportMetadata,
    RetryPressureAnalysisBlock, TaskRef, Verdict, Weights,
};
use crate::task::Task;
use crate::{delta, escalation, headers};

const SCHEMA_VERSION: &str = "1.0";
const DEFAULT_ENGINE_VERSION: &str = "1.0.0";
const DEFAULT_THRESHOLD: i64 = 80;
const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

type NowFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Construction options. `enforce` is accepted for parity with the wire
/// contract but has no observable effect in v1.0.
#[derive(Default)]
pub struct KernelOptions {
    pub threshold: Option<i64>,
    pub weights: Option<Weights>,
    pub enforce: Option<bool>,
    pub now: Option<NowFn>,
    pub engine_version: Option<String>,
}

pub struct ComplianceKernel {
    capsule: Capsule,
    weights: Weights,
    custom_weights: bool,
    threshold: i64,
    #[allow(dead_code)]
    enforce: bool,
    now: NowFn,
    engine_version: String,
}

impl ComplianceKernel {
    pub fn new(capsule: Capsule, options: KernelOptions) -> Result<Self, KernelError> {
        let threshold = options.threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !(0..=100).contains(&threshold) {
            return Err(KernelError::ThresholdOutOfRange { threshold });
        }

        let custom_weights = options.weights.is_some();
        let weights = options.weights.unwrap_or_default();
        if custom_weights {
            let sum = weights.headers + weights.drift + weights.retry + weights.escalation;
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(KernelError::WeightsDoNotSumToOne { sum });
            }
        }

        let now = options.now.unwrap_or_else(|| Arc::new(Utc::now));
        let engine_version = options.engine_version.unwrap_or_else(|| DEFAULT_ENGINE_VERSION.to_string());
        let enforce = options.enforce.unwrap_or(false);

        tracing::debug!(capsule_version = %capsule.version, threshold, custom_weights, "compliance kernel constructed");

        Ok(ComplianceKernel { capsule, weights, custom_weights, threshold, enforce, now, engine_version })
    }

    pub fn evaluate(&self, task: &Task, output: &str, baseline: Option<&str>) -> Result<Report, KernelError> {
        if output.is_empty() {
            return Err(KernelError::EmptyOutput);
        }
        if task.id.trim().is_empty() {
            return Err(KernelError::MissingTaskId);
        }

        let active_lexicon = task
            .drift_lexicon
            .clone()
            .unwrap_or_else(|| self.capsule.governance.seg.drift_keywords.clone());

        let header_check = headers::check(&self.capsule.governance.rfe.required_headers, output, false, false);
        let drift_analysis = crate::drift::analyze(&active_lexicon, output);
        let retry_analysis = crate::retry::analyze(output);
        let escalation_analysis = escalation::analyze(&self.capsule.governance.fop, task, output);

        let deltas = baseline.map(|b| {
            delta::compute(&active_lexicon, b, drift_analysis.count, retry_analysis.normalized)
        });

        let aggregation = aggregator::aggregate(AggregationInput {
            headers: &header_check,
            drift: &drift_analysis,
            retry: &retry_analysis,
            escalation: &escalation_analysis,
            weights: &self.weights,
            threshold: self.threshold,
            custom_weights: self.custom_weights,
            baseline_supplied: deltas.is_some(),
        });

        let report = Report {
            schema_version: SCHEMA_VERSION.to_string(),
            task: TaskRef { id: task.id.clone(), risk: task.risk },
            analysis: Analysis {
                headers: HeaderAnalysis {
                    compliant: header_check.compliant,
                    coverage: header_check.coverage as f64 / 100.0,
                    missing: header_check.missing,
                    extra: Vec::new(),
                },
                drift: DriftAnalysisBlock {
                    score: crate::drift::score(drift_analysis.count),
                    signals: drift_analysis.signals,
                    incidents: drift_analysis.count as i64,
                },
                retry_pressure: RetryPressureAnalysisBlock {
                    score: retry_analysis.score,
                    signals: retry_analysis.signals,
                    normalized: retry_analysis.normalized,
                },
                escalation: EscalationAnalysisBlock {
                    required: escalation_analysis.required,
                    detected: escalation_analysis.detected,
                    triggers: escalation_analysis.triggers,
                    confidence: escalation_analysis.confidence,
                    ok: escalation_analysis.ok,
                },
            },
            deltas,
            verdict: Verdict {
                score: aggregation.score,
                threshold: self.threshold,
                compliant: aggregation.compliant,
                confidence: aggregation.confidence,
                violations: aggregation.violations,
            },
            recommended_actions: aggregation.recommended_actions,
            metadata: ReportMetadata {
                capsule_version: self.capsule.version.clone(),
                engine_version: self.engine_version.clone(),
                evaluated_at: (self.now)(),
                weights: self.custom_weights.then(|| self.weights.clone()),
            },
        };

        tracing::debug!(
            task_id = %task.id,
            score = report.verdict.score,
            compliant = report.verdict.compliant,
            "compliance evaluation complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::{Fop, Governance, Rfe, Seg};
    use crate::task::Task;
    use chrono::TimeZone;

    fn fixed_now() -> NowFn {
        Arc::new(|| Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    }

    fn capsule() -> Capsule {
        Capsule {
            version: "1.0.0".to_string(),
            governance: Governance {
                rfe: Rfe { required_headers: vec!["Plan".to_string(), "Gates".to_string()] },
                seg: Seg { drift_keywords: vec!["production database".to_string()] },
                fop: Fop { escalation_triggers: vec![], required_for_high_risk: true },
            },
        }
    }

    fn task(id: &str) -> Task {
        Task { id: id.to_string(), risk: None, requires_escalation: None, drift_lexicon: None }
    }

    #[test]
    fn empty_output_is_a_type_error() {
        let kernel = ComplianceKernel::new(capsule(), KernelOptions::default()).unwrap();
        let err = kernel.evaluate(&task("t-1"), "", None).unwrap_err();
        assert_eq!(err, KernelError::EmptyOutput);
    }

    #[test]
    fn missing_task_id_is_a_type_error() {
        let kernel = ComplianceKernel::new(capsule(), KernelOptions::default()).unwrap();
        let err = kernel.evaluate(&task(""), "Plan\nGates\nall good", None).unwrap_err();
        assert_eq!(err, KernelError::MissingTaskId);
    }

    #[test]
    fn out_of_range_threshold_is_a_configuration_error() {
        let options = KernelOptions { threshold: Some(150), ..Default::default() };
        let err = ComplianceKernel::new(capsule(), options).unwrap_err();
        assert_eq!(err, KernelError::ThresholdOutOfRange { threshold: 150 });
    }

    #[test]
    fn mismatched_weights_are_a_configuration_error() {
        let options = KernelOptions {
            weights: Some(Weights { headers: 0.5, drift: 0.5, retry: 0.5, escalation: 0.5 }),
            ..Default::default()
        };
        let err = ComplianceKernel::new(capsule(), options).unwrap_err();
        assert!(matches!(err, KernelError::WeightsDoNotSumToOne { .. }));
    }

    #[test]
    fn evaluate_is_deterministic_for_identical_inputs() {
        let options = KernelOptions { now: Some(fixed_now()), ..Default::default() };
        let kernel = ComplianceKernel::new(capsule(), options).unwrap();
        let output = "Plan\nGates\nAll clear, nothing else happened.";
        let first = kernel.evaluate(&task("t-1"), output, None).unwrap();
        let second = kernel.evaluate(&task("t-1"), output, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn metadata_omits_weights_unless_custom() {
        let options = KernelOptions { now: Some(fixed_now()), ..Default::default() };
        let kernel = ComplianceKernel::new(capsule(), options).unwrap();
        let report = kernel.evaluate(&task("t-1"), "Plan\nGates\nclear", None).unwrap();
        assert!(report.metadata.weights.is_none());
    }
}
