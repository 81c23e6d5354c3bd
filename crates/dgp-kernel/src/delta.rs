// delta.rs — DeltaComputer (§4.6).
//
// When a baseline is supplied, reruns the drift and retry analyzers over
// it using the same active lexicon as the governed output, then reports
// percentage reductions. Mirrors `ta-audit::drift`'s baseline-vs-current
// comparison shape, just without persisted state — everything here is
// recomputed per call.

use crate::numeric::reduction;
use crate::report::Deltas;
use crate::{drift, retry};

pub fn compute(lexicon: &[String], baseline: &str, governed_drift_count: usize, governed_retry_normalized: f64) -> Deltas {
    let baseline_drift = drift::analyze(lexicon, baseline);
    let baseline_retry = retry::analyze(baseline);

    Deltas {
        drift_reduction: reduction(baseline_drift.count as f64, governed_drift_count as f64),
        retry_reduction: reduction(baseline_retry.normalized, governed_retry_normalized),
    }
}
