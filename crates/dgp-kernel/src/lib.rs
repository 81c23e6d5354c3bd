//! Declarative Governance Protocol (DGP) v1.0 compliance evaluation kernel.
//!
//! `ComplianceKernel::evaluate` is a pure, synchronous function of
//! `(capsule, task, output, baseline?)` that produces a [`report::Report`]:
//! component scores, violations, a confidence figure, and exactly one
//! recommended action. Every formula, string, and ordering rule in this
//! crate is frozen wire protocol, not an implementation detail — see
//! `report::ViolationCode`'s reserved, unproduced variants for the shape
//! of what a future minor version may additively unlock.

pub mod aggregator;
pub mod capsule;
pub mod delta;
pub mod drift;
pub mod error;
pub mod escalation;
pub mod headers;
pub mod kernel;
pub mod numeric;
pub mod report;
pub mod retry;
pub mod task;

pub use capsule::Capsule;
pub use error::KernelError;
pub use kernel::{ComplianceKernel, KernelOptions};
pub use report::Report;
pub use task::Task;
