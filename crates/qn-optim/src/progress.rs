//! Per-iteration progress reporting.
//!
//! Observers are pure: they see each accepted iteration's record and are
//! never consulted for control decisions.

use qn_core::IterationRecord;

/// Observer of per-iteration progress.
pub trait ProgressObserver {
    /// Called once after each accepted step.
    fn on_iteration(&mut self, record: &IterationRecord);
}

/// Observer that renders records through the `log` facade.
///
/// Columns: `iter fk fk/f0 ||gk|| alpha nls ngrad`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_iteration(&mut self, r: &IterationRecord) {
        log::debug!(
            "{:3}   {:9.2e}  {:9.2e}   {:9.2e}  {:9.2e}  {:3}  {:4}",
            r.iter,
            r.fval,
            r.rel_decrease,
            r.grad_norm,
            r.alpha,
            r.ls_evals,
            r.grad_evals
        );
    }
}

/// Observer that collects records in memory (useful in tests and when the
/// caller wants the full trace).
#[derive(Debug, Default)]
pub struct CollectingObserver {
    /// Records in iteration order.
    pub records: Vec<IterationRecord>,
}

impl ProgressObserver for CollectingObserver {
    fn on_iteration(&mut self, record: &IterationRecord) {
        self.records.push(record.clone());
    }
}
