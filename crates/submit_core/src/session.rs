use std::sync::atomic::{AtomicBool, Ordering};

/// Per-form submission state, created at bind time.
///
/// `in_flight` is the only concurrency guard: at most one submission of a
/// form may hold it at a time.
#[derive(Debug, Default)]
pub struct FormSession {
    in_flight: AtomicBool,
    outcome_succeeded: AtomicBool,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the guard. Returns false if another submission holds it.
    pub(crate) fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub(crate) fn record_outcome(&self, succeeded: bool) {
        self.outcome_succeeded.store(succeeded, Ordering::Release);
    }

    pub fn outcome_succeeded(&self) -> bool {
        self.outcome_succeeded.load(Ordering::Acquire)
    }
}
