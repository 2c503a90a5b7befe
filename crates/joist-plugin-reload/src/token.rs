//! Per-cycle exclusive-access token guarding the one-shot injection.

use std::sync::atomic::{AtomicU8, Ordering};

const IDLE: u8 = 0;
const CLAIMED: u8 = 1;
const COMMITTED: u8 = 2;

/// Three-state claim/commit cell: `Idle → Claimed → Committed`.
///
/// `revert` returns a failed claim to `Idle`; `reset` rearms for the next
/// cycle. The claim is a compare-and-swap, so two interleaved load
/// completions can never both win it, regardless of whether the runtime
/// underneath is single-threaded or genuinely parallel.
#[derive(Debug)]
pub(crate) struct InjectionToken(AtomicU8);

impl InjectionToken {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    /// Claim the cycle's injection slot. Returns `false` when the slot is
    /// already claimed or committed.
    pub(crate) fn try_claim(&self) -> bool {
        self.0
            .compare_exchange(IDLE, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark the claimed injection as done for the rest of the cycle.
    pub(crate) fn commit(&self) {
        let _ = self
            .0
            .compare_exchange(CLAIMED, COMMITTED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Return a failed claim to idle so a later load may retry.
    pub(crate) fn revert(&self) {
        let _ = self
            .0
            .compare_exchange(CLAIMED, IDLE, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Unconditionally rearm for the next cycle.
    pub(crate) fn reset(&self) {
        self.0.store(IDLE, Ordering::Release);
    }

    #[cfg(test)]
    pub(crate) fn is_idle(&self) -> bool {
        self.0.load(Ordering::Acquire) == IDLE
    }
}
