//! Termination policy — decides when the framework is done.

use tracing::info;

use crate::state::{FrameworkPhase, FrameworkState};

/// Fires once, on the update that makes the finished count reach the quota.
///
/// A task that never finishes keeps the quota unmet, so the policy never
/// fires for a run with failed, killed or lost tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminationPolicy;

impl TerminationPolicy {
    /// Whether a stop request is due. Always false once stopped.
    pub fn should_stop(&self, state: &FrameworkState) -> bool {
        state.phase() != FrameworkPhase::Stopped
            && state.finished_count() == state.total_quota()
    }

    /// Check the policy and move the framework to `Stopped` when it fires.
    ///
    /// Callers commit this only after the driver accepted the stop request.
    pub fn evaluate(&self, state: &mut FrameworkState) -> bool {
        if !self.should_stop(state) {
            return false;
        }
        state.set_phase(FrameworkPhase::Stopped);
        info!(
            finished = state.finished_count(),
            total = state.total_quota(),
            "all tasks finished, stopping framework"
        );
        true
    }
}
