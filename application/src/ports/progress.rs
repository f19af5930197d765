//! Progress notification port
//!
//! Defines the interface for reporting progress while models are queried.

use parallelai_domain::Model;

/// Stage of a chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Every provider at once
    FanOut,
    /// One chosen provider
    Single,
    /// Synthesis over the fan-out answers
    Consensus,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::FanOut => "fan-out",
            Phase::Single => "single",
            Phase::Consensus => "consensus",
        }
    }
}

/// Callback for progress updates during a chat request
///
/// Implementations live in the presentation layer. Calls may arrive from
/// concurrently running invocations, in completion order.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when one model call settles within a phase
    fn on_task_complete(&self, phase: &Phase, model: &Model, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _model: &Model, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
