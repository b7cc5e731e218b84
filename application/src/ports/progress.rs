//! Progress notification port
//!
//! Defines the interface for reporting progress during an ensemble run.

/// Callback for progress updates during ensemble execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, progress bars, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any invocation is dispatched
    fn on_run_start(&self, total_agents: usize);

    /// Called as each invocation completes or fails
    fn on_agent_complete(&self, agent_id: usize, success: bool);

    /// Called when the early-stop policy cancels outstanding invocations
    fn on_early_stop(&self, responses_collected: usize, dominant_fraction: f64);

    /// Called after the fan-out has fully terminated
    fn on_run_complete(&self, succeeded: usize, failed: usize);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_run_start(&self, _total_agents: usize) {}
    fn on_agent_complete(&self, _agent_id: usize, _success: bool) {}
    fn on_early_stop(&self, _responses_collected: usize, _dominant_fraction: f64) {}
    fn on_run_complete(&self, _succeeded: usize, _failed: usize) {}
}
