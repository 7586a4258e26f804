//! Progress notification port
//!
//! Defines the interface for reporting progress while capabilities run.

use clarity_domain::CapabilityName;

/// Callback for flow progress
///
/// Implementations live in the presentation layer. Several flows may be in
/// progress at once (summary and risk detection run together).
pub trait FlowProgressNotifier: Send + Sync {
    /// Called right before the model is invoked
    fn on_flow_start(&self, capability: CapabilityName);

    /// Called when the flow finishes, successfully or not
    fn on_flow_complete(&self, capability: CapabilityName, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoFlowProgress;

impl FlowProgressNotifier for NoFlowProgress {
    fn on_flow_start(&self, _capability: CapabilityName) {}
    fn on_flow_complete(&self, _capability: CapabilityName, _success: bool) {}
}
