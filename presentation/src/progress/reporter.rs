//! Progress reporting while capabilities run

use clarity_application::ports::progress::FlowProgressNotifier;
use clarity_domain::CapabilityName;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One spinner per running capability
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<CapabilityName, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bars(&self) -> MutexGuard<'_, HashMap<CapabilityName, ProgressBar>> {
        self.bars.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowProgressNotifier for ProgressReporter {
    fn on_flow_start(&self, capability: CapabilityName) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_message(format!("{}...", capability.label()));
        pb.enable_steady_tick(Duration::from_millis(100));

        // a capability that runs again replaces its spinner
        if let Some(previous) = self.bars().insert(capability, pb) {
            previous.finish_and_clear();
        }
    }

    fn on_flow_complete(&self, capability: CapabilityName, success: bool) {
        if let Some(pb) = self.bars().remove(&capability) {
            let status = if success {
                format!("{} {}", "v".green(), capability)
            } else {
                format!("{} {} (failed)", "x".red(), capability)
            };
            pb.finish_with_message(status);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl FlowProgressNotifier for SimpleProgress {
    fn on_flow_start(&self, capability: CapabilityName) {
        eprintln!("{} {}...", "->".cyan(), capability.label().bold());
    }

    fn on_flow_complete(&self, capability: CapabilityName, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), capability);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), capability);
        }
    }
}
