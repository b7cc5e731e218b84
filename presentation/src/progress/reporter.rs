//! Progress reporting for ensemble execution

use colored::Colorize;
use ensemble_application::ports::progress::ProgressNotifier;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during an ensemble run with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_run_start(&self, total_agents: usize) {
        let pb = ProgressBar::new(total_agents as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Agents");
        pb.set_message("Starting...");

        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_agent_complete(&self, agent_id: usize, success: bool) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} agent {}", "v".green(), agent_id)
            } else {
                format!("{} agent {}", "x".red(), agent_id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_early_stop(&self, responses_collected: usize, dominant_fraction: f64) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_message(format!(
                "{} {:.0}% agreement after {} responses",
                "early stop:".yellow(),
                dominant_fraction * 100.0,
                responses_collected
            ));
        }
    }

    fn on_run_complete(&self, succeeded: usize, failed: usize) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            let summary = if failed == 0 {
                format!("{} {} responses", "done:".green(), succeeded)
            } else {
                format!(
                    "{} {} responses, {} failed",
                    "done:".green(),
                    succeeded,
                    failed
                )
            };
            pb.finish_with_message(summary);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_run_start(&self, total_agents: usize) {
        println!("{} dispatching {} agents", "->".cyan(), total_agents);
    }

    fn on_agent_complete(&self, agent_id: usize, success: bool) {
        if success {
            println!("  {} agent {}", "v".green(), agent_id);
        } else {
            println!("  {} agent {} (failed)", "x".red(), agent_id);
        }
    }

    fn on_early_stop(&self, responses_collected: usize, dominant_fraction: f64) {
        println!(
            "  {} {:.0}% agreement after {} responses, cancelling the rest",
            "early stop:".yellow(),
            dominant_fraction * 100.0,
            responses_collected
        );
    }

    fn on_run_complete(&self, succeeded: usize, failed: usize) {
        println!(
            "{} {} responses collected ({} failed)",
            "<-".cyan(),
            succeeded,
            failed
        );
    }
}
