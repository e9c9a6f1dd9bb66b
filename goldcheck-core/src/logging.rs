//! Logging helpers shared by the pipeline.
//!
//! The library only emits through the `log` facade; the binary decides where
//! records go.

use log::{debug, info};
use std::process::Command;

/// Create a section heading in the logs to separate the phases of a run
pub fn log_section(title: &str) {
    info!("{}", "=".repeat(50));
    info!("{title}");
    info!("{}", "=".repeat(50));
}

/// Create a subsection heading within a phase
pub fn log_subsection(title: &str) {
    info!("{}", "-".repeat(40));
    info!("{title}");
    info!("{}", "-".repeat(40));
}

/// Log an external command before it runs
pub fn log_command(cmd: &Command) {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    debug!("Executing: {} {}", program, args.join(" "));
}
