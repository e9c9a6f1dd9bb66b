// goldcheck-cli/src/lib.rs
//
// Library portion of the goldcheck CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, CompareArgs, SubtitlesArgs};
pub use commands::compare::run_compare;
pub use commands::subtitles::run_subtitles;
