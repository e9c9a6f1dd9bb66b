//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command and
//! returns the exit status the run should end with.

/// Golden media comparison (`goldcheck compare`).
pub mod compare;

/// Subtitle contract validation (`goldcheck subtitles`).
pub mod subtitles;
