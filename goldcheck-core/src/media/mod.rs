//! Candidate media access for a comparison run.
//!
//! [`MediaProbe`] wraps a [`MediaAnalyzer`](crate::external::MediaAnalyzer)
//! together with the run's scratch directory: container metadata comes from a
//! single probe call, and sampled frames are extracted into the scratch space.

pub mod session;

pub use session::MediaProbe;
