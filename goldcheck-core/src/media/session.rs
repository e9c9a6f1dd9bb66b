//! Media probe session for one candidate file.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::{CoreError, CoreResult, probe_failure};
use crate::external::{LoudnessResult, MediaAnalyzer, ProbeResult};
use crate::temp_files;

const SCRATCH_PREFIX: &str = "goldcheck-";

/// Probes a candidate and materializes its sampled frames.
///
/// Owns the scratch directory; dropping the session removes it along with
/// every extracted frame.
pub struct MediaProbe<'a, A: MediaAnalyzer + ?Sized> {
    analyzer: &'a A,
    candidate: PathBuf,
    scratch: TempDir,
}

impl<'a, A: MediaAnalyzer + ?Sized> MediaProbe<'a, A> {
    /// Opens a session for `candidate`, which must exist.
    pub fn new(analyzer: &'a A, candidate: &Path) -> CoreResult<Self> {
        if !candidate.is_file() {
            return Err(CoreError::InputNotFound(candidate.to_path_buf()));
        }
        Ok(Self {
            analyzer,
            candidate: candidate.to_path_buf(),
            scratch: temp_files::create_scratch_dir(None, SCRATCH_PREFIX)?,
        })
    }

    pub fn analyzer(&self) -> &'a A {
        self.analyzer
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Container and stream metadata of the candidate.
    pub fn probe_candidate(&self) -> CoreResult<ProbeResult> {
        let result = self.analyzer.probe(&self.candidate)?;
        log::debug!("Candidate probe: {result:?}");
        Ok(result)
    }

    /// Extracts exactly one frame at `timestamp` and returns its path.
    ///
    /// A tool run that reports success but leaves no file behind is treated
    /// the same as a failed run.
    pub fn extract_frame(&self, timestamp: f64) -> CoreResult<PathBuf> {
        let output = self.scratch_dir().join(format!("candidate_{timestamp}s.png"));
        self.analyzer
            .extract_frame(&self.candidate, timestamp, &output)?;
        if !output.is_file() {
            return Err(probe_failure(
                format!("frame extraction at {timestamp}s"),
                format!("expected output {} was not written", output.display()),
            ));
        }
        Ok(output)
    }

    /// Integrated loudness and true peak of the candidate's audio.
    pub fn loudness(&self) -> CoreResult<LoudnessResult> {
        self.analyzer.loudness(&self.candidate)
    }
}
