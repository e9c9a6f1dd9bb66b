//! Loudness comparison against the baseline's `audio_stats.json`.

use super::result::ComparisonResult;
use crate::baseline::AudioStats;
use crate::config::TolerancePolicy;
use crate::error::CoreResult;
use crate::external::{LoudnessResult, MediaAnalyzer, ProbeResult};
use crate::media::MediaProbe;

pub const CASE_LUFS: &str = "audio_lufs";
pub const CASE_PEAK: &str = "audio_peak";
pub const CASE_LOUDNESS: &str = "audio_loudness";

/// Measures the candidate's loudness and compares it to the baseline.
///
/// Skipped unless the candidate has an audio stream and the baseline records
/// an integrated loudness.
pub fn check_audio<A: MediaAnalyzer + ?Sized>(
    probe: &MediaProbe<'_, A>,
    candidate: &ProbeResult,
    expected: &AudioStats,
    policy: &TolerancePolicy,
) -> CoreResult<Vec<ComparisonResult>> {
    let skip_reason = if candidate.audio.is_none() {
        Some("candidate has no audio stream")
    } else if !expected.expects_audio() {
        Some("baseline records no integrated loudness")
    } else {
        None
    };
    if let Some(reason) = skip_reason {
        log::info!("Audio checks SKIPPED: {reason}");
        return Ok(vec![
            ComparisonResult::skipped(CASE_LUFS, reason),
            ComparisonResult::skipped(CASE_PEAK, reason),
        ]);
    }

    let measured = probe.loudness()?;
    Ok(compare_loudness(&measured, expected, policy))
}

/// Pure comparison of measured loudness against the baseline values.
pub fn compare_loudness(
    measured: &LoudnessResult,
    expected: &AudioStats,
    policy: &TolerancePolicy,
) -> Vec<ComparisonResult> {
    let mut results = Vec::with_capacity(2);

    match (measured.integrated_lufs, expected.integrated_lufs) {
        (Some(got), Some(want)) if got.is_finite() && want.is_finite() => {
            let tolerance = policy.lufs_tolerance;
            let result = if (got - want).abs() <= tolerance {
                ComparisonResult::passed(CASE_LUFS)
            } else {
                ComparisonResult::failed(
                    CASE_LUFS,
                    format!(
                        "integrated loudness {got:.1} LUFS vs baseline {want:.1} LUFS exceeds tolerance ±{tolerance:.1} LU"
                    ),
                )
            };
            results.push(result.with_measurement(got));
        }
        (got, _) => results.push(ComparisonResult::failed(
            CASE_LOUDNESS,
            match got {
                Some(value) if !value.is_finite() => {
                    format!("integrated loudness is not a finite value ({value})")
                }
                Some(_) => "baseline integrated loudness is not a finite value".to_string(),
                None => "integrated loudness not found in analysis output".to_string(),
            },
        )),
    }

    match (measured.true_peak_dbtp, expected.true_peak_dbtp) {
        (Some(got), Some(want)) if got.is_finite() && want.is_finite() => {
            let tolerance = policy.true_peak_tolerance;
            let result = if (got - want).abs() <= tolerance {
                ComparisonResult::passed(CASE_PEAK)
            } else {
                ComparisonResult::failed(
                    CASE_PEAK,
                    format!(
                        "true peak {got:.1} dBTP vs baseline {want:.1} dBTP exceeds tolerance ±{tolerance:.1} dB"
                    ),
                )
            };
            results.push(result.with_measurement(got));
        }
        _ => {
            log::info!("True-peak check SKIPPED: value not finite on both sides");
            results.push(ComparisonResult::skipped(
                CASE_PEAK,
                "true peak not available on both sides",
            ));
        }
    }

    for result in &results {
        result.log();
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(lufs: f64, peak: f64) -> AudioStats {
        AudioStats {
            integrated_lufs: Some(lufs),
            true_peak_dbtp: Some(peak),
        }
    }

    fn measured(lufs: Option<f64>, peak: Option<f64>) -> LoudnessResult {
        LoudnessResult {
            integrated_lufs: lufs,
            true_peak_dbtp: peak,
        }
    }

    #[test]
    fn test_within_tolerance() {
        let results = compare_loudness(
            &measured(Some(-13.4), Some(-1.5)),
            &stats(-13.0, -1.0),
            &TolerancePolicy::default(),
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.is_failure()));
        assert_eq!(results[0].measurement, Some(-13.4));
    }

    #[test]
    fn test_loudness_out_of_tolerance_message() {
        let results = compare_loudness(
            &measured(Some(-10.0), Some(-1.0)),
            &stats(-13.0, -1.0),
            &TolerancePolicy::default(),
        );
        let lufs = &results[0];
        assert_eq!(lufs.name, CASE_LUFS);
        assert!(lufs.is_failure());
        let msg = lufs.message.as_deref().unwrap();
        assert!(msg.contains("-10.0"), "{msg}");
        assert!(msg.contains("-13.0"), "{msg}");
        assert!(msg.contains("1.0 LU"), "{msg}");
    }

    #[test]
    fn test_unparsed_loudness_fails() {
        let results = compare_loudness(
            &measured(None, None),
            &stats(-13.0, -1.0),
            &TolerancePolicy::default(),
        );
        assert_eq!(results[0].name, CASE_LOUDNESS);
        assert!(results[0].is_failure());
        assert!(!results[1].is_failure());
    }

    #[test]
    fn test_non_finite_peak_is_not_compared() {
        let results = compare_loudness(
            &measured(Some(-13.0), Some(f64::NEG_INFINITY)),
            &stats(-13.0, -1.0),
            &TolerancePolicy::default(),
        );
        assert_eq!(results[1].name, CASE_PEAK);
        assert_eq!(results[1].status, crate::validation::CheckStatus::Skipped);
    }

    #[test]
    fn test_silent_candidate_fails_loudness() {
        let results = compare_loudness(
            &measured(Some(f64::NEG_INFINITY), None),
            &stats(-13.0, -1.0),
            &TolerancePolicy::default(),
        );
        assert_eq!(results[0].name, CASE_LOUDNESS);
        assert!(results[0].message.as_deref().unwrap().contains("-inf"));
    }
}
