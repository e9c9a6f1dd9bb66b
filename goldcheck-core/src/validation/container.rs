//! Container metadata checks.
//!
//! Compares pixel format, frame rate and sample aspect ratio of the candidate's
//! first video stream against the baseline's `container.json`. Each field is an
//! independent result.

use std::path::Path;

use super::result::ComparisonResult;
use crate::baseline::ContainerRecord;
use crate::config::{FPS_SNAP_RATIO, TolerancePolicy};
use crate::external::{ProbeResult, VideoStreamMeta};

pub const CASE_VIDEO_STREAM: &str = "container_video_stream";
pub const CASE_PIX_FMT: &str = "container_pix_fmt";
pub const CASE_FPS: &str = "container_fps";
pub const CASE_SAR: &str = "container_sar";
pub const CASE_BASELINE: &str = "container_baseline";

const DEFAULT_SAR: &str = "1:1";

/// Runs every container check for one candidate.
///
/// A candidate without a video stream yields a single failing result and no
/// further checks.
pub fn check_container(
    candidate: &ProbeResult,
    expected: &ContainerRecord,
    policy: &TolerancePolicy,
) -> Vec<ComparisonResult> {
    let Some(got) = candidate.video.as_ref() else {
        return vec![ComparisonResult::failed(
            CASE_VIDEO_STREAM,
            "no video stream in candidate",
        )];
    };
    let Some(want) = expected.video.as_ref() else {
        return vec![ComparisonResult::failed(
            CASE_BASELINE,
            "baseline container record has no video entry",
        )];
    };

    vec![
        ComparisonResult::passed(CASE_VIDEO_STREAM),
        check_pix_fmt(want, got),
        check_fps(want, got, policy.fps_epsilon),
        check_sar(want, got),
    ]
}

/// Failing result for a baseline without `container.json`.
pub fn missing_container_record(path: &Path) -> ComparisonResult {
    ComparisonResult::failed(
        CASE_BASELINE,
        format!("container record missing: {}", path.display()),
    )
}

fn check_pix_fmt(want: &VideoStreamMeta, got: &VideoStreamMeta) -> ComparisonResult {
    let expected = want.pix_fmt.as_deref().unwrap_or("<none>");
    let actual = got.pix_fmt.as_deref().unwrap_or("<none>");
    if want.pix_fmt.is_some() && expected == actual {
        ComparisonResult::passed(CASE_PIX_FMT)
    } else {
        ComparisonResult::failed(
            CASE_PIX_FMT,
            format!("pix_fmt mismatch: expected={expected} got={actual}"),
        )
    }
}

fn check_fps(want: &VideoStreamMeta, got: &VideoStreamMeta, epsilon: f64) -> ComparisonResult {
    let expected_raw = want.frame_rate().unwrap_or("<none>");
    let actual_raw = got.frame_rate().unwrap_or("<none>");

    let (Some(expected), Some(actual)) = (
        want.frame_rate().and_then(parse_frame_rate),
        got.frame_rate().and_then(parse_frame_rate),
    ) else {
        return ComparisonResult::failed(
            CASE_FPS,
            format!("fps unparseable: expected={expected_raw} got={actual_raw}"),
        );
    };

    let expected = normalize_fps(expected);
    let actual = normalize_fps(actual);
    let result = if (expected - actual).abs() <= epsilon {
        ComparisonResult::passed(CASE_FPS)
    } else {
        ComparisonResult::failed(
            CASE_FPS,
            format!(
                "fps mismatch: expected={expected_raw} ({expected:.3}) got={actual_raw} ({actual:.3})"
            ),
        )
    };
    result.with_measurement(actual)
}

fn check_sar(want: &VideoStreamMeta, got: &VideoStreamMeta) -> ComparisonResult {
    let expected = normalize_sar(want.sample_aspect_ratio.as_deref());
    let actual = normalize_sar(got.sample_aspect_ratio.as_deref());
    if expected == actual {
        ComparisonResult::passed(CASE_SAR)
    } else {
        ComparisonResult::failed(
            CASE_SAR,
            format!("sar mismatch: expected={expected} got={actual}"),
        )
    }
}

/// Parses `30000/1001`, `30/1` or `29.97` into frames per second.
pub fn parse_frame_rate(spec: &str) -> Option<f64> {
    let spec = spec.trim();
    let value = match spec.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => spec.parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Snaps a rate to the nearest whole number when it is within 1% of it, so
/// NTSC-style rates (30000/1001) compare equal to their nominal value.
pub fn normalize_fps(fps: f64) -> f64 {
    let whole = fps.round();
    if whole > 0.0 && ((fps - whole).abs() / whole) <= FPS_SNAP_RATIO {
        whole
    } else {
        fps
    }
}

/// Unset, `0:1` and `N/A` all mean square pixels.
pub fn normalize_sar(sar: Option<&str>) -> String {
    match sar.map(str::trim) {
        None | Some("") | Some("0:1") | Some("N/A") => DEFAULT_SAR.to_string(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(pix_fmt: &str, fps: &str, sar: Option<&str>) -> VideoStreamMeta {
        VideoStreamMeta {
            pix_fmt: Some(pix_fmt.to_string()),
            r_frame_rate: Some(fps.to_string()),
            sample_aspect_ratio: sar.map(str::to_string),
            ..VideoStreamMeta::default()
        }
    }

    fn record(meta: VideoStreamMeta) -> ContainerRecord {
        ContainerRecord {
            video: Some(meta),
            audio: None,
        }
    }

    fn probe(meta: Option<VideoStreamMeta>) -> ProbeResult {
        ProbeResult {
            video: meta,
            ..ProbeResult::default()
        }
    }

    fn find<'a>(results: &'a [ComparisonResult], name: &str) -> &'a ComparisonResult {
        results.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_matching_container_passes() {
        let results = check_container(
            &probe(Some(video("yuv420p", "30000/1001", None))),
            &record(video("yuv420p", "30/1", Some("1:1"))),
            &TolerancePolicy::default(),
        );
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| !r.is_failure()), "{results:?}");
    }

    #[test]
    fn test_pix_fmt_mismatch_message() {
        let results = check_container(
            &probe(Some(video("yuv422p", "30/1", None))),
            &record(video("yuv420p", "30/1", None)),
            &TolerancePolicy::default(),
        );
        let pix = find(&results, CASE_PIX_FMT);
        assert!(pix.is_failure());
        let msg = pix.message.as_deref().unwrap();
        assert!(msg.contains("expected=yuv420p"));
        assert!(msg.contains("got=yuv422p"));
        assert!(!find(&results, CASE_FPS).is_failure());
    }

    #[test]
    fn test_missing_video_short_circuits() {
        let results = check_container(
            &probe(None),
            &record(video("yuv420p", "30/1", None)),
            &TolerancePolicy::default(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, CASE_VIDEO_STREAM);
        assert!(results[0].is_failure());
    }

    #[test]
    fn test_fps_mismatch() {
        let results = check_container(
            &probe(Some(video("yuv420p", "25/1", None))),
            &record(video("yuv420p", "30/1", None)),
            &TolerancePolicy::default(),
        );
        let fps = find(&results, CASE_FPS);
        assert!(fps.is_failure());
        assert_eq!(fps.measurement, Some(25.0));
    }

    #[test]
    fn test_frame_rate_parsing() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("29.97"), Some(29.97));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
        assert_eq!(normalize_fps(30000.0 / 1001.0), 30.0);
        assert_eq!(normalize_fps(24000.0 / 1001.0), 24.0);
        assert_eq!(normalize_fps(12.5), 12.5);
    }

    #[test]
    fn test_sar_defaults() {
        assert_eq!(normalize_sar(None), "1:1");
        assert_eq!(normalize_sar(Some("0:1")), "1:1");
        assert_eq!(normalize_sar(Some("N/A")), "1:1");
        assert_eq!(normalize_sar(Some("4:3")), "4:3");
    }
}
