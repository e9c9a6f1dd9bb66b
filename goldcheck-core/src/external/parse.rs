//! Parsers for ffmpeg's free-text analysis output.
//!
//! These depend on the wording ffmpeg uses for its `ssim` and `ebur128`
//! filters. When several values are printed, the last one wins: ffmpeg
//! prints running values first and the summary at the end.

use once_cell::sync::Lazy;
use regex::Regex;

use super::LoudnessResult;

static SSIM_ALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"All:\s*([0-9]+(?:\.[0-9]+)?)").expect("valid ssim regex"));

static INTEGRATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bI:\s+(-?(?:inf|[0-9]+(?:\.[0-9]+)?))\s+LUFS").expect("valid loudness regex")
});

static TRUE_PEAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bPeak:\s+(-?(?:inf|[0-9]+(?:\.[0-9]+)?))\s+dBFS").expect("valid peak regex")
});

/// Extracts the overall SSIM score (`All:`) from ssim filter output.
pub fn parse_ssim_output(output: &str) -> Option<f64> {
    SSIM_ALL
        .captures_iter(output)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .last()
}

/// Extracts integrated loudness and true peak from an ebur128 summary.
///
/// Only text after the last `Summary:` marker is considered when one is
/// present, so per-frame `I:` readings are never mistaken for the result.
/// A silent stream yields `-inf`, which is returned as-is.
pub fn parse_loudness_summary(output: &str) -> LoudnessResult {
    let summary = output
        .rfind("Summary:")
        .map_or(output, |pos| &output[pos..]);

    LoudnessResult {
        integrated_lufs: last_value(&INTEGRATED, summary),
        true_peak_dbtp: last_value(&TRUE_PEAK, summary),
    }
}

fn last_value(re: &Regex, text: &str) -> Option<f64> {
    re.captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .last()
}
