//! Golden baseline location and loading.
//!
//! Layout on disk:
//!
//! ```text
//! <golden_root>/<game>[/<platform>]/
//!     container.json
//!     audio_stats.json
//!     frames/frame_<t>s.png
//! ```
//!
//! Baselines are produced by an external promotion step and are read-only here.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::HarnessPaths;
use crate::error::{CoreError, CoreResult, json_error};
use crate::external::{AudioStreamMeta, VideoStreamMeta};
use crate::platform::Platform;

pub const CONTAINER_FILE: &str = "container.json";
pub const AUDIO_STATS_FILE: &str = "audio_stats.json";
pub const FRAMES_DIR: &str = "frames";

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Container metadata recorded for the approved render.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ContainerRecord {
    #[serde(default)]
    pub video: Option<VideoStreamMeta>,
    #[serde(default)]
    pub audio: Option<AudioStreamMeta>,
}

/// Loudness statistics recorded for the approved render.
///
/// A missing `integrated_lufs` means the baseline has no audio.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct AudioStats {
    #[serde(default)]
    pub integrated_lufs: Option<f64>,
    #[serde(default, alias = "true_peak")]
    pub true_peak_dbtp: Option<f64>,
}

impl AudioStats {
    pub fn expects_audio(&self) -> bool {
        self.integrated_lufs.is_some()
    }
}

/// A resolved baseline directory for one (game, platform) pair.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub game: String,
    pub platform: Platform,
    /// Whether the platform-specific subdirectory is in use.
    pub per_os: bool,
    pub dir: PathBuf,
}

impl Baseline {
    pub fn frames_dir(&self) -> PathBuf {
        self.dir.join(FRAMES_DIR)
    }

    /// Expected golden frame for a sample timestamp.
    pub fn frame_path(&self, timestamp: f64) -> PathBuf {
        self.frames_dir().join(frame_file_name(timestamp))
    }

    /// Loads `container.json`. Returns `Ok(None)` when the file is absent.
    pub fn load_container(&self) -> CoreResult<Option<ContainerRecord>> {
        let path = self.dir.join(CONTAINER_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&text)
            .map_err(|e| json_error(path.display().to_string(), e))?;
        Ok(Some(record))
    }

    /// Loads `audio_stats.json`. A missing file means no audio is expected.
    pub fn load_audio_stats(&self) -> CoreResult<AudioStats> {
        let path = self.dir.join(AUDIO_STATS_FILE);
        if !path.is_file() {
            log::debug!("No {} in {}", AUDIO_STATS_FILE, self.dir.display());
            return Ok(AudioStats::default());
        }
        let text = fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|e| json_error(path.display().to_string(), e))
    }
}

/// `5.0` -> `frame_5s.png`, `2.5` -> `frame_2.5s.png`.
pub fn frame_file_name(timestamp: f64) -> String {
    format!("{}.png", frame_case_name(timestamp))
}

/// Report case name for a sampled frame, e.g. `frame_10s`.
pub fn frame_case_name(timestamp: f64) -> String {
    format!("frame_{timestamp}s")
}

/// Finds the baseline directory for `game` and checks it holds a frame set.
///
/// `per_os` selects `<root>/<game>/<platform>` (true) or `<root>/<game>`
/// (false). When `None`, the platform subdirectory is used if it exists.
pub fn locate_baseline(
    paths: &HarnessPaths,
    game: &str,
    platform: Platform,
    per_os: Option<bool>,
) -> CoreResult<Baseline> {
    validate_game_id(game)?;

    let game_dir = paths.golden_root.join(game);
    let platform_dir = game_dir.join(platform.as_str());
    let per_os = per_os.unwrap_or_else(|| {
        let detected = platform_dir.is_dir();
        log::debug!(
            "Per-OS baselines auto-detected as {} ({})",
            detected,
            platform_dir.display()
        );
        detected
    });
    let dir = if per_os { platform_dir } else { game_dir };

    if !dir.is_dir() {
        return Err(CoreError::BaselineMissing {
            hint: regen_hint(paths, game, platform),
            path: dir,
        });
    }

    let frames_dir = dir.join(FRAMES_DIR);
    if count_images(&frames_dir)? == 0 {
        return Err(CoreError::GoldenFramesMissing {
            hint: regen_hint(paths, game, platform),
            path: frames_dir,
        });
    }

    log::info!("Using baseline {}", dir.display());
    Ok(Baseline {
        game: game.to_string(),
        platform,
        per_os,
        dir,
    })
}

fn regen_hint(paths: &HarnessPaths, game: &str, platform: Platform) -> String {
    let command = paths
        .regen_command
        .replace("{game}", game)
        .replace("{platform}", platform.as_str());
    format!("Generate or refresh the baseline with: {command}")
}

fn validate_game_id(game: &str) -> CoreResult<()> {
    let bad = game.trim().is_empty()
        || game == "."
        || game == ".."
        || game.contains(['/', '\\']);
    if bad {
        return Err(CoreError::InvalidConfig(format!(
            "game id '{game}' must be a single directory name"
        )));
    }
    Ok(())
}

fn count_images(dir: &Path) -> CoreResult<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if is_image {
            count += 1;
        }
    }
    Ok(count)
}
