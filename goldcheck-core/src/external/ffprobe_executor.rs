//! FFprobe integration for container metadata.
//!
//! Runs `ffprobe -print_format json -show_streams -show_format` as a single
//! synchronous call and maps the first video and audio streams into
//! [`ProbeResult`].

use serde::Deserialize;
use std::path::Path;
use std::process::Command;

use super::{AudioStreamMeta, ProbeResult, VideoStreamMeta};
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error, json_error};
use crate::logging;

/// Trait for abstracting ffprobe execution.
pub trait FfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<ProbeResult>;
}

/// ffprobe invoked through `std::process::Command`.
#[derive(Debug, Clone)]
pub struct CommandFfprobeExecutor {
    binary: String,
}

impl Default for CommandFfprobeExecutor {
    fn default() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }
}

impl FfprobeExecutor for CommandFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<ProbeResult> {
        if !input_path.exists() {
            return Err(CoreError::InputNotFound(input_path.to_path_buf()));
        }

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "error", "-print_format", "json", "-show_streams", "-show_format"])
            .arg(input_path);
        logging::log_command(&cmd);

        let output = cmd.output().map_err(|e| command_start_error(&self.binary, e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            log::error!("ffprobe failed for {}: {}", input_path.display(), stderr.trim());
            return Err(command_failed_error(
                format!("ffprobe ({})", input_path.display()),
                output.status,
                stderr,
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ffprobe_json(&stdout)
            .map_err(|e| json_error(format!("ffprobe output for {}", input_path.display()), e))
    }
}

// ---- ffprobe JSON shape ----

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    codec_name: Option<String>,
    #[serde(default)]
    pix_fmt: Option<String>,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    avg_frame_rate: Option<String>,
    #[serde(default)]
    sample_aspect_ratio: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    sample_rate: Option<String>,
    #[serde(default)]
    channels: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// Parses ffprobe's JSON document into a [`ProbeResult`].
pub fn parse_ffprobe_json(text: &str) -> Result<ProbeResult, serde_json::Error> {
    let parsed: FfprobeOutput = serde_json::from_str(text)?;

    let mut result = ProbeResult {
        duration_secs: parsed
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite()),
        ..ProbeResult::default()
    };

    for stream in parsed.streams {
        match stream.codec_type.as_deref() {
            Some("video") if result.video.is_none() => {
                result.video = Some(VideoStreamMeta {
                    pix_fmt: stream.pix_fmt,
                    r_frame_rate: stream.r_frame_rate,
                    avg_frame_rate: stream.avg_frame_rate,
                    sample_aspect_ratio: stream.sample_aspect_ratio,
                    width: stream.width,
                    height: stream.height,
                    codec_name: stream.codec_name,
                });
            }
            Some("audio") if result.audio.is_none() => {
                result.audio = Some(AudioStreamMeta {
                    codec_name: stream.codec_name,
                    sample_rate: stream.sample_rate,
                    channels: stream.channels,
                });
            }
            _ => {}
        }
    }
    Ok(result)
}
