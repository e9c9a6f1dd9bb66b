// ============================================================================
// goldcheck-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// Traits for spawning ffmpeg and draining its output, with a concrete
// implementation on top of ffmpeg-sidecar. Every run is driven to completion
// synchronously and its log lines are kept so that analysis output (ssim,
// ebur128) can be parsed and failures can carry what the tool printed.
//
// There is no timeout here: a hung ffmpeg hangs the run.

use crate::error::{CoreResult, command_failed_error, command_start_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {e}");
            crate::error::probe_failure("ffmpeg (event iterator)", e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| crate::error::probe_failure("ffmpeg (wait)", e.to_string()))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}

// --- Run-to-completion helper ---

/// Outcome of a finished ffmpeg invocation.
#[derive(Debug, Clone)]
pub struct FfmpegRun {
    pub status: ExitStatus,
    /// Every log and error line ffmpeg printed, in order.
    pub log: Vec<String>,
}

impl FfmpegRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// The captured output as one string.
    pub fn output(&self) -> String {
        self.log.join("\n")
    }

    /// Converts a non-zero exit into a `ProbeFailure` carrying the output.
    pub fn into_checked(self, context: &str) -> CoreResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(command_failed_error(context, self.status, self.output()))
        }
    }
}

/// Spawns `cmd`, drains all of its events, and waits for it to exit.
pub fn run_to_completion<S: FfmpegSpawner>(
    spawner: &S,
    mut cmd: FfmpegCommand,
    context: &str,
) -> CoreResult<FfmpegRun> {
    log_ffmpeg_command(&mut cmd, context);

    let mut process = spawner.spawn(cmd)?;
    let mut log = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(_, line) => log.push(line),
            FfmpegEvent::Error(line) => log.push(line),
            _ => {}
        }
        Ok(())
    })?;
    let status = process.wait()?;

    if status.success() {
        log::debug!("{context}: ffmpeg finished ({} log lines)", log.len());
    } else {
        log::warn!("{context}: ffmpeg exited with {status}");
    }
    Ok(FfmpegRun { status, log })
}

/// Arguments of an ffmpeg command as owned strings.
pub fn command_args(cmd: &mut FfmpegCommand) -> Vec<String> {
    cmd.as_inner()
        .get_args()
        .map(|s| s.to_string_lossy().into_owned())
        .collect()
}

fn log_ffmpeg_command(cmd: &mut FfmpegCommand, context: &str) {
    log::debug!("Running {context}: ffmpeg {}", command_args(cmd).join(" "));
}

#[cfg(all(test, unix))]
pub(crate) mod mocks {
    //! Scripted spawner used by unit tests.

    use super::*;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::rc::Rc;

    /// Mock implementation of FfmpegProcess.
    pub struct MockFfmpegProcess {
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    }

    impl FfmpegProcess for MockFfmpegProcess {
        fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
        where
            F: FnMut(FfmpegEvent) -> CoreResult<()>,
        {
            for event in self.events.drain(..) {
                handler(event)?;
            }
            Ok(())
        }

        fn wait(&mut self) -> CoreResult<ExitStatus> {
            Ok(ExitStatus::from_raw(self.exit_code << 8))
        }
    }

    /// One scripted response: log lines plus an exit code.
    pub struct Scripted {
        pub lines: Vec<String>,
        pub exit_code: i32,
        /// Create the last argument as an empty file, as ffmpeg would.
        pub touch_output: bool,
    }

    /// Mock spawner answering calls in order and recording their arguments.
    #[derive(Clone, Default)]
    pub struct MockFfmpegSpawner {
        responses: Rc<RefCell<Vec<Scripted>>>,
        calls: Rc<RefCell<Vec<Vec<String>>>>,
    }

    impl MockFfmpegSpawner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, lines: &[&str], exit_code: i32, touch_output: bool) {
            self.responses.borrow_mut().push(Scripted {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                exit_code,
                touch_output,
            });
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }
    }

    impl FfmpegSpawner for MockFfmpegSpawner {
        type Process = MockFfmpegProcess;

        fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
            let args = command_args(&mut cmd);
            self.calls.borrow_mut().push(args.clone());
            let scripted = {
                let mut responses = self.responses.borrow_mut();
                assert!(!responses.is_empty(), "unexpected ffmpeg call: {args:?}");
                responses.remove(0)
            };
            if scripted.touch_output {
                if let Some(out) = args.last() {
                    std::fs::write(out, b"").unwrap();
                }
            }
            Ok(MockFfmpegProcess {
                events: scripted
                    .lines
                    .into_iter()
                    .map(|line| FfmpegEvent::Log(ffmpeg_sidecar::event::LogLevel::Info, line))
                    .collect(),
                exit_code: scripted.exit_code,
            })
        }
    }
}
