//! yt-dlp invocation: command-line assembly, progress translation, and the
//! download subscription driving a single child process.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use iced::Subscription;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command as TokioCommand};

use crate::config;
use crate::retry::{self, RetryDecision, RetryPolicy};
use crate::tools;
use crate::types::{AudioFormat, Message, ProgressUpdate, VideoQuality};

pub const CONCURRENT_FRAGMENTS: u32 = 3;
pub const MAX_CONCURRENT_FRAGMENTS: u32 = 10;
pub const MAX_PLAYLIST_SIZE: u32 = 500;
pub const SOCKET_TIMEOUT_SECS: u32 = 30;
pub const MAX_FILESIZE: &str = "10G";
/// Title-only template, truncated so hostile titles cannot overflow the
/// filesystem name limit.
pub const OUTPUT_TEMPLATE: &str = "%(title).200s.%(ext)s";

static PROGRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<pct>\d+(?:\.\d+)?)%\s+of\s+~?\s*(?P<size>[0-9a-zA-Z\.]+)(?:\s+at\s+(?P<speed>[0-9a-zA-Z\./]+))?(?:\s+ETA\s+(?P<eta>[0-9:]+))?",
    )
    .unwrap()
});

#[derive(Debug, Clone)]
pub enum DownloadMode {
    Video { quality: VideoQuality },
    Audio { format: AudioFormat, playlist: bool },
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output_dir: PathBuf,
    pub mode: DownloadMode,
}

impl DownloadRequest {
    pub fn video(url: String, output_dir: PathBuf, quality: VideoQuality) -> Self {
        Self { url, output_dir, mode: DownloadMode::Video { quality } }
    }

    pub fn audio(url: String, output_dir: PathBuf, format: AudioFormat, playlist: bool) -> Self {
        Self { url, output_dir, mode: DownloadMode::Audio { format, playlist } }
    }
}

/// Assemble the yt-dlp argument list for a request. Pure so the exact
/// command line stays testable.
pub fn build_args(req: &DownloadRequest) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--newline".into(),
        "--no-overwrites".into(),
        "--socket-timeout".into(),
        SOCKET_TIMEOUT_SECS.to_string(),
        "--max-filesize".into(),
        MAX_FILESIZE.into(),
    ];

    match &req.mode {
        DownloadMode::Video { quality } => {
            args.push("--no-playlist".into());
            args.push("-f".into());
            args.push(quality.format_selector().into());
            args.push("--merge-output-format".into());
            args.push("mp4".into());
            args.push("--concurrent-fragments".into());
            args.push(CONCURRENT_FRAGMENTS.clamp(1, MAX_CONCURRENT_FRAGMENTS).to_string());
            // Streams were already selected to fit; remux without re-encoding.
            args.push("--postprocessor-args".into());
            args.push("-c:v copy -c:a copy".into());
        }
        DownloadMode::Audio { format, playlist } => {
            if *playlist {
                args.push("--yes-playlist".into());
                args.push("--playlist-end".into());
                args.push(MAX_PLAYLIST_SIZE.to_string());
            } else {
                args.push("--no-playlist".into());
            }
            args.push("-x".into());
            args.push("--audio-format".into());
            args.push(format.codec().into());
            args.push("--audio-quality".into());
            args.push(format.quality_arg().into());
        }
    }

    args.push("-P".into());
    args.push(req.output_dir.to_string_lossy().into_owned());
    args.push("-o".into());
    args.push(OUTPUT_TEMPLATE.into());
    args.push("--ffmpeg-location".into());
    args.push(config::ffmpeg_path().to_string_lossy().into_owned());
    args.push(req.url.clone());
    args
}

/// Translate one stdout line from yt-dlp into a UI message.
pub fn translate_line(line: &str) -> Option<Message> {
    if line.starts_with("[ExtractAudio]") || line.starts_with("[Merger]") {
        return Some(Message::PostProcessing);
    }
    let caps = PROGRESS_RE.captures(line)?;
    let percent: f32 = caps.name("pct")?.as_str().parse().ok()?;
    Some(Message::Progress(ProgressUpdate {
        percent,
        speed: caps.name("speed").map(|m| m.as_str().to_string()),
        eta: caps.name("eta").map(|m| m.as_str().to_string()),
    }))
}

enum State {
    Starting { attempt: u32 },
    Running { reader: BufReader<ChildStdout>, child: Child, attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    Finished,
}

/// Drive one download as a subscription. `run_id` must change between runs so
/// the state machine restarts.
pub fn download_stream(run_id: u64, req: DownloadRequest) -> Subscription<Message> {
    iced::subscription::unfold(run_id, State::Starting { attempt: 1 }, move |state| {
        let req = req.clone();
        async move {
            match state {
                State::Starting { attempt } => start_attempt(&req, attempt).await,
                State::Running { mut reader, mut child, attempt } => {
                    let mut line_buf = Vec::new();
                    match reader.read_until(b'\n', &mut line_buf).await {
                        Ok(0) => finish_attempt(child, attempt).await,
                        Ok(_) => {
                            let line = String::from_utf8_lossy(&line_buf);
                            let msg = translate_line(line.trim_end()).unwrap_or(Message::Ignore);
                            (msg, State::Running { reader, child, attempt })
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed reading yt-dlp output");
                            (
                                Message::DownloadFailed(format!("IO Error: {}", e)),
                                State::Finished,
                            )
                        }
                    }
                }
                State::Backoff { attempt, delay } => {
                    tokio::time::sleep(delay).await;
                    (Message::Ignore, State::Starting { attempt: attempt + 1 })
                }
                State::Finished => {
                    std::future::pending::<()>().await;
                    (Message::Ignore, State::Finished)
                }
            }
        }
    })
}

async fn start_attempt(req: &DownloadRequest, attempt: u32) -> (Message, State) {
    if !tools::ffmpeg_available().await {
        tracing::error!("ffmpeg validation failed");
        return (
            Message::DownloadFailed(
                "FFmpeg not found or not executable. Please install FFmpeg and ensure it's in your system PATH.".to_string(),
            ),
            State::Finished,
        );
    }

    let output_dir = config::sanitize_output_dir(&req.output_dir);
    if !tools::has_free_space(&output_dir, config::MIN_FREE_SPACE_BYTES) {
        return (
            Message::DownloadFailed(
                "Insufficient disk space. Please free up at least 500MB and try again.".to_string(),
            ),
            State::Finished,
        );
    }

    let sanitized = DownloadRequest { output_dir, ..req.clone() };
    let policy = RetryPolicy::default();
    tracing::info!(attempt, max = policy.max_attempts, "download attempt");

    let mut cmd = TokioCommand::new(config::ytdlp_path());
    cmd.args(build_args(&sanitized));
    cmd.kill_on_drop(true);
    #[cfg(windows)] cmd.creation_flags(0x08000000);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    match cmd.spawn() {
        Ok(mut child) => match child.stdout.take() {
            Some(stdout) => (
                Message::Progress(ProgressUpdate { percent: 0.0, speed: None, eta: None }),
                State::Running { reader: BufReader::new(stdout), child, attempt },
            ),
            None => (
                Message::DownloadFailed("Failed to capture yt-dlp output.".to_string()),
                State::Finished,
            ),
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to spawn yt-dlp");
            (
                Message::DownloadFailed(
                    "Failed to start yt-dlp. Please ensure yt-dlp is installed and on your PATH.".to_string(),
                ),
                State::Finished,
            )
        }
    }
}

async fn finish_attempt(mut child: Child, attempt: u32) -> (Message, State) {
    if let Ok(status) = child.wait().await {
        if status.success() {
            tracing::info!("download completed successfully");
            return (Message::DownloadFinished, State::Finished);
        }
    }

    let mut stderr_text = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut stderr_text).await;
    }
    tracing::error!(stderr = %stderr_text.trim(), "yt-dlp exited with error");

    let kind = retry::classify(&stderr_text);
    match RetryPolicy::default().decide(attempt, kind) {
        RetryDecision::RetryAfter(delay) => {
            tracing::info!(attempt = attempt + 1, delay_secs = delay.as_secs(), "retrying download");
            (
                Message::Retrying { attempt: attempt + 1, delay_secs: delay.as_secs() },
                State::Backoff { attempt, delay },
            )
        }
        RetryDecision::NoRetry => (
            Message::DownloadFailed(kind.friendly_message().to_string()),
            State::Finished,
        ),
    }
}
