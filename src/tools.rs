//! Probes for the external engines (yt-dlp, ffmpeg) and the output disk.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use sysinfo::{DiskExt, System, SystemExt};
use tokio::process::Command as TokioCommand;

use crate::config;

static FFMPEG_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ffmpeg version (\S+)").unwrap()
});

/// Startup probe for the footer status line: versions of both engines, or an
/// install hint when one is missing.
pub async fn probe_tools() -> Result<String, String> {
    let ytdlp = ytdlp_version().await;
    let ffmpeg = ffmpeg_version().await;
    match (ytdlp, ffmpeg) {
        (Some(y), Some(f)) => Ok(format!("yt-dlp {} | ffmpeg {}", y, f)),
        (None, _) => Err(
            "yt-dlp not found. Please install yt-dlp and ensure it is on your PATH.".to_string(),
        ),
        (_, None) => Err(
            "FFmpeg not found. Please install FFmpeg and ensure it is on your PATH.".to_string(),
        ),
    }
}

pub async fn ytdlp_version() -> Option<String> {
    let mut cmd = TokioCommand::new(config::ytdlp_path());
    cmd.arg("--version");
    #[cfg(windows)] cmd.creation_flags(0x08000000);
    let out = cmd.output().await.ok()?;
    if !out.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
    if version.is_empty() { None } else { Some(version) }
}

pub async fn ffmpeg_version() -> Option<String> {
    let mut cmd = TokioCommand::new(config::ffmpeg_path());
    cmd.arg("-version");
    #[cfg(windows)] cmd.creation_flags(0x08000000);
    let out = cmd.output().await.ok()?;
    if !out.status.success() {
        return None;
    }
    let banner = String::from_utf8_lossy(&out.stdout);
    parse_ffmpeg_banner(&banner)
}

pub async fn ffmpeg_available() -> bool {
    ffmpeg_version().await.is_some()
}

fn parse_ffmpeg_banner(banner: &str) -> Option<String> {
    FFMPEG_VERSION_RE
        .captures(banner)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Free bytes on the disk holding `path`, or `None` when the mount cannot be
/// resolved.
pub fn free_space(path: &Path) -> Option<u64> {
    let mut sys = System::new();
    sys.refresh_disks_list();
    sys.disks()
        .iter()
        .filter(|d| path.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())
        .map(|d| d.available_space())
}

/// Disk-space pre-flight. An unresolvable mount allows the download rather
/// than blocking it.
pub fn has_free_space(path: &Path, required: u64) -> bool {
    match free_space(path) {
        Some(free) => {
            tracing::info!(free_mb = free / (1024 * 1024), "disk space check");
            free >= required
        }
        None => {
            tracing::warn!(dir = %path.display(), "could not determine free space, allowing download");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ffmpeg_banner() {
        let banner = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers\nbuilt with gcc";
        assert_eq!(parse_ffmpeg_banner(banner), Some("6.1.1-3ubuntu5".to_string()));
    }

    #[test]
    fn rejects_unversioned_banner() {
        assert_eq!(parse_ffmpeg_banner("command not found"), None);
    }

    #[test]
    fn unknown_mount_allows_download() {
        // A relative path that cannot match any mount point.
        assert!(has_free_space(Path::new("does-not-exist"), u64::MAX));
    }
}
