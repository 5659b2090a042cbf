//! Platform defaults: output directories, tool locations, path hygiene.

use std::env;
use std::path::{Path, PathBuf};

/// Minimum free space required in the output directory before a download.
pub const MIN_FREE_SPACE_BYTES: u64 = 500 * 1024 * 1024;

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Directory holding the preference file and logs.
pub fn app_config_dir() -> PathBuf {
    home_dir().join(".youtube_downloader")
}

/// Default output directory for the video window (`~/Videos`, `~/Movies` on
/// macOS).
pub fn default_video_dir() -> PathBuf {
    dirs::video_dir().unwrap_or_else(|| home_dir().join("Videos"))
}

/// Default output directory for the audio window.
pub fn default_music_dir() -> PathBuf {
    dirs::audio_dir().unwrap_or_else(|| home_dir().join("Music"))
}

fn fallback_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| home_dir().join("Downloads"))
}

/// ffmpeg location handed to yt-dlp. On Windows a bundled build next to the
/// executable wins; elsewhere ffmpeg is expected on PATH.
pub fn ffmpeg_path() -> PathBuf {
    #[cfg(windows)]
    {
        let bundled = Path::new("ffmpeg/ffmpeg-master-latest-win64-gpl/bin/ffmpeg.exe");
        if bundled.exists() {
            return bundled.to_path_buf();
        }
        return PathBuf::from("ffmpeg.exe");
    }
    #[cfg(not(windows))]
    PathBuf::from("ffmpeg")
}

/// yt-dlp command to run: a copy dropped next to the working directory wins
/// over whatever is on PATH.
pub fn ytdlp_path() -> PathBuf {
    let exe = if cfg!(windows) { "yt-dlp.exe" } else { "yt-dlp" };
    let local = env::current_dir().unwrap_or_default().join(exe);
    if local.exists() {
        local
    } else {
        PathBuf::from("yt-dlp")
    }
}

/// Constrain the output directory to the user's home, the working directory,
/// or the system temp dir. Anything else falls back to the downloads folder.
pub fn sanitize_output_dir(dir: &Path) -> PathBuf {
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let mut roots = vec![home_dir()];
    if let Ok(cwd) = env::current_dir() {
        roots.push(cwd);
    }
    roots.push(env::temp_dir());

    for root in roots {
        let root = root.canonicalize().unwrap_or(root);
        if resolved.starts_with(&root) {
            tracing::debug!(dir = %resolved.display(), "output directory accepted");
            return resolved;
        }
    }

    let fallback = fallback_download_dir();
    tracing::warn!(
        dir = %resolved.display(),
        fallback = %fallback.display(),
        "output directory outside allowed paths, using fallback"
    );
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dirs_are_absolute() {
        assert!(default_video_dir().is_absolute());
        assert!(default_music_dir().is_absolute());
    }

    #[test]
    fn home_subdir_is_accepted() {
        let dir = home_dir().join("Videos");
        assert_eq!(sanitize_output_dir(&dir), dir);
    }

    #[test]
    fn temp_dir_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let sanitized = sanitize_output_dir(tmp.path());
        // Canonicalization may rewrite symlinked temp roots, but the result
        // must stay inside the temp tree rather than the fallback.
        assert!(sanitized.starts_with(env::temp_dir().canonicalize().unwrap_or(env::temp_dir())));
    }

    #[test]
    fn system_dir_falls_back_to_downloads() {
        let sanitized = sanitize_output_dir(Path::new("/etc"));
        assert_eq!(sanitized, fallback_download_dir());
    }

    #[test]
    fn ytdlp_path_is_runnable_name() {
        assert!(!ytdlp_path().as_os_str().is_empty());
    }
}
