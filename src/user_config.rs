//! Persistent user preferences, one small JSON file under
//! `~/.youtube_downloader/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::types::{AudioFormat, VideoQuality};

pub const CONFIG_FILENAME: &str = "yt_downloader_config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub last_video_dir: Option<PathBuf>,
    pub last_audio_dir: Option<PathBuf>,
    pub video_quality: VideoQuality,
    pub audio_format: AudioFormat,
}

/// Preferences plus the file they round-trip through.
#[derive(Debug, Clone)]
pub struct UserConfig {
    path: PathBuf,
    prefs: Preferences,
}

impl UserConfig {
    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(config::app_config_dir().join(CONFIG_FILENAME))
    }

    pub fn load_from(path: PathBuf) -> Self {
        let prefs = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!(error = %e, file = %path.display(), "config unreadable, using defaults");
                    Preferences::default()
                }
            },
            Err(_) => Preferences::default(),
        };
        Self { path, prefs }
    }

    fn save(&self) {
        if let Err(e) = self.try_save() {
            tracing::warn!(error = %e, file = %self.path.display(), "failed to save config");
        }
    }

    fn try_save(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }

    pub fn last_video_dir(&self) -> Option<&Path> {
        self.prefs.last_video_dir.as_deref()
    }

    pub fn set_last_video_dir(&mut self, dir: PathBuf) {
        self.prefs.last_video_dir = Some(dir);
        self.save();
    }

    pub fn last_audio_dir(&self) -> Option<&Path> {
        self.prefs.last_audio_dir.as_deref()
    }

    pub fn set_last_audio_dir(&mut self, dir: PathBuf) {
        self.prefs.last_audio_dir = Some(dir);
        self.save();
    }

    pub fn video_quality(&self) -> VideoQuality {
        self.prefs.video_quality
    }

    pub fn set_video_quality(&mut self, quality: VideoQuality) {
        self.prefs.video_quality = quality;
        self.save();
    }

    pub fn audio_format(&self) -> AudioFormat {
        self.prefs.audio_format
    }

    pub fn set_audio_format(&mut self, format: AudioFormat) {
        self.prefs.audio_format = format;
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let mut cfg = UserConfig::load_from(path.clone());
        cfg.set_video_quality(VideoQuality::Q720);
        cfg.set_audio_format(AudioFormat::Flac);
        cfg.set_last_video_dir(PathBuf::from("/tmp/videos"));

        let reloaded = UserConfig::load_from(path);
        assert_eq!(reloaded.video_quality(), VideoQuality::Q720);
        assert_eq!(reloaded.audio_format(), AudioFormat::Flac);
        assert_eq!(reloaded.last_video_dir(), Some(Path::new("/tmp/videos")));
        assert_eq!(reloaded.last_audio_dir(), None);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "{ not json").unwrap();

        let cfg = UserConfig::load_from(path);
        assert_eq!(cfg.video_quality(), VideoQuality::Q1080);
        assert_eq!(cfg.audio_format(), AudioFormat::Mp3);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"{"video_quality": "480p"}"#).unwrap();

        let cfg = UserConfig::load_from(path);
        assert_eq!(cfg.video_quality(), VideoQuality::Q480);
        assert_eq!(cfg.audio_format(), AudioFormat::Mp3);
    }

    #[test]
    fn quality_persists_as_display_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let mut cfg = UserConfig::load_from(path.clone());
        cfg.set_video_quality(VideoQuality::Q2160);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("2160p (4K)"));
    }
}
