use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Which window a shared handler is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind { Video, Audio }

impl MediaKind {
    pub fn noun(&self) -> &'static str {
        match self { MediaKind::Video => "Video", MediaKind::Audio => "Audio" }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "360p")] Q360,
    #[serde(rename = "480p")] Q480,
    #[serde(rename = "720p")] Q720,
    #[default]
    #[serde(rename = "1080p")] Q1080,
    #[serde(rename = "1440p (2K)")] Q1440,
    #[serde(rename = "2160p (4K)")] Q2160,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 6] = [
        VideoQuality::Q360, VideoQuality::Q480, VideoQuality::Q720,
        VideoQuality::Q1080, VideoQuality::Q1440, VideoQuality::Q2160,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Q360 => "360p",
            VideoQuality::Q480 => "480p",
            VideoQuality::Q720 => "720p",
            VideoQuality::Q1080 => "1080p",
            VideoQuality::Q1440 => "1440p (2K)",
            VideoQuality::Q2160 => "2160p (4K)",
        }
    }

    /// yt-dlp format selector: best video stream at or below the height,
    /// paired with best audio, falling back to a combined stream.
    pub fn format_selector(&self) -> &'static str {
        match self {
            VideoQuality::Q360 => "bv*[height<=360]+ba/b[height<=360]",
            VideoQuality::Q480 => "bv*[height<=480]+ba/b[height<=480]",
            VideoQuality::Q720 => "bv*[height<=720]+ba/b[height<=720]",
            VideoQuality::Q1080 => "bv*[height<=1080]+ba/b[height<=1080]",
            VideoQuality::Q1440 => "bv*[height<=1440]+ba/b[height<=1440]",
            VideoQuality::Q2160 => "bv*[height<=2160]+ba/b[height<=2160]",
        }
    }
}

impl std::fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioFormat {
    #[default]
    #[serde(rename = "MP3")] Mp3,
    #[serde(rename = "M4A")] M4a,
    #[serde(rename = "FLAC")] Flac,
    #[serde(rename = "WAV")] Wav,
    #[serde(rename = "OPUS")] Opus,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3, AudioFormat::M4a, AudioFormat::Flac, AudioFormat::Wav, AudioFormat::Opus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "MP3",
            AudioFormat::M4a => "M4A",
            AudioFormat::Flac => "FLAC",
            AudioFormat::Wav => "WAV",
            AudioFormat::Opus => "OPUS",
        }
    }

    pub fn codec(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
            AudioFormat::Opus => "opus",
        }
    }

    /// `--audio-quality` value: target bitrate for lossy codecs, best ("0")
    /// for lossless.
    pub fn quality_arg(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 | AudioFormat::M4a | AudioFormat::Opus => "320K",
            AudioFormat::Flac | AudioFormat::Wav => "0",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

/// Lifecycle of the single in-flight download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Downloading,
    PostProcessing,
    Done,
    Failed,
}

/// One parsed yt-dlp progress line, ready for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub percent: f32,
    pub speed: Option<String>,
    pub eta: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Ignore,
    UrlChanged(String),
    PasteUrl,
    ClipboardRead(Option<String>),
    BrowseDir,
    DirPicked(Option<PathBuf>),

    // Per-window options
    QualityPicked(VideoQuality),
    FormatPicked(AudioFormat),
    TogglePlaylist(bool),

    // Download control
    StartDownload,
    CancelDownload,

    // Worker feedback
    Progress(ProgressUpdate),
    PostProcessing,
    Retrying { attempt: u32, delay_secs: u64 },
    DownloadFinished,
    DownloadFailed(String),

    ToolsProbed(Result<String, String>),
}
