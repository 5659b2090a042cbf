//! GUI shell around the external `yt-dlp` and `ffmpeg` binaries: one window
//! for video downloads, one for audio extraction, sharing everything but
//! their option rows.

pub mod audio;
pub mod base;
pub mod config;
pub mod logging;
pub mod retry;
pub mod style;
pub mod tools;
pub mod types;
pub mod user_config;
pub mod validate;
pub mod video;
pub mod ydl;
