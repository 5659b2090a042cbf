#![windows_subsystem = "windows"] // Hides the console window

use iced::{Application, Settings, Size};

use youtube_downloader::audio::AudioApp;
use youtube_downloader::logging;

pub fn main() -> iced::Result {
    if logging::init_logging("yt-audio").is_err() {
        logging::init_logging_stderr();
    }

    AudioApp::run(Settings {
        window: iced::window::Settings {
            size: Size::new(600.0, 280.0),
            resizable: false,
            ..Default::default()
        },
        ..Default::default()
    })
}
