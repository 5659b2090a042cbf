#![windows_subsystem = "windows"] // Hides the console window

use iced::{Application, Settings, Size};

use youtube_downloader::logging;
use youtube_downloader::video::VideoApp;

pub fn main() -> iced::Result {
    if logging::init_logging("yt-video").is_err() {
        logging::init_logging_stderr();
    }

    VideoApp::run(Settings {
        window: iced::window::Settings {
            size: Size::new(600.0, 250.0),
            resizable: false,
            ..Default::default()
        },
        ..Default::default()
    })
}
