//! The audio downloader window.

use std::path::Path;

use iced::widget::{column, pick_list, row, text, toggler, Space};
use iced::{alignment, executor, Application, Command, Element, Length, Subscription, Theme};

use crate::base::{self, Shell};
use crate::config;
use crate::tools;
use crate::types::{AudioFormat, MediaKind, Message};
use crate::user_config::UserConfig;
use crate::validate;
use crate::ydl::DownloadRequest;

pub struct AudioApp {
    shell: Shell,
    cfg: UserConfig,
    format: AudioFormat,
    playlist: bool,
}

impl Application for AudioApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        let cfg = UserConfig::load();
        let output_dir = cfg
            .last_audio_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(config::default_music_dir);
        let format = cfg.audio_format();
        (
            AudioApp {
                shell: Shell::new(MediaKind::Audio, output_dir),
                cfg,
                format,
                playlist: false,
            },
            Command::perform(tools::probe_tools(), Message::ToolsProbed),
        )
    }

    fn title(&self) -> String {
        String::from("YouTube Audio Downloader")
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        self.shell.subscription()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::FormatPicked(format) => {
                self.format = format;
                self.cfg.set_audio_format(format);
                Command::none()
            }
            Message::TogglePlaylist(enabled) => {
                self.playlist = enabled;
                Command::none()
            }
            Message::StartDownload => self.start_download(),
            other => self.shell.handle(other, &mut self.cfg),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let format_row = row![
            text("Format:").size(14),
            pick_list(&AudioFormat::ALL[..], Some(self.format), Message::FormatPicked)
                .text_size(14),
        ]
        .spacing(5)
        .align_items(alignment::Alignment::Center);

        base::frame(
            column![
                base::url_row(&self.shell.url),
                base::dir_row(&self.shell.output_dir),
                format_row,
                toggler(
                    Some("Download Playlist".to_string()),
                    self.playlist,
                    Message::TogglePlaylist
                )
                .text_size(14),
                base::progress_section(self.shell.progress, &self.shell.status),
                base::action_row(MediaKind::Audio, self.shell.downloading()),
                Space::with_height(Length::Fill),
                base::footer(&self.shell.tool_status),
            ]
            .spacing(10)
            .into(),
        )
    }
}

impl AudioApp {
    fn start_download(&mut self) -> Command<Message> {
        if self.shell.downloading() {
            return Command::none();
        }
        let url = match validate::validate_url(&self.shell.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "download validation failed");
                return base::error_dialog("Validation Error", &e.to_string());
            }
        };
        if self.playlist {
            if let Err(e) = validate::validate_playlist_url(&url) {
                tracing::warn!(error = %e, "playlist validation failed");
                return base::error_dialog("Validation Error", &e.to_string());
            }
        }

        tracing::info!(
            domain = url.host_str().unwrap_or("unknown"),
            format = %self.format,
            playlist = self.playlist,
            "starting audio download"
        );
        self.shell.begin(DownloadRequest::audio(
            url.to_string(),
            self.shell.output_dir.clone(),
            self.format,
            self.playlist,
        ));
        Command::none()
    }
}
