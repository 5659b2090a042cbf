//! The video downloader window.

use std::path::Path;

use iced::widget::{column, pick_list, row, text, Space};
use iced::{alignment, executor, Application, Command, Element, Length, Subscription, Theme};

use crate::base::{self, Shell};
use crate::config;
use crate::tools;
use crate::types::{MediaKind, Message, VideoQuality};
use crate::user_config::UserConfig;
use crate::validate;
use crate::ydl::DownloadRequest;

pub struct VideoApp {
    shell: Shell,
    cfg: UserConfig,
    quality: VideoQuality,
}

impl Application for VideoApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        let cfg = UserConfig::load();
        let output_dir = cfg
            .last_video_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(config::default_video_dir);
        let quality = cfg.video_quality();
        (
            VideoApp { shell: Shell::new(MediaKind::Video, output_dir), cfg, quality },
            Command::perform(tools::probe_tools(), Message::ToolsProbed),
        )
    }

    fn title(&self) -> String {
        String::from("YouTube Video Downloader")
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        self.shell.subscription()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::QualityPicked(quality) => {
                self.quality = quality;
                self.cfg.set_video_quality(quality);
                Command::none()
            }
            Message::StartDownload => self.start_download(),
            other => self.shell.handle(other, &mut self.cfg),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let quality_row = row![
            text("Quality:").size(14),
            pick_list(&VideoQuality::ALL[..], Some(self.quality), Message::QualityPicked)
                .text_size(14),
        ]
        .spacing(5)
        .align_items(alignment::Alignment::Center);

        base::frame(
            column![
                base::url_row(&self.shell.url),
                base::dir_row(&self.shell.output_dir),
                quality_row,
                base::progress_section(self.shell.progress, &self.shell.status),
                base::action_row(MediaKind::Video, self.shell.downloading()),
                Space::with_height(Length::Fill),
                base::footer(&self.shell.tool_status),
            ]
            .spacing(10)
            .into(),
        )
    }
}

impl VideoApp {
    fn start_download(&mut self) -> Command<Message> {
        if self.shell.downloading() {
            return Command::none();
        }
        match validate::validate_url(&self.shell.url) {
            Ok(url) => {
                tracing::info!(
                    domain = url.host_str().unwrap_or("unknown"),
                    quality = %self.quality,
                    "starting video download"
                );
                self.shell.begin(DownloadRequest::video(
                    url.to_string(),
                    self.shell.output_dir.clone(),
                    self.quality,
                ));
                Command::none()
            }
            Err(e) => {
                tracing::warn!(error = %e, "download validation failed");
                base::error_dialog("Validation Error", &e.to_string())
            }
        }
    }
}
