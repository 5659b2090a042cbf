//! Shared scaffolding for the two downloader windows: common state, the
//! common message handler, and the widget rows both windows are built from.

use std::path::{Path, PathBuf};

use iced::widget::{button, column, container, progress_bar, row, text, text_input};
use iced::{alignment, theme, Command, Element, Length, Subscription};

use crate::style;
use crate::types::{DownloadPhase, MediaKind, Message, ProgressUpdate};
use crate::user_config::UserConfig;
use crate::ydl::{self, DownloadRequest};

/// State every window carries: URL entry, output directory, the single
/// in-flight download, and the footer tool status.
pub struct Shell {
    pub kind: MediaKind,
    pub url: String,
    pub output_dir: PathBuf,
    pub phase: DownloadPhase,
    pub progress: f32,
    pub status: String,
    pub tool_status: String,
    run: Option<DownloadRequest>,
    run_id: u64,
}

impl Shell {
    pub fn new(kind: MediaKind, output_dir: PathBuf) -> Self {
        Self {
            kind,
            url: String::new(),
            output_dir,
            phase: DownloadPhase::Idle,
            progress: 0.0,
            status: String::new(),
            tool_status: "Checking tools...".to_string(),
            run: None,
            run_id: 0,
        }
    }

    pub fn downloading(&self) -> bool {
        matches!(self.phase, DownloadPhase::Downloading | DownloadPhase::PostProcessing)
    }

    /// Kick off a download. Bumping the run id gives the subscription a
    /// fresh identity so its state machine restarts.
    pub fn begin(&mut self, req: DownloadRequest) {
        self.run_id = self.run_id.wrapping_add(1);
        self.run = Some(req);
        self.phase = DownloadPhase::Downloading;
        self.progress = 0.0;
        self.status = "Starting download...".to_string();
    }

    pub fn subscription(&self) -> Subscription<Message> {
        match (&self.run, self.downloading()) {
            (Some(req), true) => ydl::download_stream(self.run_id, req.clone()),
            _ => Subscription::none(),
        }
    }

    /// Handle the messages both windows share. Window-specific messages fall
    /// through as a no-op; each window matches on those before delegating.
    pub fn handle(&mut self, message: Message, cfg: &mut UserConfig) -> Command<Message> {
        match message {
            Message::UrlChanged(s) => {
                self.url = s;
                Command::none()
            }
            Message::PasteUrl => iced::clipboard::read(Message::ClipboardRead),
            Message::ClipboardRead(Some(contents)) => {
                self.url = contents;
                Command::none()
            }
            Message::ClipboardRead(None) => {
                warn_dialog("Paste Error", "No text found in clipboard")
            }
            Message::BrowseDir => {
                let start = self.output_dir.clone();
                Command::perform(
                    async move {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select Output Directory")
                            .set_directory(&start)
                            .pick_folder()
                            .await
                            .map(|f| f.path().to_path_buf())
                    },
                    Message::DirPicked,
                )
            }
            Message::DirPicked(Some(dir)) => {
                self.output_dir = dir.clone();
                match self.kind {
                    MediaKind::Video => cfg.set_last_video_dir(dir),
                    MediaKind::Audio => cfg.set_last_audio_dir(dir),
                }
                Command::none()
            }
            Message::DirPicked(None) => Command::none(),
            Message::CancelDownload => {
                if !self.downloading() {
                    return Command::none();
                }
                tracing::info!("download canceled by user");
                self.run = None;
                self.phase = DownloadPhase::Idle;
                self.status = "Download canceled".to_string();
                info_dialog("Canceled", "Download was canceled.")
            }
            Message::Progress(update) => {
                self.phase = DownloadPhase::Downloading;
                self.progress = update.percent;
                self.status = progress_status(&update);
                Command::none()
            }
            Message::PostProcessing => {
                self.phase = DownloadPhase::PostProcessing;
                self.progress = 100.0;
                self.status = match self.kind {
                    MediaKind::Video => "Merging formats...".to_string(),
                    MediaKind::Audio => "Processing audio...".to_string(),
                };
                Command::none()
            }
            Message::Retrying { attempt, delay_secs } => {
                self.progress = 0.0;
                self.status = format!("Retrying in {}s (attempt {})...", delay_secs, attempt);
                Command::none()
            }
            Message::DownloadFinished => {
                self.run = None;
                self.phase = DownloadPhase::Done;
                self.progress = 100.0;
                self.status = "Download complete!".to_string();
                info_dialog("Success", "Download completed successfully!")
            }
            Message::DownloadFailed(err) => {
                self.run = None;
                self.phase = DownloadPhase::Failed;
                self.status = "Download failed".to_string();
                error_dialog("Error", &err)
            }
            Message::ToolsProbed(Ok(status)) => {
                self.tool_status = status;
                Command::none()
            }
            Message::ToolsProbed(Err(warning)) => {
                tracing::warn!(%warning, "tool probe failed");
                self.tool_status = warning;
                Command::none()
            }
            _ => Command::none(),
        }
    }
}

fn progress_status(update: &ProgressUpdate) -> String {
    match (&update.speed, &update.eta) {
        (Some(speed), Some(eta)) => {
            format!("Downloading: {:.1}% (Speed: {}, ETA: {})", update.percent, speed, eta)
        }
        (Some(speed), None) => format!("Downloading: {:.1}% (Speed: {})", update.percent, speed),
        _ => format!("Downloading: {:.1}%", update.percent),
    }
}

fn message_dialog(level: rfd::MessageLevel, title: &str, body: &str) -> Command<Message> {
    let title = title.to_string();
    let body = body.to_string();
    Command::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(body)
                .show()
                .await;
        },
        |_| Message::Ignore,
    )
}

pub fn info_dialog(title: &str, body: &str) -> Command<Message> {
    message_dialog(rfd::MessageLevel::Info, title, body)
}

pub fn warn_dialog(title: &str, body: &str) -> Command<Message> {
    message_dialog(rfd::MessageLevel::Warning, title, body)
}

pub fn error_dialog(title: &str, body: &str) -> Command<Message> {
    message_dialog(rfd::MessageLevel::Error, title, body)
}

pub fn url_row<'a>(url: &'a str) -> Element<'a, Message> {
    row![
        text("YouTube URL:").size(14),
        text_input("Paste Link...", url)
            .on_input(Message::UrlChanged)
            .on_submit(Message::StartDownload)
            .style(theme::TextInput::Custom(Box::new(style::EntryStyle)))
            .padding(5),
        button(text("Paste URL").size(14)).on_press(Message::PasteUrl).padding(5),
    ]
    .spacing(5)
    .align_items(alignment::Alignment::Center)
    .into()
}

pub fn dir_row<'a>(dir: &Path) -> Element<'a, Message> {
    row![
        text(format!("Output: {}", dir.display())).size(12).width(Length::Fill),
        button(text("Browse").size(14)).on_press(Message::BrowseDir).padding(5),
    ]
    .spacing(5)
    .align_items(alignment::Alignment::Center)
    .into()
}

pub fn progress_section<'a>(progress: f32, status: &str) -> Element<'a, Message> {
    column![
        progress_bar(0.0..=100.0, progress)
            .height(8)
            .style(theme::ProgressBar::Custom(Box::new(style::BarStyle))),
        text(status.to_string()).size(12),
    ]
    .spacing(2)
    .into()
}

pub fn action_row<'a>(kind: MediaKind, downloading: bool) -> Element<'a, Message> {
    let label = format!("Download {}", kind.noun());
    row![
        button(text(label).size(14))
            .on_press_maybe((!downloading).then_some(Message::StartDownload))
            .padding(5),
        button(text("Cancel").size(14))
            .on_press_maybe(downloading.then_some(Message::CancelDownload))
            .padding(5),
    ]
    .spacing(5)
    .into()
}

pub fn footer<'a>(tool_status: &str) -> Element<'a, Message> {
    text(tool_status.to_string())
        .size(10)
        .style(theme::Text::Color(style::hex_color(style::HIGHLIGHT)))
        .into()
}

/// Window frame: dark background, padded content column.
pub fn frame<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
        .style(theme::Container::Custom(Box::new(style::WindowStyle)))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_config::UserConfig;

    fn shell() -> Shell {
        Shell::new(MediaKind::Video, PathBuf::from("/tmp/out"))
    }

    fn cfg() -> (tempfile::TempDir, UserConfig) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = UserConfig::load_from(dir.path().join("cfg.json"));
        (dir, cfg)
    }

    #[test]
    fn progress_updates_status_line() {
        let (_d, mut cfg) = cfg();
        let mut s = shell();
        let _ = s.handle(
            Message::Progress(ProgressUpdate {
                percent: 42.5,
                speed: Some("1.2MiB/s".into()),
                eta: Some("00:31".into()),
            }),
            &mut cfg,
        );
        assert_eq!(s.progress, 42.5);
        assert_eq!(s.status, "Downloading: 42.5% (Speed: 1.2MiB/s, ETA: 00:31)");
    }

    #[test]
    fn finish_clears_the_run() {
        let (_d, mut cfg) = cfg();
        let mut s = shell();
        s.begin(DownloadRequest::video(
            "https://youtu.be/x".into(),
            PathBuf::from("/tmp/out"),
            Default::default(),
        ));
        assert!(s.downloading());

        let _ = s.handle(Message::DownloadFinished, &mut cfg);
        assert!(!s.downloading());
        assert_eq!(s.phase, DownloadPhase::Done);
        assert_eq!(s.progress, 100.0);
    }

    #[test]
    fn cancel_is_a_noop_when_idle() {
        let (_d, mut cfg) = cfg();
        let mut s = shell();
        let _ = s.handle(Message::CancelDownload, &mut cfg);
        assert_eq!(s.phase, DownloadPhase::Idle);
        assert_eq!(s.status, "");
    }

    #[test]
    fn each_run_gets_a_fresh_subscription_id() {
        let mut s = shell();
        let req = DownloadRequest::video(
            "https://youtu.be/x".into(),
            PathBuf::from("/tmp/out"),
            Default::default(),
        );
        s.begin(req.clone());
        let first = s.run_id;
        s.begin(req);
        assert_ne!(first, s.run_id);
    }

    #[test]
    fn postprocessing_label_tracks_window_kind() {
        let (_d, mut cfg) = cfg();
        let mut video = shell();
        let _ = video.handle(Message::PostProcessing, &mut cfg);
        assert_eq!(video.status, "Merging formats...");

        let mut audio = Shell::new(MediaKind::Audio, PathBuf::from("/tmp/out"));
        let _ = audio.handle(Message::PostProcessing, &mut cfg);
        assert_eq!(audio.status, "Processing audio...");
    }
}
