//! Logging init: daily file under the app config dir, or stderr fallback.

use std::fs;
use std::io;

use anyhow::Result;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config;

/// Writer that is either the log file or stderr (used when file clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging to `~/.youtube_downloader/logs/downloader_YYYYMMDD.log`.
/// Returns Err when the log dir is unwritable so the caller can fall back to
/// stderr.
pub fn init_logging(app: &str) -> Result<()> {
    let log_dir = config::app_config_dir().join("logs");
    fs::create_dir_all(&log_dir)?;

    let file_name = format!("downloader_{}.log", chrono::Local::now().format("%Y%m%d"));
    let log_path = log_dir.join(file_name);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    struct FileMakeWriter(fs::File);

    impl<'a> MakeWriter<'a> for FileMakeWriter {
        type Writer = FileOrStderr;

        fn make_writer(&'a self) -> Self::Writer {
            self.0
                .try_clone()
                .map(FileOrStderr::File)
                .unwrap_or(FileOrStderr::Stderr)
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
        .with_ansi(false)
        .init();

    tracing::info!(app, "logging initialized at {}", log_path.display());
    Ok(())
}

/// Stderr-only logging, used when [`init_logging`] fails so the window still
/// opens.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
