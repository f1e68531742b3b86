//! Access and error log files
//!
//! Each event becomes one line, `[YYYY-MM-DD HH:MM:SS] message`, appended to
//! its file with a single write while holding that file's lock, so lines
//! from concurrent connections never interleave. Every line is also echoed
//! to the console through `tracing`.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a log line, newline included.
pub fn format_line(message: &str) -> String {
    format!("[{}] {}\n", Local::now().format(TIMESTAMP_FORMAT), message)
}

/// One append-only log file, opened on first use.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    handle: Mutex<Option<File>>,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file and its parent directories if missing.
    pub async fn ensure(&self) -> std::io::Result<()> {
        let mut handle = self.handle.lock().await;
        if handle.is_none() {
            *handle = Some(open_append(&self.path).await?);
        }
        Ok(())
    }

    /// Appends one already formatted line.
    pub async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut handle = self.handle.lock().await;
        if handle.is_none() {
            *handle = Some(open_append(&self.path).await?);
        }

        if let Some(file) = handle.as_mut() {
            if let Err(e) = file.write_all(line.as_bytes()).await {
                // Drop the handle so the next line reopens the file.
                *handle = None;
                return Err(e);
            }
            file.flush().await?;
        }
        Ok(())
    }
}

async fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    OpenOptions::new().create(true).append(true).open(path).await
}

/// Access and error logs shared by every connection.
#[derive(Debug, Clone)]
pub struct LogSink {
    access: Arc<LogFile>,
    error: Arc<LogFile>,
}

impl LogSink {
    /// Builds the sink without touching the filesystem.
    pub fn new(access_path: impl Into<PathBuf>, error_path: impl Into<PathBuf>) -> Self {
        Self {
            access: Arc::new(LogFile::new(access_path)),
            error: Arc::new(LogFile::new(error_path)),
        }
    }

    /// Builds the sink and creates both files up front.
    pub async fn open(
        access_path: impl Into<PathBuf>,
        error_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let sink = Self::new(access_path, error_path);
        for file in [&sink.access, &sink.error] {
            file.ensure().await.map_err(|e| {
                anyhow::anyhow!("cannot create log file {}: {}", file.path().display(), e)
            })?;
            tracing::debug!(path = %file.path().display(), "log file ready");
        }
        Ok(sink)
    }

    pub async fn access(&self, message: impl Display) {
        let message = message.to_string();
        tracing::info!("{}", message);
        write_or_report(&self.access, &message).await;
    }

    pub async fn error(&self, message: impl Display) {
        let message = message.to_string();
        tracing::warn!("{}", message);
        write_or_report(&self.error, &message).await;
    }

    pub fn access_path(&self) -> &Path {
        self.access.path()
    }

    pub fn error_path(&self) -> &Path {
        self.error.path()
    }
}

async fn write_or_report(file: &LogFile, message: &str) {
    if let Err(e) = file.append(&format_line(message)).await {
        tracing::error!(
            path = %file.path().display(),
            error = %e,
            "failed to write log line"
        );
    }
}
