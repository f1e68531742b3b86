//! `/status` diagnostics page

use std::path::Path;

const MB: u64 = 1024 * 1024;

/// Point-in-time host metrics. `None` means the platform could not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub available_memory_mb: Option<u64>,
    pub free_disk_mb: Option<u64>,
    pub processors: Option<usize>,
}

impl StatusReport {
    /// Samples memory, free space on the filesystem holding `root`, and the
    /// processor count.
    pub fn collect(root: &Path) -> Self {
        Self {
            available_memory_mb: available_memory().map(|b| b / MB),
            free_disk_mb: free_disk(root).map(|b| b / MB),
            processors: std::thread::available_parallelism()
                .ok()
                .map(|n| n.get()),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<html>\n\
             <body style=\"background-color: #f0f0f0;\">\n\
             <h1>Server Status</h1>\n\
             <p>Available memory: {}</p>\n\
             <p>Free disk space: {}</p>\n\
             <p>Processors: {}</p>\n\
             </body>\n\
             </html>",
            fmt_mb(self.available_memory_mb),
            fmt_mb(self.free_disk_mb),
            self.processors
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        )
    }
}

fn fmt_mb(value: Option<u64>) -> String {
    match value {
        Some(mb) => format!("{} MB", mb),
        None => "unknown".to_string(),
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn available_memory() -> Option<u64> {
    match nix::sys::sysinfo::sysinfo() {
        Ok(info) => Some(info.ram_unused()),
        Err(e) => {
            tracing::debug!(error = %e, "sysinfo failed");
            None
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn available_memory() -> Option<u64> {
    None
}

#[cfg(unix)]
fn free_disk(path: &Path) -> Option<u64> {
    match nix::sys::statvfs::statvfs(path) {
        Ok(stat) => Some(stat.blocks_available() as u64 * stat.fragment_size() as u64),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "statvfs failed");
            None
        }
    }
}

#[cfg(not(unix))]
fn free_disk(_path: &Path) -> Option<u64> {
    None
}
