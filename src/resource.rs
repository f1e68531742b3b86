//! Static file lookup under the document root
//!
//! A request path is first normalised without touching the filesystem: one
//! leading `/` is dropped, `.` segments vanish and `..` pops a segment. A
//! `..` with nothing left to pop, or an absolute component, is an escape
//! attempt. The surviving path is then canonicalised and checked against the
//! canonical root again, which also catches symlinks pointing outside.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs::File;

/// A regular file ready to be streamed.
#[derive(Debug)]
pub struct FoundFile {
    pub path: PathBuf,
    pub len: u64,
    pub file: File,
}

#[derive(Debug)]
pub enum NotFoundReason {
    Missing,
    Directory,
    /// The request tried to leave the document root.
    Escape,
    /// Exists but is neither a regular file nor a directory.
    NotAFile,
    Io(io::Error),
}

impl NotFoundReason {
    pub fn describe(&self) -> String {
        match self {
            NotFoundReason::Missing => "no such file".to_string(),
            NotFoundReason::Directory => "path is a directory".to_string(),
            NotFoundReason::Escape => "path escapes the document root".to_string(),
            NotFoundReason::NotAFile => "not a regular file".to_string(),
            NotFoundReason::Io(e) => format!("I/O error: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum Resource {
    Found(FoundFile),
    NotFound(NotFoundReason),
}

#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: PathBuf,
    default_document: String,
}

impl ResourceResolver {
    pub fn new(root: impl Into<PathBuf>, default_document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_document: default_document.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `request_path` (query already removed) to a file under the
    /// root.
    pub async fn resolve(&self, request_path: &str) -> Resource {
        let Some(clean) = normalise(request_path) else {
            return Resource::NotFound(NotFoundReason::Escape);
        };
        let names_root = clean.as_os_str().is_empty();
        // `/name/` asks for a directory, never a file.
        let wants_directory = !names_root && request_path.ends_with('/');

        let root = match tokio::fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) => return Resource::NotFound(NotFoundReason::Io(e)),
        };

        // Resolved as sent, so `..` after a file name is ENOTDIR.
        let candidate = if names_root {
            root.join(&self.default_document)
        } else {
            root.join(request_path.strip_prefix('/').unwrap_or(request_path))
        };

        let real = match tokio::fs::canonicalize(&candidate).await {
            Ok(real) => real,
            Err(e) => return Resource::NotFound(classify(e)),
        };

        if !real.starts_with(&root) {
            return Resource::NotFound(NotFoundReason::Escape);
        }

        let file = match File::open(&real).await {
            Ok(file) => file,
            Err(e) => return Resource::NotFound(classify(e)),
        };

        let metadata = match file.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => return Resource::NotFound(NotFoundReason::Io(e)),
        };

        if metadata.is_dir() {
            Resource::NotFound(NotFoundReason::Directory)
        } else if wants_directory {
            Resource::NotFound(NotFoundReason::Missing)
        } else if !metadata.is_file() {
            Resource::NotFound(NotFoundReason::NotAFile)
        } else {
            Resource::Found(FoundFile {
                path: real,
                len: metadata.len(),
                file,
            })
        }
    }
}

/// Lexically cleans `request_path` into a path relative to the root.
///
/// Empty means the root itself; `None` means the path would leave it.
fn normalise(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.strip_prefix('/').unwrap_or(request_path);

    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !clean.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

fn classify(e: io::Error) -> NotFoundReason {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => NotFoundReason::Missing,
        _ => NotFoundReason::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_strips_dots() {
        assert_eq!(normalise("/"), Some(PathBuf::new()));
        assert_eq!(normalise(""), Some(PathBuf::new()));
        assert_eq!(normalise("/docs/./a.txt"), Some(PathBuf::from("docs/a.txt")));
        assert_eq!(normalise("/docs/../index.html"), Some(PathBuf::from("index.html")));
        assert_eq!(normalise("/docs/.."), Some(PathBuf::new()));
    }

    #[test]
    fn normalise_rejects_escapes() {
        assert_eq!(normalise("/../../etc/passwd"), None);
        assert_eq!(normalise("../../etc/passwd"), None);
        assert_eq!(normalise("/docs/../../secret"), None);
        assert_eq!(normalise("//etc/passwd"), None);
    }
}
