//! Content-Type lookup by file extension.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns the MIME type for `path` based on its extension.
///
/// Matching is case-sensitive: `photo.JPG` is not an image as far as this
/// table is concerned and gets the default type.
///
/// ```
/// # use gatehouse::http::mime::content_type;
/// assert_eq!(content_type("index.html"), "text/html");
/// assert_eq!(content_type("photo.JPG"), "application/octet-stream");
/// ```
pub fn content_type(path: impl AsRef<Path>) -> &'static str {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("txt") => "text/plain",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
