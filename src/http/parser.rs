use crate::http::request::{Method, ParsedRequestLine};
use thiserror::Error;

/// Longest request line accepted before the connection is dropped.
pub const MAX_REQUEST_LINE: usize = 8 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("connection closed before a request line was received")]
    Missing,
    #[error("empty request line")]
    Empty,
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line longer than {} bytes", MAX_REQUEST_LINE)]
    TooLong,
    #[error("malformed request line: expected 3 tokens, found {0}")]
    Malformed(usize),
}

/// Finds the end of the first line in `buf`, returning the index just past
/// the `\n`.
pub fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|i| i + 1)
}

/// Parses a request line such as `GET /index.html HTTP/1.1`.
///
/// A trailing `\r\n` or `\n` is ignored. Tokens beyond the third are
/// tolerated, fewer than three are not.
pub fn parse_request_line(raw: &[u8]) -> Result<ParsedRequestLine, ParseError> {
    let line = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidEncoding)?;
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::Malformed(parts.len()));
    }

    Ok(ParsedRequestLine {
        method: Method::from_token(parts[0]),
        target: parts[1].to_string(),
        version: parts[2].to_string(),
    })
}
