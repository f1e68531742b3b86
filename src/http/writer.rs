use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};
use crate::resource::FoundFile;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serialises the status line, headers and the blank separator line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes complete responses to a client stream.
///
/// Every method writes the head, then the body, then flushes, and returns
/// the number of body bytes sent.
pub struct ResponseWriter<'a, W> {
    out: &'a mut W,
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    pub async fn write_found(&mut self, found: FoundFile, content_type: &str) -> anyhow::Result<u64> {
        self.send(Response::file(found.file, found.len, content_type))
            .await
    }

    pub async fn write_not_found(&mut self) -> anyhow::Result<u64> {
        self.send(Response::not_found()).await
    }

    pub async fn write_status_page(&mut self, html: &str) -> anyhow::Result<u64> {
        self.send(Response::html(html)).await
    }

    pub async fn send(&mut self, response: Response) -> anyhow::Result<u64> {
        let head = serialize_head(&response);
        self.out.write_all(&head).await?;

        let sent = match response.body {
            Body::Bytes(bytes) => {
                self.out.write_all(&bytes).await?;
                bytes.len() as u64
            }
            Body::File { file, len } => {
                let mut limited = file.take(len);
                let copied = tokio::io::copy(&mut limited, &mut *self.out).await?;
                if copied != len {
                    anyhow::bail!(
                        "file ended after {} of {} advertised bytes",
                        copied,
                        len
                    );
                }
                copied
            }
        };

        self.out.flush().await?;
        Ok(sent)
    }
}
