//! Handing a finished archive to whoever asked for it.

use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Attachment name offered to the requester unless configured otherwise.
pub const DEFAULT_DOWNLOAD_NAME: &str = "wp-pico.zip";

/// MIME type of every delivered archive.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Errors while streaming an archive to its destination.
///
/// Never prevents cleanup of the run that produced the archive.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to stream archive: {0}")]
    Io(#[from] io::Error),

    #[error("archive stream ended early: sent {sent} of {expected} bytes")]
    Truncated { expected: u64, sent: u64 },

    #[error("failed to write archive to {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Response metadata sent ahead of the archive bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeaders {
    filename: String,
    content_length: u64,
}

impl ResponseHeaders {
    pub fn new(filename: impl Into<String>, content_length: u64) -> Self {
        Self {
            filename: filename.into(),
            content_length,
        }
    }

    pub fn content_type(&self) -> &'static str {
        ARCHIVE_CONTENT_TYPE
    }

    /// Returns `attachment; filename=<name>`.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Exact size of the body in bytes.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Header name/value pairs in the order they are sent.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            ("Content-Type", self.content_type().to_string()),
            ("Content-Disposition", self.content_disposition()),
            ("Content-Length", self.content_length.to_string()),
        ]
    }
}

impl fmt::Display for ResponseHeaders {
    /// Formats the headers as an HTTP header block, including the blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.pairs() {
            write!(f, "{}: {}\r\n", name, value)?;
        }
        write!(f, "\r\n")
    }
}

/// Destination for a finished archive.
pub trait ArchiveSink {
    /// Streams `body` (exactly `headers.content_length()` bytes) to the destination.
    ///
    /// Returns the number of body bytes delivered.
    fn deliver(
        &mut self,
        headers: &ResponseHeaders,
        body: &mut dyn Read,
    ) -> Result<u64, DeliveryError>;
}

/// Copies `body` to `out`, failing unless exactly `expected` bytes arrive.
fn copy_exact(
    body: &mut dyn Read,
    out: &mut dyn Write,
    expected: u64,
) -> Result<u64, DeliveryError> {
    let sent = io::copy(&mut body.take(expected), &mut *out)?;
    if sent != expected {
        return Err(DeliveryError::Truncated { expected, sent });
    }
    out.flush()?;
    Ok(sent)
}

/// Writes the raw archive bytes to any writer (stdout, a socket, a buffer).
pub struct WriterSink<W: Write> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ArchiveSink for WriterSink<W> {
    fn deliver(
        &mut self,
        headers: &ResponseHeaders,
        body: &mut dyn Read,
    ) -> Result<u64, DeliveryError> {
        copy_exact(body, &mut self.out, headers.content_length())
    }
}

/// Writes a complete HTTP/1.1 response: status line, headers, blank line, body.
pub struct HttpResponseSink<W: Write> {
    out: W,
}

impl<W: Write> HttpResponseSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ArchiveSink for HttpResponseSink<W> {
    fn deliver(
        &mut self,
        headers: &ResponseHeaders,
        body: &mut dyn Read,
    ) -> Result<u64, DeliveryError> {
        write!(self.out, "HTTP/1.1 200 OK\r\n{}", headers)?;
        copy_exact(body, &mut self.out, headers.content_length())
    }
}

/// Saves the archive to a file path.
///
/// The bytes go to a temporary file beside the target which is renamed into
/// place once complete, so a failed delivery never leaves a truncated archive.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSink for FileSink {
    fn deliver(
        &mut self,
        headers: &ResponseHeaders,
        body: &mut dyn Read,
    ) -> Result<u64, DeliveryError> {
        let dest_err = |source| DeliveryError::Destination {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(parent).map_err(dest_err)?;
        let sent = copy_exact(body, temp.as_file_mut(), headers.content_length())?;
        temp.persist(&self.path).map_err(|e| dest_err(e.error))?;
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn headers_match_download_contract() {
        let headers = ResponseHeaders::new(DEFAULT_DOWNLOAD_NAME, 1234);

        assert_eq!(headers.content_type(), "application/zip");
        assert_eq!(
            headers.content_disposition(),
            "attachment; filename=wp-pico.zip"
        );
        assert_eq!(headers.content_length(), 1234);
    }

    #[test]
    fn headers_display_as_http_block() {
        let headers = ResponseHeaders::new("x.zip", 3);
        assert_eq!(
            headers.to_string(),
            "Content-Type: application/zip\r\n\
             Content-Disposition: attachment; filename=x.zip\r\n\
             Content-Length: 3\r\n\r\n"
        );
    }

    #[test]
    fn writer_sink_copies_body() {
        let mut sink = WriterSink::new(Vec::new());
        let sent = sink
            .deliver(&ResponseHeaders::new("x.zip", 3), &mut &b"abc"[..])
            .unwrap();

        assert_eq!(sent, 3);
        assert_eq!(sink.into_inner(), b"abc");
    }

    #[test]
    fn http_sink_writes_status_headers_and_body() {
        let mut sink = HttpResponseSink::new(Vec::new());
        sink.deliver(&ResponseHeaders::new("x.zip", 2), &mut &b"PK"[..])
            .unwrap();

        let response = String::from_utf8(sink.into_inner()).unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\n"));
        assert!(response.ends_with("Content-Length: 2\r\n\r\nPK"));
    }

    #[test]
    fn short_body_is_truncated_error() {
        let mut sink = WriterSink::new(Vec::new());
        let result = sink.deliver(&ResponseHeaders::new("x.zip", 10), &mut &b"abc"[..]);

        assert!(matches!(
            result,
            Err(DeliveryError::Truncated {
                expected: 10,
                sent: 3
            })
        ));
    }

    #[test]
    fn broken_pipe_is_io_error() {
        let mut sink = WriterSink::new(BrokenPipe);
        let result = sink.deliver(&ResponseHeaders::new("x.zip", 3), &mut &b"abc"[..]);
        assert!(matches!(result, Err(DeliveryError::Io(_))));
    }

    #[test]
    fn file_sink_writes_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("wp-pico.zip");
        let mut sink = FileSink::new(&target);

        sink.deliver(&ResponseHeaders::new("wp-pico.zip", 4), &mut &b"PK\x05\x06"[..])
            .unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"PK\x05\x06");
    }

    #[test]
    fn file_sink_leaves_nothing_on_short_body() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("wp-pico.zip");
        let mut sink = FileSink::new(&target);

        let result = sink.deliver(&ResponseHeaders::new("wp-pico.zip", 99), &mut &b"PK"[..]);

        assert!(result.is_err());
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn file_sink_missing_directory_is_destination_error() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("missing/wp-pico.zip"));

        let result = sink.deliver(&ResponseHeaders::new("wp-pico.zip", 2), &mut &b"PK"[..]);
        assert!(matches!(result, Err(DeliveryError::Destination { .. })));
    }
}
