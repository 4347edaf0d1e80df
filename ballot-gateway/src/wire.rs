//! Client-side line framing for the ballot protocol.

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Writes one command line with its terminator.
///
/// # Errors
///
/// Returns the underlying I/O error if the write fails.
pub async fn send_line(stream: &mut TcpStream, line: &str) -> std::io::Result<()> {
    stream.write_all(format!("{line}\n").as_bytes()).await
}

/// Reads one newline-terminated line, or `None` at end of stream.
///
/// `\r` before the terminator is stripped; bytes after the newline stay in
/// `buf` for the next call.
///
/// # Errors
///
/// Returns the underlying I/O error if the read fails.
pub async fn read_line(
    stream: &mut TcpStream,
    buf: &mut BytesMut,
) -> std::io::Result<Option<String>> {
    loop {
        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let line = buf.split_to(pos + 1);
            let line = &line[..line.len() - 1];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            return Ok(Some(String::from_utf8_lossy(line).into_owned()));
        }

        let bytes_read = stream.read_buf(buf).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
    }
}
