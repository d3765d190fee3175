//! Line input from the terminal

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

/// Newline-separated commands. Bytes that are not UTF-8 are replaced
/// rather than rejected, so a stray byte costs one bad command at most.
pub struct LineInput<R> {
    segments: Split<R>,
}

impl<R: AsyncBufRead + Unpin> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            segments: reader.split(b'\n'),
        }
    }

    /// Next line without its terminator, `None` at end of input.
    /// Cancel safe, so it can sit in a `select!` branch.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(bytes) = self.segments.next_segment().await? else {
            return Ok(None);
        };
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches('\r').to_string()))
    }
}
