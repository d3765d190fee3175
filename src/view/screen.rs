//! Terminal output for rendered panel frames

use std::io::{self, Write};

const CLEAR: &str = "\x1b[2J\x1b[H";

/// Writes whole frames, skipping ones identical to the last
pub struct Screen<W: Write> {
    out: W,
    clear: bool,
    last_frame: Option<String>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, clear: bool) -> Self {
        Self {
            out,
            clear,
            last_frame: None,
        }
    }

    /// Draw `frame` followed by the input prompt. Returns whether anything
    /// was written.
    pub fn draw(&mut self, frame: &str) -> io::Result<bool> {
        if self.last_frame.as_deref() == Some(frame) {
            return Ok(false);
        }
        if self.clear {
            self.out.write_all(CLEAR.as_bytes())?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.write_all(b"> ")?;
        self.out.flush()?;
        self.last_frame = Some(frame.to_string());
        Ok(true)
    }

    /// Forget the last frame so the next draw always writes
    pub fn invalidate(&mut self) {
        self.last_frame = None;
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
