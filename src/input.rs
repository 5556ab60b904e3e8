//! Validated numeric menu input.
//!
//! [`Prompter::choose`] keeps asking until the user types an integer from the
//! allowed range. Bad input is reported in place and never escapes; the only
//! other outcome is the console going away.

use crate::error::InputError;
use console::style;
use std::io;
use std::num::{IntErrorKind, ParseIntError};
use std::ops::RangeInclusive;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

pub const FORMAT_ERROR: &str = "Invalid input.";
pub const RANGE_ERROR: &str = "Please enter a valid input.";

/// Line-based console: reads answers from `reader`, writes everything else to `writer`.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Write `text` followed by a newline.
    pub async fn say(&mut self, text: &str) -> Result<(), InputError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Prompt until a choice inside `allowed` is entered.
    ///
    /// # Errors
    ///
    /// [`InputError::Closed`] when input reaches end of file, or
    /// [`InputError::Io`] when the console cannot be read or written.
    pub async fn choose(
        &mut self,
        prompt: &str,
        allowed: RangeInclusive<usize>,
    ) -> Result<usize, InputError> {
        let mut line = String::new();
        loop {
            self.writer.write_all(prompt.as_bytes()).await?;
            self.writer.flush().await?;

            line.clear();
            let verdict = match self.reader.read_line(&mut line).await {
                Ok(0) => return Err(InputError::Closed),
                Ok(_) => parse_choice(&line, &allowed),
                // The offending line is consumed, so the stream stays usable.
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    line.clear();
                    Err(FORMAT_ERROR)
                }
                Err(e) => return Err(e.into()),
            };

            match verdict {
                Ok(choice) => return Ok(choice),
                Err(message) => {
                    debug!(input = %line.trim(), reason = message, "Rejected menu input");
                    let rendered = style(message).red().to_string();
                    self.say(&rendered).await?;
                }
            }
        }
    }

    /// Give back the writer, for inspecting captured output.
    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Interpret one line of input against the allowed range.
///
/// Returns the message to show when the line is rejected.
pub fn parse_choice(line: &str, allowed: &RangeInclusive<usize>) -> Result<usize, &'static str> {
    let value: i64 = line.trim().parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => RANGE_ERROR,
        _ => FORMAT_ERROR,
    })?;
    usize::try_from(value)
        .ok()
        .filter(|choice| allowed.contains(choice))
        .ok_or(RANGE_ERROR)
}
