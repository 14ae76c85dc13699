//! Byte stream to `data:` line decoding.
//!
//! Lines are split on raw bytes before UTF-8 decoding so a multi-byte
//! character cut in half by a chunk boundary is reassembled. The output is
//! therefore identical however the same body is chunked.

use bytes::BytesMut;
use futures_util::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;

use crate::traits::{ByteStream, HttpError};

/// Prefix of the lines that carry event payloads.
pub const DATA_PREFIX: &str = "data:";

/// Stream of complete `data:` lines, in arrival order.
pub type DataLineStream = Pin<Box<dyn Stream<Item = Result<String, HttpError>> + Send>>;

/// Incremental line splitter with a carry-over buffer.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
    /// Prefix of `buffer` already known to hold no newline
    scanned: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return every complete `data:` line it finishes.
    ///
    /// A trailing `\r` is stripped. Lines with any other prefix, including
    /// the blank separators between frames, are dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..]
            .iter()
            .position(|b| *b == b'\n')
        {
            let pos = self.scanned + offset;
            let raw = self.buffer.split_to(pos + 1);
            self.scanned = 0;
            let text = String::from_utf8_lossy(&raw[..pos]);
            let text = text.trim_end_matches('\r');
            if text.starts_with(DATA_PREFIX) {
                lines.push(text.to_string());
            }
        }
        self.scanned = self.buffer.len();
        lines
    }

    /// Bytes held back waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// End of input. An unterminated trailing line is discarded, never
    /// emitted; returns how many bytes were dropped.
    pub fn finish(&mut self) -> usize {
        let dropped = self.buffer.len();
        if dropped > 0 {
            tracing::debug!(
                "Discarding {} bytes of unterminated trailing line at end of stream",
                dropped
            );
        }
        self.buffer.clear();
        self.scanned = 0;
        dropped
    }
}

/// Turn a response body into a lazy stream of `data:` lines.
///
/// A transport error is yielded once and ends the stream.
pub fn decode_lines(bytes: ByteStream) -> DataLineStream {
    let lines = stream::unfold(
        (bytes, LineDecoder::new(), VecDeque::new(), false),
        |(mut bytes, mut decoder, mut ready, mut failed)| async move {
            loop {
                if let Some(line) = ready.pop_front() {
                    return Some((Ok(line), (bytes, decoder, ready, failed)));
                }
                if failed {
                    return None;
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => ready.extend(decoder.feed(&chunk)),
                    Some(Err(e)) => {
                        failed = true;
                        return Some((Err(e), (bytes, decoder, ready, failed)));
                    }
                    None => {
                        decoder.finish();
                        return None;
                    }
                }
            }
        },
    );

    Box::pin(lines)
}
