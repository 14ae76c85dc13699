//! `data:` line to [`StreamEvent`] parsing.

use crate::sse::decoder::DATA_PREFIX;
use crate::sse::events::{SseParseError, StreamEvent};

/// Parse one `data: <json>` line.
///
/// Whitespace after the prefix is optional. An unknown `type` parses to
/// [`StreamEvent::Unknown`]; a missing `type` or bad JSON is an error.
pub fn parse_event_line(line: &str) -> Result<StreamEvent, SseParseError> {
    let payload = line
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| SseParseError::NotDataLine(line.to_string()))?
        .trim();

    serde_json::from_str(payload).map_err(|e| SseParseError::InvalidJson {
        message: e.to_string(),
    })
}
