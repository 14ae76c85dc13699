//! Server-sent event consumption for the `/query/stream` endpoint.
//!
//! The backend writes one JSON object per frame:
//!
//! ```text
//! data: {"type":"node_start","node":"planner","message":"..."}
//!
//! data: {"type":"done","session_id":"session-..."}
//! ```
//!
//! # Module structure
//! - `decoder` - byte chunks to complete `data:` lines ([`LineDecoder`], [`decode_lines`])
//! - `events` - typed payloads ([`StreamEvent`], [`NodeUpdateData`])
//! - `parser` - one line to one event ([`parse_event_line`])

mod decoder;
mod events;
mod parser;

pub use decoder::{decode_lines, DataLineStream, LineDecoder, DATA_PREFIX};
pub use events::{
    error_payload_text, NodeOutput, NodeUpdateData, ProgressOutput, SseParseError, StreamEvent,
};
pub use parser::parse_event_line;
