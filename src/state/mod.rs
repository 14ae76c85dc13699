//! Chat state containers
//!
//! - `Conversation`: ordered turns plus the in-flight assistant placeholder
//! - `StreamState`: per-request progress steps and final answer
//! - `SessionTracker`: backend-issued session id

pub mod conversation;
pub mod session;
pub mod stream;

pub use conversation::Conversation;
pub use session::SessionTracker;
pub use stream::{
    truncate_preview, StreamState, DONE_MARKER, ELLIPSIS, FINAL_ANSWER_SEPARATOR,
    INITIAL_STATUS, IN_PROGRESS_MARKER, NO_ANSWER_MESSAGE, PLAN_PREVIEW_CHARS,
    TRACE_PREVIEW_CHARS,
};
