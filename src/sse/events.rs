//! Typed events from the recommendation backend's `/query/stream` endpoint.

use serde::Deserialize;
use thiserror::Error;

/// Node output attached to a `node_update` event.
///
/// The backend sends at most one of these per event, but nothing stops it
/// from sending several; [`NodeUpdateData::primary`] picks by priority.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeUpdateData {
    #[serde(default)]
    pub final_answer: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub subtask: Option<String>,
    #[serde(default)]
    pub tool_trace: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// The single field of a [`NodeUpdateData`] that drives a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutput<'a> {
    /// Replaces any earlier final answer
    FinalAnswer(&'a str),
    /// Appended to the step trace
    Progress(ProgressOutput<'a>),
}

/// Intermediate node output shown as a progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutput<'a> {
    Plan(&'a str),
    Subtask(&'a str),
    ToolTrace(&'a str),
    Answer(&'a str),
}

impl NodeUpdateData {
    /// First present field in priority order
    /// final_answer > plan > subtask > tool_trace > answer.
    ///
    /// `final_answer` counts as present even when empty; the progress fields
    /// must be non-empty.
    pub fn primary(&self) -> Option<NodeOutput<'_>> {
        fn non_empty(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|s| !s.is_empty())
        }

        if let Some(answer) = self.final_answer.as_deref() {
            return Some(NodeOutput::FinalAnswer(answer));
        }
        non_empty(&self.plan)
            .map(ProgressOutput::Plan)
            .or_else(|| non_empty(&self.subtask).map(ProgressOutput::Subtask))
            .or_else(|| non_empty(&self.tool_trace).map(ProgressOutput::ToolTrace))
            .or_else(|| non_empty(&self.answer).map(ProgressOutput::Answer))
            .map(NodeOutput::Progress)
    }
}

/// One decoded `data:` frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Backend announces the session id for this conversation
    SessionId { session_id: String },
    /// A graph node started running
    NodeStart {
        #[serde(default)]
        node: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    /// A graph node produced output
    NodeUpdate {
        #[serde(default)]
        node: Option<String>,
        #[serde(default)]
        data: NodeUpdateData,
    },
    /// A graph node finished
    NodeComplete {
        #[serde(default)]
        node: Option<String>,
    },
    /// Stream completed
    Done {
        #[serde(default)]
        session_id: Option<String>,
    },
    /// Backend failure; `error` is whatever the backend put there
    Error {
        #[serde(default)]
        error: serde_json::Value,
    },
    /// Any `type` this client does not know
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::SessionId { .. } => "session_id",
            StreamEvent::NodeStart { .. } => "node_start",
            StreamEvent::NodeUpdate { .. } => "node_update",
            StreamEvent::NodeComplete { .. } => "node_complete",
            StreamEvent::Done { .. } => "done",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Unknown => "unknown",
        }
    }
}

/// Render an `error` event payload as text.
pub fn error_payload_text(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "unknown backend error".to_string(),
        other => other.to_string(),
    }
}

/// Errors from turning one line into a [`StreamEvent`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseParseError {
    /// Line does not start with `data:`
    #[error("Not a data line: {0}")]
    NotDataLine(String),
    /// Payload is not valid JSON or lacks required fields
    #[error("Invalid JSON in data line: {message}")]
    InvalidJson { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(json: &str) -> NodeUpdateData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_primary_priority_order() {
        let d = data(r#"{"answer":"a","plan":"p","subtask":"s"}"#);
        assert_eq!(d.primary(), Some(NodeOutput::Progress(ProgressOutput::Plan("p"))));

        let d = data(r#"{"answer":"a","tool_trace":"t"}"#);
        assert_eq!(d.primary(), Some(NodeOutput::Progress(ProgressOutput::ToolTrace("t"))));

        let d = data(r#"{"plan":"p","final_answer":"f"}"#);
        assert_eq!(d.primary(), Some(NodeOutput::FinalAnswer("f")));
    }

    #[test]
    fn test_primary_skips_empty_progress_fields() {
        let d = data(r#"{"plan":"","subtask":"s"}"#);
        assert_eq!(d.primary(), Some(NodeOutput::Progress(ProgressOutput::Subtask("s"))));

        assert_eq!(data("{}").primary(), None);
    }

    #[test]
    fn test_primary_keeps_empty_final_answer() {
        let d = data(r#"{"final_answer":"","plan":"p"}"#);
        assert_eq!(d.primary(), Some(NodeOutput::FinalAnswer("")));
    }

    #[test]
    fn test_deserialize_variants() {
        let e: StreamEvent =
            serde_json::from_str(r#"{"type":"session_id","session_id":"abc"}"#).unwrap();
        assert_eq!(
            e,
            StreamEvent::SessionId {
                session_id: "abc".to_string()
            }
        );

        let e: StreamEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(e, StreamEvent::Done { session_id: None });

        let e: StreamEvent =
            serde_json::from_str(r#"{"type":"node_update","node":"planner","data":{"plan":"x"}}"#)
                .unwrap();
        assert_eq!(e.event_type_name(), "node_update");
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let e: StreamEvent = serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(e, StreamEvent::Unknown);
    }

    #[test]
    fn test_error_payload_text() {
        assert_eq!(error_payload_text(&serde_json::json!("boom")), "boom");
        assert_eq!(
            error_payload_text(&serde_json::json!({"code": 1})),
            r#"{"code":1}"#
        );
        assert_eq!(
            error_payload_text(&serde_json::Value::Null),
            "unknown backend error"
        );
    }
}
