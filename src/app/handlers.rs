//! Stream event interpretation.
//!
//! Each decoded event applies exactly one transition to the per-request
//! [`StreamState`], the [`Conversation`]'s in-flight turn and the
//! [`SessionTracker`].

use crate::error::StreamError;
use crate::sse::{
    error_payload_text, parse_event_line, NodeOutput, ProgressOutput, StreamEvent,
};
use crate::state::{
    truncate_preview, Conversation, SessionTracker, StreamState, IN_PROGRESS_MARKER,
    PLAN_PREVIEW_CHARS, TRACE_PREVIEW_CHARS,
};

const PLAN_PREFIX: &str = "📋 계획: ";
const SUBTASK_PREFIX: &str = "🔍 ";
const TOOL_TRACE_PREFIX: &str = "🛠️ ";
const ANSWER_PREFIX: &str = "💬 ";
const UNNAMED_STEP: &str = "처리 중";

/// What the reader loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFlow {
    Continue,
    /// `done` arrived; nothing after it is read
    Finished,
}

/// Mutable targets of one stream's transitions.
pub struct StreamContext<'a> {
    pub stream: &'a mut StreamState,
    pub conversation: &'a mut Conversation,
    pub session: &'a mut SessionTracker,
}

impl StreamContext<'_> {
    /// Parse and apply one `data:` line.
    ///
    /// Malformed payloads are dropped with a debug trace and the stream
    /// carries on.
    pub fn apply_line(&mut self, line: &str) -> Result<StreamFlow, StreamError> {
        match parse_event_line(line) {
            Ok(event) => self.apply_event(event),
            Err(e) => {
                tracing::debug!("Dropping malformed stream line: {} ({})", e, line);
                Ok(StreamFlow::Continue)
            }
        }
    }

    pub fn apply_event(&mut self, event: StreamEvent) -> Result<StreamFlow, StreamError> {
        match event {
            StreamEvent::SessionId { session_id } => {
                self.session.update(&session_id);
            }
            StreamEvent::NodeStart { node, message } => {
                let label = message
                    .filter(|m| !m.is_empty())
                    .or(node)
                    .unwrap_or_else(|| UNNAMED_STEP.to_string());
                self.stream
                    .push_step(format!("{} {}", IN_PROGRESS_MARKER, label));
                self.stream.status_text = label;
                self.write_display();
            }
            StreamEvent::NodeUpdate { node, data } => {
                match data.primary() {
                    Some(NodeOutput::FinalAnswer(answer)) => self.stream.set_final_answer(answer),
                    Some(NodeOutput::Progress(output)) => {
                        self.stream.push_step(step_line(output))
                    }
                    None => {
                        tracing::debug!("node_update from {:?} carried no known field", node)
                    }
                }
                self.write_display();
            }
            StreamEvent::NodeComplete { .. } => {
                self.stream.complete_last_step();
                self.write_display();
            }
            StreamEvent::Done { session_id } => {
                if let Some(id) = session_id.as_deref() {
                    self.session.update(id);
                }
                self.conversation
                    .update_last_assistant_turn(self.stream.compose_terminal());
                return Ok(StreamFlow::Finished);
            }
            StreamEvent::Error { error } => {
                let message = error_payload_text(&error);
                tracing::warn!("Backend reported an error mid-stream: {}", message);
                return Err(StreamError::BackendError { message });
            }
            StreamEvent::Unknown => {
                tracing::debug!("Ignoring stream event with unknown type");
            }
        }
        Ok(StreamFlow::Continue)
    }

    /// Stream closed without `done`: settle the turn the same way.
    pub fn finish_without_done(&mut self) {
        self.conversation
            .update_last_assistant_turn(self.stream.compose_terminal());
    }

    fn write_display(&mut self) {
        self.conversation
            .update_last_assistant_turn(self.stream.compose_display());
    }
}

/// Progress line for an intermediate node output.
fn step_line(output: ProgressOutput<'_>) -> String {
    match output {
        ProgressOutput::Plan(plan) => {
            format!("{}{}", PLAN_PREFIX, truncate_preview(plan, PLAN_PREVIEW_CHARS))
        }
        ProgressOutput::Subtask(subtask) => format!("{}{}", SUBTASK_PREFIX, subtask),
        ProgressOutput::ToolTrace(trace) => {
            format!("{}{}", TOOL_TRACE_PREFIX, truncate_preview(trace, TRACE_PREVIEW_CHARS))
        }
        ProgressOutput::Answer(answer) => {
            format!("{}{}", ANSWER_PREFIX, truncate_preview(answer, TRACE_PREVIEW_CHARS))
        }
    }
}
