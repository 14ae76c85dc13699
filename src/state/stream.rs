//! Per-request progress trace and display composition.

/// Marker on a step line while its node is running.
pub const IN_PROGRESS_MARKER: &str = "⏳";
/// Marker that replaces [`IN_PROGRESS_MARKER`] once the node completes.
pub const DONE_MARKER: &str = "✅";
/// Appended to truncated previews.
pub const ELLIPSIS: &str = "...";
/// Between the step trace and the final answer.
pub const FINAL_ANSWER_SEPARATOR: &str = "\n\n---\n\n";
/// Shown before any progress arrives.
pub const INITIAL_STATUS: &str = "답변을 준비하고 있습니다...";
/// Shown when a stream finishes without producing anything.
pub const NO_ANSWER_MESSAGE: &str = "답변을 생성하지 못했습니다.";

/// Preview length for `plan` fields.
pub const PLAN_PREVIEW_CHARS: usize = 200;
/// Preview length for `tool_trace` and `answer` fields.
pub const TRACE_PREVIEW_CHARS: usize = 150;

/// Cut `text` to `max_chars` characters, appending [`ELLIPSIS`] if anything
/// was removed. Counts chars, not bytes.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Ephemeral state for one outgoing query.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamState {
    pub status_text: String,
    pub accumulated_steps: Vec<String>,
    pub final_answer: Option<String>,
}

impl Default for StreamState {
    fn default() -> Self {
        Self {
            status_text: INITIAL_STATUS.to_string(),
            accumulated_steps: Vec::new(),
            final_answer: None,
        }
    }
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_step(&mut self, line: String) {
        self.accumulated_steps.push(line);
    }

    /// Swap the in-progress marker on the newest step for the done marker.
    /// Returns false if there is no step or it carries no marker.
    pub fn complete_last_step(&mut self) -> bool {
        match self.accumulated_steps.last_mut() {
            Some(last) if last.contains(IN_PROGRESS_MARKER) => {
                *last = last.replacen(IN_PROGRESS_MARKER, DONE_MARKER, 1);
                true
            }
            _ => false,
        }
    }

    pub fn set_final_answer(&mut self, answer: impl Into<String>) {
        self.final_answer = Some(answer.into());
    }

    /// Final answer, only if it has text
    pub fn non_empty_final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref().filter(|a| !a.is_empty())
    }

    pub fn has_content(&self) -> bool {
        !self.accumulated_steps.is_empty() || self.non_empty_final_answer().is_some()
    }

    /// Content of the in-flight assistant turn: the steps joined by blank
    /// lines, then the separator and the final answer if there is one. Falls
    /// back to the status text when both are empty.
    pub fn compose_display(&self) -> String {
        let steps = self.accumulated_steps.join("\n\n");
        match (steps.is_empty(), self.non_empty_final_answer()) {
            (true, None) => self.status_text.clone(),
            (true, Some(answer)) => answer.to_string(),
            (false, None) => steps,
            (false, Some(answer)) => format!("{}{}{}", steps, FINAL_ANSWER_SEPARATOR, answer),
        }
    }

    /// Content once the stream has ended: the bare final answer if there is
    /// one, the fallback message if nothing was produced, otherwise the trace.
    pub fn compose_terminal(&self) -> String {
        if let Some(answer) = self.non_empty_final_answer() {
            answer.to_string()
        } else if self.accumulated_steps.is_empty() {
            NO_ANSWER_MESSAGE.to_string()
        } else {
            self.compose_display()
        }
    }
}
