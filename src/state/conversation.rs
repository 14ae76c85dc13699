//! Ordered chat transcript with a single in-flight assistant turn.
//!
//! While a request runs, `pending_turn_index` points at the placeholder
//! assistant turn; every rewrite goes through that index instead of "the
//! last element", so a user turn can never be overwritten by accident.

use crate::models::ChatTurn;

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    pending_turn_index: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether a placeholder assistant turn is currently in flight
    pub fn is_pending(&self) -> bool {
        self.pending_turn_index.is_some()
    }

    /// The in-flight assistant turn, if any
    pub fn pending_turn(&self) -> Option<&ChatTurn> {
        self.pending_turn_index.and_then(|i| self.turns.get(i))
    }

    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::user(text));
    }

    /// Append an empty assistant turn and mark it as the one being built.
    ///
    /// Returns false (and appends nothing) if one is already in flight.
    pub fn append_placeholder_assistant_turn(&mut self) -> bool {
        if self.pending_turn_index.is_some() {
            return false;
        }
        self.turns.push(ChatTurn::assistant(String::new()));
        self.pending_turn_index = Some(self.turns.len() - 1);
        true
    }

    /// Overwrite the in-flight assistant turn. No-op when nothing is in flight.
    pub fn update_last_assistant_turn(&mut self, content: impl Into<String>) {
        if let Some(turn) = self
            .pending_turn_index
            .and_then(|i| self.turns.get_mut(i))
        {
            turn.content = content.into();
        }
    }

    /// Drop the in-flight placeholder after a hard failure.
    ///
    /// Returns the removed turn. Turns that are not pending are never removed.
    pub fn remove_last_turn(&mut self) -> Option<ChatTurn> {
        let index = self.pending_turn_index.take()?;
        if index < self.turns.len() {
            Some(self.turns.remove(index))
        } else {
            None
        }
    }

    /// Keep the in-flight turn as a regular transcript entry.
    pub fn finish_pending_turn(&mut self) {
        self.pending_turn_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn test_placeholder_is_rewritten_in_place() {
        let mut conversation = Conversation::new();
        conversation.append_user_turn("질문");
        assert!(conversation.append_placeholder_assistant_turn());

        conversation.update_last_assistant_turn("first");
        conversation.update_last_assistant_turn("second");

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns()[1].content, "second");
        assert_eq!(conversation.turns()[1].role, MessageRole::Assistant);
        assert_eq!(conversation.turns()[0].content, "질문");
    }

    #[test]
    fn test_only_one_placeholder() {
        let mut conversation = Conversation::new();
        assert!(conversation.append_placeholder_assistant_turn());
        assert!(!conversation.append_placeholder_assistant_turn());
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_update_without_pending_is_noop() {
        let mut conversation = Conversation::new();
        conversation.append_user_turn("q");
        conversation.update_last_assistant_turn("overwrite?");
        assert_eq!(conversation.turns()[0].content, "q");
    }

    #[test]
    fn test_remove_last_turn_removes_placeholder_only() {
        let mut conversation = Conversation::new();
        conversation.append_user_turn("q");
        conversation.append_placeholder_assistant_turn();

        let removed = conversation.remove_last_turn().unwrap();
        assert!(removed.is_assistant());
        assert_eq!(conversation.len(), 1);
        assert!(!conversation.is_pending());

        // Nothing pending any more: the user turn stays
        assert!(conversation.remove_last_turn().is_none());
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_finish_keeps_turn() {
        let mut conversation = Conversation::new();
        conversation.append_user_turn("q");
        conversation.append_placeholder_assistant_turn();
        conversation.update_last_assistant_turn("answer");
        conversation.finish_pending_turn();

        assert!(!conversation.is_pending());
        assert_eq!(conversation.last().unwrap().content, "answer");

        conversation.update_last_assistant_turn("late write");
        assert_eq!(conversation.last().unwrap().content, "answer");
    }

    #[test]
    fn test_duplicate_content_allowed() {
        let mut conversation = Conversation::new();
        conversation.append_user_turn("same");
        conversation.append_user_turn("same");
        assert_eq!(conversation.len(), 2);
    }
}
