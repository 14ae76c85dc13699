//! Backend session id tracking
//!
//! The backend correlates queries into one conversation through an opaque
//! session id it issues on the first stream. The tracker remembers the latest
//! id for the lifetime of the process and is never cleared automatically.

/// Holds the session id issued by the backend, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTracker {
    id: Option<String>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session id, attached to every outgoing request
    pub fn get(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Store `id` if it differs from the current one. Returns whether it changed.
    pub fn update(&mut self, id: &str) -> bool {
        if self.id.as_deref() == Some(id) {
            return false;
        }
        tracing::info!("Backend issued session id {}", id);
        self.id = Some(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(SessionTracker::new().get(), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut tracker = SessionTracker::new();
        tracker.set("session-1");
        assert_eq!(tracker.get(), Some("session-1"));
    }

    #[test]
    fn test_update_reports_change() {
        let mut tracker = SessionTracker::new();
        assert!(tracker.update("a"));
        assert!(!tracker.update("a"));
        assert!(tracker.update("b"));
        assert_eq!(tracker.get(), Some("b"));
    }
}
