use serde::{Deserialize, Serialize};

/// Body of `POST /query` and `POST /query/stream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    pub user_query: String,
    /// Omitted until the backend has issued one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl QueryRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}

/// Response of the synchronous `POST /query` endpoint.
///
/// Different backend revisions named the text field `answer`, `response` or
/// `message`; all are accepted. The raw body is kept for the last-resort
/// fallback.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LegacyQueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(skip)]
    pub raw: String,
}

impl LegacyQueryResponse {
    /// Parse a body, remembering the raw text.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        let mut parsed: Self = serde_json::from_str(body)?;
        parsed.raw = body.to_string();
        Ok(parsed)
    }

    /// Text to show: `answer`, else `response`, else `message`, else the raw JSON.
    pub fn display_text(&self) -> String {
        [&self.answer, &self.response, &self.message]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| self.raw.clone())
    }
}
