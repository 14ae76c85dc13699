//! Streaming-related error types.

use std::fmt;

/// Failures while reading `/query/stream`.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The connection dropped after the stream started.
    ConnectionLost { message: String },

    /// The backend sent an `error` event.
    BackendError { message: String },
}

impl StreamError {
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::ConnectionLost { .. } => true,
            StreamError::BackendError { .. } => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => {
                "답변을 받는 도중 서버와의 연결이 끊어졌습니다.".to_string()
            }
            StreamError::BackendError { message } => format!("서버 오류: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::BackendError { .. } => "E_STREAM_BACKEND",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectionLost { message } => {
                write!(f, "Stream connection lost: {}", message)
            }
            StreamError::BackendError { message } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
