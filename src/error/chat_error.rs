//! Unified error type for the chat client.

use std::fmt;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;

/// Every way a submission can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Transport failure before or outside the event stream.
    Network(NetworkError),

    /// Failure while consuming the event stream.
    Stream(StreamError),

    /// A query is already in flight for this conversation.
    Busy,

    /// The submitted text was empty or whitespace.
    EmptyQuery,
}

impl ChatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Network(NetworkError::HttpStatus { status, .. }) if *status >= 500 => {
                ErrorCategory::Server
            }
            ChatError::Network(_) => ErrorCategory::Network,
            ChatError::Stream(StreamError::ConnectionLost { .. }) => ErrorCategory::Network,
            ChatError::Stream(StreamError::BackendError { .. }) => ErrorCategory::Server,
            ChatError::Busy => ErrorCategory::Client,
            ChatError::EmptyQuery => ErrorCategory::User,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(err) => err.is_retryable(),
            ChatError::Stream(err) => err.is_retryable(),
            ChatError::Busy | ChatError::EmptyQuery => false,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Busy => "아직 답변을 준비하고 있습니다. 잠시만 기다려주세요.".to_string(),
            ChatError::EmptyQuery => "질문을 입력해주세요.".to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Busy => "E_CHAT_BUSY",
            ChatError::EmptyQuery => "E_CHAT_EMPTY",
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
            ChatError::Busy => write!(f, "A query is already in flight"),
            ChatError::EmptyQuery => write!(f, "Query is empty"),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::Busy | ChatError::EmptyQuery => None,
        }
    }
}

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let server: ChatError = NetworkError::HttpStatus {
            status: 502,
            message: String::new(),
        }
        .into();
        assert_eq!(server.category(), ErrorCategory::Server);

        let backend: ChatError = StreamError::BackendError {
            message: "x".to_string(),
        }
        .into();
        assert_eq!(backend.category(), ErrorCategory::Server);

        assert_eq!(ChatError::Busy.category(), ErrorCategory::Client);
        assert_eq!(ChatError::EmptyQuery.category(), ErrorCategory::User);
    }

    #[test]
    fn test_retryable_and_messages() {
        let timeout: ChatError = NetworkError::Timeout {
            message: "slow".to_string(),
        }
        .into();
        assert!(timeout.is_retryable());
        assert_eq!(timeout.category(), ErrorCategory::Network);
        assert_eq!(timeout.user_message(), "추천 서버의 응답 시간이 초과되었습니다.");

        assert!(!ChatError::Busy.is_retryable());
        assert_eq!(ChatError::EmptyQuery.user_message(), "질문을 입력해주세요.");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ChatError = json_err.into();
        assert_eq!(err.error_code(), "E_NET_INVALID");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err: ChatError = StreamError::ConnectionLost {
            message: "eof".to_string(),
        }
        .into();
        assert!(err.source().is_some());
        assert!(ChatError::Busy.source().is_none());
    }
}
