//! Chat session controller.
//!
//! [`ChatApp`] owns the transcript, the backend session id and the loading
//! flag, and drives one query at a time through the configured transport.

mod handlers;

pub use handlers::{StreamContext, StreamFlow};

use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedSender;

use crate::adapters::ReqwestHttpClient;
use crate::backend::BackendClient;
use crate::config::{ClientConfig, Transport};
use crate::error::{ChatError, ChatResult, StreamError};
use crate::models::{ChatTurn, QueryRequest};
use crate::state::{Conversation, SessionTracker, StreamState};
use crate::traits::HttpClient;

/// Shown after any failed submission.
pub const GENERIC_FAILURE_MESSAGE: &str = "응답을 받는데 실패했습니다. 다시 시도해주세요.";

/// Progress notifications for a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatUpdate {
    /// The in-flight assistant turn was rewritten
    AssistantContent(String),
    /// The request finished; carries the final content
    Completed(String),
    /// The request failed and the placeholder was removed
    Failed {
        /// Always [`GENERIC_FAILURE_MESSAGE`]
        message: String,
        /// What went wrong, in user terms
        detail: String,
        /// Resubmitting the same query may succeed
        retryable: bool,
    },
}

pub struct ChatApp<C: HttpClient = ReqwestHttpClient> {
    client: BackendClient<C>,
    transport: Transport,
    conversation: Conversation,
    session: SessionTracker,
    is_loading: bool,
    last_error: Option<String>,
    updates: Option<UnboundedSender<ChatUpdate>>,
}

impl ChatApp<ReqwestHttpClient> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(
            BackendClient::with_base_url(config.backend_url),
            config.transport,
        )
    }
}

impl<C: HttpClient> ChatApp<C> {
    pub fn with_client(client: BackendClient<C>, transport: Transport) -> Self {
        Self {
            client,
            transport,
            conversation: Conversation::new(),
            session: SessionTracker::new(),
            is_loading: false,
            last_error: None,
            updates: None,
        }
    }

    /// Send [`ChatUpdate`]s to `tx` as the conversation changes.
    pub fn with_updates(mut self, tx: UnboundedSender<ChatUpdate>) -> Self {
        self.updates = Some(tx);
        self
    }

    pub fn client(&self) -> &BackendClient<C> {
        &self.client
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn turns(&self) -> &[ChatTurn] {
        self.conversation.turns()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.get()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Submit one query and wait until its answer is settled.
    ///
    /// On failure the placeholder turn is removed and [`Self::last_error`]
    /// holds a generic message; the user turn stays in the transcript.
    pub async fn submit(&mut self, text: &str) -> ChatResult<()> {
        let request = self.begin_request(text)?;

        let result = match self.transport {
            Transport::Streaming => self.run_stream(&request).await,
            Transport::Legacy => self.run_legacy(&request).await,
        };

        self.end_request(&result);
        result
    }

    /// Validate `text` and open a turn for it.
    ///
    /// Appends the user turn and the assistant placeholder, raises the loading
    /// flag and returns the request body carrying the current session id.
    pub(crate) fn begin_request(&mut self, text: &str) -> ChatResult<QueryRequest> {
        let query = text.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }
        if self.is_loading || self.conversation.is_pending() {
            return Err(ChatError::Busy);
        }

        self.last_error = None;
        self.conversation.append_user_turn(query);
        self.conversation.append_placeholder_assistant_turn();
        self.is_loading = true;

        Ok(QueryRequest::new(query).with_session(self.session.get().map(str::to_string)))
    }

    fn end_request(&mut self, result: &ChatResult<()>) {
        self.is_loading = false;

        match result {
            Ok(()) => {
                let content = self
                    .conversation
                    .pending_turn()
                    .map(|turn| turn.content.clone())
                    .unwrap_or_default();
                self.conversation.finish_pending_turn();
                self.notify(ChatUpdate::Completed(content));
            }
            Err(e) => {
                tracing::warn!(
                    "Query failed [{} {}]: {}",
                    e.category(),
                    e.error_code(),
                    e
                );
                self.conversation.remove_last_turn();
                self.last_error = Some(GENERIC_FAILURE_MESSAGE.to_string());
                self.notify(ChatUpdate::Failed {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                    detail: e.user_message(),
                    retryable: e.is_retryable(),
                });
            }
        }
    }

    async fn run_stream(&mut self, request: &QueryRequest) -> ChatResult<()> {
        let mut lines = self.client.stream_query(request).await?;
        let mut stream = StreamState::new();

        self.conversation
            .update_last_assistant_turn(stream.compose_display());
        self.notify_content();

        while let Some(line) = lines.next().await {
            let line = line.map_err(|e| StreamError::ConnectionLost {
                message: e.to_string(),
            })?;

            let before = self.pending_content();
            let flow = StreamContext {
                stream: &mut stream,
                conversation: &mut self.conversation,
                session: &mut self.session,
            }
            .apply_line(&line)?;

            if flow == StreamFlow::Finished {
                return Ok(());
            }
            if self.pending_content() != before {
                self.notify_content();
            }
        }

        tracing::debug!("Stream closed without a done event");
        StreamContext {
            stream: &mut stream,
            conversation: &mut self.conversation,
            session: &mut self.session,
        }
        .finish_without_done();
        Ok(())
    }

    async fn run_legacy(&mut self, request: &QueryRequest) -> ChatResult<()> {
        let response = self.client.query(request).await?;

        if let Some(id) = response.session_id.as_deref() {
            self.session.update(id);
        }
        self.conversation
            .update_last_assistant_turn(response.display_text());
        Ok(())
    }

    /// Whether the backend answers its liveness probe.
    pub async fn health_check(&self) -> ChatResult<bool> {
        self.client.health_check().await
    }

    fn pending_content(&self) -> Option<String> {
        self.conversation
            .pending_turn()
            .map(|turn| turn.content.clone())
    }

    fn notify_content(&self) {
        if let Some(content) = self.pending_content() {
            self.notify(ChatUpdate::AssistantContent(content));
        }
    }

    fn notify(&self, update: ChatUpdate) {
        if let Some(tx) = &self.updates {
            // Receiver gone means nobody is rendering; keep going
            let _ = tx.send(update);
        }
    }
}
