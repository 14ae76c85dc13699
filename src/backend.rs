//! Recommendation backend API client.
//!
//! Wraps an [`HttpClient`] with the backend's endpoints:
//! - `POST /query/stream` - server-sent event stream of graph progress
//! - `POST /query` - legacy synchronous answer
//! - `GET /` - liveness probe

use crate::adapters::ReqwestHttpClient;
use crate::error::{ChatResult, NetworkError};
use crate::models::{LegacyQueryResponse, QueryRequest};
use crate::sse::{decode_lines, DataLineStream};
use crate::traits::{Headers, HttpClient};

/// Client for the recommendation backend.
pub struct BackendClient<C: HttpClient = ReqwestHttpClient> {
    /// Base URL without trailing slash
    pub base_url: String,
    http: C,
}

impl BackendClient<ReqwestHttpClient> {
    /// Client using reqwest against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, ReqwestHttpClient::new())
    }
}

impl<C: HttpClient> BackendClient<C> {
    pub fn with_http_client(base_url: impl Into<String>, http: C) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn stream_url(&self) -> String {
        format!("{}/query/stream", self.base_url)
    }

    pub fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }

    /// Open the event stream for `request`.
    ///
    /// Returns complete `data:` lines in arrival order. A non-2xx status or
    /// a connection failure is an error here, before any line is yielded.
    pub async fn stream_query(&self, request: &QueryRequest) -> ChatResult<DataLineStream> {
        let url = self.stream_url();
        let body = serde_json::to_string(request)?;

        let mut headers = json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        let bytes = self
            .http
            .post_stream(&url, &body, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))?;

        Ok(decode_lines(bytes))
    }

    /// Ask the legacy synchronous endpoint.
    pub async fn query(&self, request: &QueryRequest) -> ChatResult<LegacyQueryResponse> {
        let url = self.query_url();
        let body = serde_json::to_string(request)?;

        let mut headers = json_headers();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let response = self
            .http
            .post(&url, &body, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))?;

        if !response.is_success() {
            return Err(NetworkError::HttpStatus {
                status: response.status,
                message: response.text(),
            }
            .into());
        }

        Ok(LegacyQueryResponse::from_body(&response.text())?)
    }

    /// Whether `GET /` answers with a 2xx status.
    pub async fn health_check(&self) -> ChatResult<bool> {
        let url = format!("{}/", self.base_url);
        let response = self
            .http
            .get(&url, &Headers::new())
            .await
            .map_err(|e| NetworkError::from_http(e, &url))?;
        Ok(response.is_success())
    }
}

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockHttpClient, MockResponse};
    use crate::error::ChatError;
    use crate::traits::{HttpError, Response};
    use futures_util::StreamExt;

    const BASE: &str = "http://mock:8000";

    fn client() -> BackendClient<MockHttpClient> {
        BackendClient::with_http_client(BASE, MockHttpClient::new())
    }

    #[test]
    fn test_urls() {
        let client = BackendClient::with_base_url("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
        assert_eq!(client.stream_url(), "http://localhost:8000/query/stream");
        assert_eq!(client.query_url(), "http://localhost:8000/query");
    }

    #[tokio::test]
    async fn test_stream_query_sends_body_and_headers() {
        let client = client();
        client.http().set_response(
            &client.stream_url(),
            MockResponse::chunks(["data: {\"type\":\"done\"}\n\n"]),
        );

        let request = QueryRequest::new("맛집").with_session(Some("s-1".to_string()));
        let lines: Vec<_> = client.stream_query(&request).await.unwrap().collect().await;
        assert_eq!(lines.len(), 1);

        let recorded = &client.http().get_requests()[0];
        assert_eq!(recorded.url, "http://mock:8000/query/stream");
        assert_eq!(
            recorded.headers.get("Accept").map(String::as_str),
            Some("text/event-stream")
        );
        assert_eq!(
            recorded.json_body().unwrap(),
            serde_json::json!({"user_query": "맛집", "session_id": "s-1"})
        );
    }

    #[tokio::test]
    async fn test_stream_query_server_error() {
        let client = client();
        client.http().set_response(
            &client.stream_url(),
            MockResponse::Error(HttpError::ServerError {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        let result = client.stream_query(&QueryRequest::new("q")).await;
        assert!(matches!(
            result,
            Err(ChatError::Network(NetworkError::HttpStatus { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_query_legacy_success() {
        let client = client();
        client.http().set_response(
            &client.query_url(),
            MockResponse::Success(Response::new(
                200,
                r#"{"answer":"추천: A식당","session_id":"session-1"}"#,
            )),
        );

        let response = client.query(&QueryRequest::new("q")).await.unwrap();
        assert_eq!(response.display_text(), "추천: A식당");
        assert_eq!(response.session_id.as_deref(), Some("session-1"));
    }

    #[tokio::test]
    async fn test_query_legacy_non_success_status() {
        let client = client();
        client.http().set_response(
            &client.query_url(),
            MockResponse::Success(Response::new(422, "bad")),
        );

        let result = client.query(&QueryRequest::new("q")).await;
        assert!(matches!(
            result,
            Err(ChatError::Network(NetworkError::HttpStatus { status: 422, .. }))
        ));
    }

    #[tokio::test]
    async fn test_query_legacy_invalid_json() {
        let client = client();
        client.http().set_response(
            &client.query_url(),
            MockResponse::Success(Response::new(200, "<html>")),
        );

        let result = client.query(&QueryRequest::new("q")).await;
        assert!(matches!(
            result,
            Err(ChatError::Network(NetworkError::InvalidResponse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_health_check() {
        let client = client();
        client.http().set_response(
            "http://mock:8000/",
            MockResponse::Success(Response::new(200, r#"{"message":"ok"}"#)),
        );
        assert!(client.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let client = BackendClient::with_base_url("http://127.0.0.1:1");
        assert!(client.health_check().await.is_err());
    }
}
