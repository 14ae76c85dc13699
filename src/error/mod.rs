//! Error handling for the chat client.
//!
//! - **Categories**: [`ErrorCategory`] groups failures in logs
//! - **Domain errors**: [`NetworkError`] for transport, [`StreamError`] for the event stream
//! - **Unified error**: [`ChatError`] with user messages and log codes
//!
//! | Failure | Variant | Retryable |
//! |---------|---------|-----------|
//! | Connection refused, timeout | `Network` | Yes |
//! | Non-2xx status | `Network(HttpStatus)` | 5xx only |
//! | `error` event from backend | `Stream(BackendError)` | Yes |
//! | Connection drop mid-stream | `Stream(ConnectionLost)` | Yes |
//! | Submit while loading | `Busy` | No |

mod category;
mod chat_error;
mod network;
mod result;
mod stream;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use network::NetworkError;
pub use result::ChatResult;
pub use stream::StreamError;
