//! Trait abstractions at the network seam.
//!
//! - [`HttpClient`] - GET, POST and streaming POST

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
