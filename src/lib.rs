//! Matjip - a streaming chat client for the restaurant recommendation backend
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod state;
pub mod traits;
