mod message;
mod request;

pub use message::{ChatTurn, MessageRole};
pub use request::{LegacyQueryResponse, QueryRequest};
