//! Error types for the solver channel.
//!
//! Editing operations never fail; only the conversation with the external
//! solver has error cases, and none of them are fatal to the editor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    /// An inbound message did not have the `{type, payload}` shape.
    #[error("malformed solver message: {0}")]
    Malformed(String),

    #[error("invalid solver parameters: {0}")]
    InvalidParams(String),

    /// The background connection task is gone.
    #[error("solver channel closed")]
    ChannelClosed,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid solver url: {0}")]
    Url(#[from] url::ParseError),

    #[error("solver url must use ws:// or wss://, got {0}://")]
    UnsupportedScheme(String),

    /// The channel needs a tokio runtime to host its connection task.
    #[error("no tokio runtime available to run the solver channel")]
    NoRuntime,
}

pub type SolverResult<T> = std::result::Result<T, SolverError>;
