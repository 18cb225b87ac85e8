//! Error types for the RPC client.
//!
//! # Design
//! Failures fall into three kinds that callers handle differently:
//! - `Transport`: the exchange never completed (connect, I/O, deadline).
//! - `Rpc`: the server answered with a status of 300 or above. The body is
//!   classified into an [`RpcError`] on a best-effort basis.
//! - `Decode`: the server claimed success but the body was not JSON.
//!
//! `Encode` and `Config` cover the two local failures that happen before
//! anything is sent.

use serde::Deserialize;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by `RpcClient` calls.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("decoding response failed: {0}")]
    Decode(String),

    #[error("encoding request failed: {0}")]
    Encode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn is_rpc(&self) -> bool {
        matches!(self, Error::Rpc(_))
    }

    /// The HTTP status of an RPC failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Rpc(e) => Some(e.status()),
            _ => None,
        }
    }

    /// The wire error type of an RPC failure, when the server sent one.
    pub fn rpc_kind(&self) -> Option<&str> {
        match self {
            Error::Rpc(e) => e.kind(),
            _ => None,
        }
    }
}

/// The network exchange could not complete.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("i/o error: {0}")]
    Io(String),
}

/// An application-level failure reported by the server.
///
/// Only [`RpcError::classify`] builds these. When the body carried both a
/// `type` and a `message`, `kind` and `message` hold them. Otherwise `kind` is
/// `None` and `message` holds a status-derived text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    status: u16,
    kind: Option<String>,
    message: Option<String>,
}

/// Wire shape of an error body.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl RpcError {
    /// Classify a failed response. Never fails: a body that is not a
    /// well-formed `{"type", "message"}` object degrades to a status-only
    /// error.
    pub fn classify(status: u16, status_text: &str, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { kind, message }) => Self {
                status,
                kind: Some(kind),
                message: Some(message),
            },
            Err(_) => Self {
                status,
                kind: None,
                message: Some(default_message(status, status_text)),
            },
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

fn default_message(status: u16, status_text: &str) -> String {
    let text = status_text.trim();
    if text.is_empty() {
        format!("{status} response")
    } else {
        text.to_string()
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message.as_deref().unwrap_or_default();
        match &self.kind {
            Some(kind) => write!(f, "{} {kind}: {message}", self.status),
            None => write!(f, "{}: {message}", self.status),
        }
    }
}

impl std::error::Error for RpcError {}
