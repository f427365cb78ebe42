//! # Completion Gateway
//!
//! The remote service that turns a message list into a generated reply.
//! The [`CompletionGateway`] trait is the seam: the TUI talks to
//! `Arc<dyn CompletionGateway>`, production uses [`OpenRouterGateway`],
//! and tests substitute a stub.

use std::fmt;

use async_trait::async_trait;

pub mod openrouter;
mod types;

pub use openrouter::OpenRouterGateway;
pub use types::{ChatMessage, Role, Transcript, PENDING_REPLY};

/// Fixed sampling parameters sent with every request.
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

/// Errors that can occur while fetching a completion.
/// Each variant maps to exactly one user-visible assistant message; see
/// `core::action::error_reply`.
#[derive(Debug)]
pub enum GatewayError {
    /// Gateway misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The API answered with a non-success status.
    Http(u16),
    /// The response body was not parseable JSON.
    InvalidBody(String),
    /// Parseable body, but the `choices` array was empty.
    EmptyChoices,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Config(msg) => write!(f, "config error: {msg}"),
            GatewayError::Network(msg) => write!(f, "network error: {msg}"),
            GatewayError::Http(status) => write!(f, "API error (HTTP {status})"),
            GatewayError::InvalidBody(msg) => write!(f, "invalid response body: {msg}"),
            GatewayError::EmptyChoices => write!(f, "response contained no choices"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Everything a gateway needs to fulfill one completion request.
pub struct CompletionParams<'a> {
    /// System prompt plus full history, in order. Built by
    /// [`Transcript::for_gateway`]; never contains the placeholder.
    pub messages: &'a [ChatMessage],
    pub model: &'a str,
}

#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Returns the name of the gateway.
    fn name(&self) -> &str;

    /// Requests a single completion. Returns the first choice's message
    /// content (empty string when the choice carries no content).
    async fn complete(&self, params: CompletionParams<'_>) -> Result<String, GatewayError>;
}
