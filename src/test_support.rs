//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::gateway::{CompletionGateway, CompletionParams, GatewayError};

/// A gateway that replays canned outcomes, for tests that don't need real
/// API calls. Falls back to an empty reply when the queue runs dry.
pub struct StubGateway {
    outcomes: Mutex<VecDeque<Result<String, GatewayError>>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_outcomes(outcomes: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionGateway for StubGateway {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _params: CompletionParams<'_>) -> Result<String, GatewayError> {
        self.outcomes
            .lock()
            .expect("stub outcomes poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        model_name: "test-model".to_string(),
        system_prompt: "test prompt".to_string(),
        pomodoro_seconds: 1500,
        api_key: None,
        base_url: None,
    }
}

/// Creates a test App with a StubGateway and no conversation store.
pub fn test_app() -> App {
    App::new(Arc::new(StubGateway::new()), None, &test_config())
}
