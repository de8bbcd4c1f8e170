//! Deterministic mock oracle.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{Result, ScoutError};
use crate::traits::Oracle;

/// Mock oracle returning a queue of canned responses.
///
/// Responses are consumed in order; every prompt pair is recorded for
/// verification. Running out of responses is an oracle error, which keeps
/// tests honest about how many completions a flow performs.
#[derive(Default)]
pub struct MockOracle {
    responses: Arc<RwLock<VecDeque<String>>>,
    prompts: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push_back(response.into());
        self
    }

    /// Number of completions performed.
    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }

    /// Recorded (system, user) prompt pairs.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.read().unwrap().clone()
    }

    /// User prompt of the most recent completion.
    pub fn last_user_prompt(&self) -> Option<String> {
        self.prompts.read().unwrap().last().map(|(_, u)| u.clone())
    }
}

impl Clone for MockOracle {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            prompts: Arc::clone(&self.prompts),
        }
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.prompts
            .write()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        self.responses
            .write()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                ScoutError::Oracle(Box::new(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "mock oracle has no queued response",
                )))
            })
    }
}
