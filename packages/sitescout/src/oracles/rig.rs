//! Live oracle implementation over rig.
//!
//! Infrastructure only: what to prompt for lives with the orchestrators.

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::providers::anthropic;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, ScoutError};
use crate::traits::Oracle;
use crate::types::config::ScoutConfig;

/// Anthropic-backed oracle.
pub struct RigOracle {
    client: anthropic::Client,
    model: String,
    max_tokens: u64,
}

impl RigOracle {
    /// Create an oracle with an explicit API key.
    pub fn new(api_key: SecretString, config: &ScoutConfig) -> Self {
        let client = anthropic::ClientBuilder::new(api_key.expose_secret()).build();
        Self {
            client,
            model: config.model_name.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Create an oracle from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env(config: &ScoutConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| ScoutError::Config {
            reason: "ANTHROPIC_API_KEY environment variable not set".to_string(),
        })?;
        Ok(Self::new(SecretString::from(api_key), config))
    }
}

#[async_trait]
impl Oracle for RigOracle {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            prompt_length = user.len(),
            "building agent for completion"
        );

        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .max_tokens(self.max_tokens)
            .build();

        let response = agent
            .prompt(user)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.model, "oracle call failed");
                ScoutError::Oracle(Box::new(e))
            })?;

        tracing::debug!(response_length = response.len(), "oracle response received");
        Ok(response)
    }
}
