//! OpenRouter implementation of the brand classifier.
//!
//! # Example
//!
//! ```rust,ignore
//! use extraction::classifiers::OpenRouterClassifier;
//!
//! let classifier = OpenRouterClassifier::from_env()?
//!     .with_model("google/gemini-flash-1.5");
//! ```

use async_trait::async_trait;
use openrouter_client::{ChatRequest, Message, OpenRouterClient};
use tracing::debug;

use crate::error::{Error, Result};
use crate::pipeline::prompts::format_classify_prompt;
use crate::traits::classifier::BrandClassifier;
use crate::types::{ClassificationAnswer, ClassificationRequest};

/// Default model used for brand analysis.
pub const DEFAULT_MODEL: &str = "google/gemini-pro-1.5";

/// Brand classifier backed by OpenRouter chat completions.
///
/// Requests JSON-object responses, but still parses defensively since
/// models occasionally wrap the payload in a markdown code fence.
#[derive(Clone)]
pub struct OpenRouterClassifier {
    client: OpenRouterClient,
    model: String,
}

impl OpenRouterClassifier {
    /// Create a classifier over an existing client.
    pub fn new(client: OpenRouterClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from the `OPENROUTER_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let client =
            OpenRouterClient::from_env().map_err(|e| Error::Classification(Box::new(e)))?;
        Ok(Self::new(client))
    }

    /// Set the model (default: google/gemini-pro-1.5).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl BrandClassifier for OpenRouterClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassificationAnswer> {
        let prompt = format_classify_prompt(&request.document_url, &request.available_tags);

        let chat = ChatRequest::new(&self.model)
            .message(Message::user(prompt))
            .json_object();

        let response = self
            .client
            .chat_completion(chat)
            .await
            .map_err(|e| Error::Classification(Box::new(e)))?;

        debug!(model = %self.model, "received classification answer");
        parse_answer(&response.content)
    }
}

/// Parse the model's answer, tolerating a markdown code fence.
fn parse_answer(content: &str) -> Result<ClassificationAnswer> {
    serde_json::from_str(content)
        .or_else(|_| {
            let json_str = content
                .trim()
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim();
            serde_json::from_str(json_str)
        })
        .map_err(|e| Error::Classification(format!("failed to parse model answer: {}", e).into()))
}
