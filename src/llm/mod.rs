mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;

use crate::error::ExtractError;
use async_trait::async_trait;

/// A chat-capable language model endpoint.
///
/// Implementations map their own transport failures to
/// `ExtractError::UpstreamUnavailable`; the wall-clock timeout is enforced
/// by the caller (see the pipeline's bounded-wait dispatch), not here.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier sent with each request (e.g. "llama2:13b-chat-q4_0")
    fn model_id(&self) -> &str;

    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ExtractError>;
}
