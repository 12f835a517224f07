//! Conversational agent client used by the query front end.

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::ResponseStream;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by agent backends.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The invocation request failed.
    #[error("{0}")]
    Invocation(String),
    /// The response stream broke before completion.
    #[error("response stream failed: {0}")]
    Stream(String),
}

/// Interface implemented by conversational agent backends.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send `query` verbatim and return the full answer text.
    async fn invoke(&self, query: &str) -> Result<String, AgentError>;
}

/// Identifies the agent and alias to invoke.
#[derive(Debug, Clone)]
pub struct AgentTarget {
    /// Agent identifier.
    pub agent_id: String,
    /// Alias identifier.
    pub agent_alias_id: String,
}

/// Bedrock Agents runtime client.
///
/// Every call opens a fresh session; no conversation state carries over between queries.
#[derive(Clone)]
pub struct BedrockAgentClient {
    client: Client,
    target: AgentTarget,
}

impl BedrockAgentClient {
    /// Wrap an SDK client for the given agent.
    pub fn new(client: Client, target: AgentTarget) -> Self {
        Self { client, target }
    }

    /// Build a client from a loaded AWS configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig, target: AgentTarget) -> Self {
        Self::new(Client::new(sdk_config), target)
    }
}

#[async_trait]
impl AgentClient for BedrockAgentClient {
    async fn invoke(&self, query: &str) -> Result<String, AgentError> {
        let session_id = Uuid::new_v4().to_string();
        tracing::debug!(
            agent = %self.target.agent_id,
            alias = %self.target.agent_alias_id,
            session = %session_id,
            chars = query.chars().count(),
            "Invoking agent"
        );

        let mut output = self
            .client
            .invoke_agent()
            .agent_id(&self.target.agent_id)
            .agent_alias_id(&self.target.agent_alias_id)
            .session_id(&session_id)
            .input_text(query)
            .send()
            .await
            .map_err(|err| AgentError::Invocation(DisplayErrorContext(&err).to_string()))?;

        let mut chunks: Vec<Vec<u8>> = Vec::new();
        while let Some(event) = output
            .completion
            .recv()
            .await
            .map_err(|err| AgentError::Stream(DisplayErrorContext(&err).to_string()))?
        {
            if let ResponseStream::Chunk(part) = event
                && let Some(bytes) = part.bytes()
            {
                chunks.push(bytes.as_ref().to_vec());
            }
        }
        let answer = join_chunks(&chunks);

        tracing::debug!(session = %session_id, chars = answer.chars().count(), "Agent answered");
        Ok(answer)
    }
}

/// Decode streamed chunks as one UTF-8 text; characters may straddle chunk boundaries.
fn join_chunks<B: AsRef<[u8]>>(chunks: &[B]) -> String {
    let bytes: Vec<u8> = chunks
        .iter()
        .flat_map(|chunk| chunk.as_ref().iter().copied())
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Render an agent result as display text; failures become `Error: <message>`.
pub fn answer_or_error(result: Result<String, AgentError>) -> String {
    match result {
        Ok(answer) => answer,
        Err(error) => format!("Error: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_answer_is_returned_verbatim() {
        assert_eq!(answer_or_error(Ok("Use multiple AZs.".into())), "Use multiple AZs.");
        assert_eq!(answer_or_error(Ok(String::new())), "");
    }

    #[test]
    fn multibyte_character_split_across_chunks_survives() {
        let chunks: [&[u8]; 3] = [b"caf", b"\xC3", b"\xA9 au lait"];
        assert_eq!(join_chunks(&chunks), "café au lait");
        assert_eq!(join_chunks::<Vec<u8>>(&[]), "");
    }

    #[test]
    fn failures_render_as_error_text() {
        let text = answer_or_error(Err(AgentError::Invocation("AccessDeniedException".into())));
        assert_eq!(text, "Error: AccessDeniedException");

        let text = answer_or_error(Err(AgentError::Stream("connection reset".into())));
        assert_eq!(text, "Error: response stream failed: connection reset");
    }
}
