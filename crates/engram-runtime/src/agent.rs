//! The Engram agent: a thin orchestrator over the memory store and one
//! LLM driver.
//!
//! Each turn either handles a memory command directly (no LLM call) or
//! builds a context block from memory, runs a single completion, and
//! records the exchange. Driver failures become a user-visible error
//! string; they are not retried and do not crash the process.

use engram_memory::MemoryStore;
use engram_types::config::EngramConfig;
use engram_types::error::{EngramError, EngramResult};
use tracing::{debug, warn};

use crate::command::Command;
use crate::llm_driver::{ChatMessage, CompletionRequest, LlmDriver};

/// Fixed system prompt for every LLM turn.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant with memory capabilities. \
You can remember past interactions, facts you've learned, and procedures you know. \
Use the provided context to give personalized, contextually relevant responses. \
If you don't have relevant memory information, you can draw on your general knowledge. \
Always be helpful, accurate, and conversational.";

/// Completion parameters carried from configuration.
#[derive(Debug, Clone)]
struct CompletionSettings {
    model: String,
    temperature: f64,
    max_tokens: u32,
}

/// Conversational agent with memory.
pub struct Agent {
    memory: MemoryStore,
    driver: Box<dyn LlmDriver>,
    settings: CompletionSettings,
}

impl Agent {
    /// Create an agent over an opened store and a driver, with completion
    /// parameters taken from config.
    pub fn new(memory: MemoryStore, driver: Box<dyn LlmDriver>, config: &EngramConfig) -> Self {
        Self {
            memory,
            driver,
            settings: CompletionSettings {
                model: config.model.clone(),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
        }
    }

    /// Process one user message and produce the agent's reply.
    ///
    /// Memory commands are handled without touching the LLM. A malformed
    /// procedure command yields a usage hint, not an error. Storage write
    /// failures are the only `Err` this returns.
    pub async fn handle(&mut self, user_message: &str) -> EngramResult<String> {
        match Command::parse(user_message) {
            Ok(Command::Remember(fact)) => self.learn_fact(&fact, None),
            Ok(Command::RememberProcedure { name, steps }) => {
                self.learn_procedure(&name, steps, None)
            }
            Err(EngramError::CommandParse(hint)) => Ok(hint),
            Err(other) => Err(other),
            Ok(Command::Query(query)) => self.query(&query).await,
        }
    }

    /// Add a fact to semantic memory, returning the confirmation text.
    pub fn learn_fact(&mut self, fact: &str, category: Option<String>) -> EngramResult<String> {
        self.memory.add_fact(fact, category)?;
        Ok(format!("I've learned this fact: {fact}"))
    }

    /// Add a procedure to procedural memory, returning the confirmation text.
    pub fn learn_procedure(
        &mut self,
        name: &str,
        steps: Vec<String>,
        description: Option<String>,
    ) -> EngramResult<String> {
        self.memory.add_procedure(name, steps, description)?;
        Ok(format!("I've learned the procedure: {name}"))
    }

    /// Run a plain query: context from memory, one completion, record the
    /// turn on success.
    async fn query(&mut self, user_message: &str) -> EngramResult<String> {
        let context = self.memory.generate_context_for_llm(user_message);

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::system(format!("Context from memory:\n{context}")),
                ChatMessage::user(user_message),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        match self.driver.complete(request).await {
            Ok(response) => {
                debug!(chars = response.text.len(), "LLM turn completed");
                self.memory
                    .add_conversation(user_message, &response.text, None)?;
                Ok(response.text)
            }
            Err(e) => {
                // The failed turn is NOT recorded in episodic memory.
                warn!(error = %e, "LLM request failed");
                Ok(format!("Error: API request failed: {e}"))
            }
        }
    }

    /// Read access to the underlying store.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_driver::{CompletionResponse, LlmError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted driver: returns a fixed reply or a fixed error, counting calls.
    struct ScriptedDriver {
        reply: Result<String, ()>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmDriver for ScriptedDriver {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse { text: text.clone() }),
                Err(()) => Err(LlmError::Api {
                    status: 429,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    fn agent_with(
        dir: &std::path::Path,
        reply: Result<String, ()>,
    ) -> (Agent, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let driver = ScriptedDriver {
            reply,
            calls: calls.clone(),
        };
        let memory = MemoryStore::open(dir).unwrap();
        let agent = Agent::new(memory, Box::new(driver), &EngramConfig::default());
        (agent, calls)
    }

    #[tokio::test]
    async fn test_query_records_conversation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agent, calls) = agent_with(dir.path(), Ok("Noted!".to_string()));

        let reply = agent.handle("I like tea").await.unwrap();
        assert_eq!(reply, "Noted!");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(agent.memory().conversations().len(), 1);
        assert_eq!(agent.memory().conversations()[0].user_message, "I like tea");
    }

    #[tokio::test]
    async fn test_remember_fact_skips_llm() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agent, calls) = agent_with(dir.path(), Ok("unused".to_string()));

        let reply = agent.handle("remember that I like tea").await.unwrap();
        assert_eq!(reply, "I've learned this fact: I like tea");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(agent.memory().facts().len(), 1);
        assert!(agent.memory().conversations().is_empty());
    }

    #[tokio::test]
    async fn test_remember_procedure_skips_llm() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agent, calls) = agent_with(dir.path(), Ok("unused".to_string()));

        let reply = agent
            .handle("remember the steps for Brew Tea: boil, steep, pour")
            .await
            .unwrap();
        assert_eq!(reply, "I've learned the procedure: Brew Tea");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(agent.memory().procedures().len(), 1);
        assert_eq!(
            agent.memory().procedures()["Brew Tea"].steps,
            vec!["boil".to_string(), "steep".to_string(), "pour".to_string()]
        );
    }

    #[tokio::test]
    async fn test_malformed_procedure_returns_hint_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agent, calls) = agent_with(dir.path(), Ok("unused".to_string()));

        let reply = agent
            .handle("remember the steps for Brew Tea boil steep")
            .await
            .unwrap();
        assert!(reply.contains("couldn't parse the procedure"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(agent.memory().procedures().is_empty());
        assert!(agent.memory().facts().is_empty());
    }

    #[tokio::test]
    async fn test_driver_failure_returns_error_text_and_skips_recording() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agent, calls) = agent_with(dir.path(), Err(()));

        let reply = agent.handle("hello there").await.unwrap();
        assert!(reply.starts_with("Error: API request failed:"));
        assert!(reply.contains("quota exceeded"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Failed turns are not recorded anywhere
        assert!(agent.memory().conversations().is_empty());
        assert!(agent.memory().working_memory().is_empty());
    }

    #[tokio::test]
    async fn test_context_reaches_later_turns() {
        let dir = tempfile::tempdir().unwrap();
        let (mut agent, _calls) = agent_with(dir.path(), Ok("ok".to_string()));

        agent.handle("remember that I like tea").await.unwrap();
        agent.handle("what do I like?").await.unwrap();

        // The learned fact is in the store and would be matched into context
        let context = agent.memory().generate_context_for_llm("tea");
        assert!(context.contains("- I like tea"));
    }
}
