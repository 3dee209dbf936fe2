//! Tool-calling agent loop
//!
//! The agent:
//! - Starts every run from a fresh conversation (system prompt + user message)
//! - Calls the LLM with the full history and the tool declarations
//! - Executes requested tool calls and appends one reply per call, in request order
//! - Loops until the model answers without tool calls, or the round cap is hit

mod error;

pub use error::AgentError;

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};

use crate::llm::core::{
    config::GenerationConfig,
    provider::LlmProvider,
    types::{
        FinishReason, GenerateRequest, Message, ToolCall, ToolChoice, ToolDeclaration,
        UsageMetadata,
    },
};
use crate::llm::tools::executor::ToolExecutor;

/// Default cap on tool-exchange rounds per run
pub const DEFAULT_MAX_ITERATIONS: usize = 8;

/// Append-only message history of a single run
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with an optional system prompt and the user's message
    pub fn new(system: Option<&str>, user_message: impl Into<String>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(user_message));
        Self { messages }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Outcome of a completed agent run
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Final assistant text, empty if the model returned none
    pub content: String,
    /// Number of tool-exchange rounds performed
    pub rounds: usize,
    /// Full history, ending with the final assistant message
    pub messages: Vec<Message>,
    /// Token usage summed over every model response
    pub usage: UsageMetadata,
    /// Why the final response stopped
    pub finish_reason: FinishReason,
}

/// Agent that drives an LLM through tool calls to a final answer
pub struct Agent {
    /// LLM provider
    provider: Arc<dyn LlmProvider>,

    /// Tool executor for handling function calls
    tool_executor: Arc<dyn ToolExecutor>,

    /// Tool declarations available to the LLM
    tool_declarations: Vec<ToolDeclaration>,

    /// Generation configuration (temperature, max_tokens, etc.)
    config: GenerationConfig,

    /// System prompt (optional)
    system: Option<String>,

    /// Maximum number of tool rounds per run (default: 8)
    max_iterations: usize,

    /// Execute the calls of one round concurrently
    parallel_tool_calls: bool,
}

impl Agent {
    /// Create a new agent with default settings
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tool_executor: Arc<dyn ToolExecutor>,
        tool_declarations: Vec<ToolDeclaration>,
        config: GenerationConfig,
        system: Option<String>,
    ) -> Self {
        Self {
            provider,
            tool_executor,
            tool_declarations,
            config,
            system,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel_tool_calls: false,
        }
    }

    /// Set the maximum number of tool rounds (default: 8)
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the calls of a round concurrently; replies keep request order
    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = parallel;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Process a user message through the agent loop
    ///
    /// Tool failures are fed back to the model as `{"error": ...}` content and
    /// never end the run. Only LLM failures and the round cap do.
    pub async fn run(&self, user_message: impl Into<String>) -> Result<AgentRun, AgentError> {
        let mut conversation = Conversation::new(self.system.as_deref(), user_message);
        let mut usage = UsageMetadata::default();
        let mut rounds = 0;

        loop {
            let request = self.build_request(&conversation);
            let response = self.provider.generate(request).await?;
            if let Some(response_usage) = &response.usage {
                usage.add(response_usage);
            }

            let message = response.message;
            if !message.has_tool_calls() {
                if response.finish_reason == FinishReason::MaxTokens {
                    tracing::warn!(rounds, "Final answer was cut off by the token limit");
                }

                let content = message.text_content().unwrap_or_default();
                conversation.push(message);
                tracing::info!(
                    rounds,
                    total_tokens = usage.total_tokens,
                    "Agent run completed"
                );

                return Ok(AgentRun {
                    content,
                    rounds,
                    messages: conversation.into_messages(),
                    usage,
                    finish_reason: response.finish_reason,
                });
            }

            if rounds >= self.max_iterations {
                tracing::warn!(
                    max_iterations = self.max_iterations,
                    "Model still requesting tools at the round cap"
                );
                return Err(AgentError::MaxIterationsExceeded(self.max_iterations));
            }
            rounds += 1;

            let calls: Vec<ToolCall> = message.tool_calls().into_iter().cloned().collect();
            tracing::debug!(round = rounds, calls = calls.len(), "Executing tool calls");
            conversation.push(Message::assistant_tool_calls(calls.clone()));

            let outcomes = self.execute_round(&calls).await;
            for (call, outcome) in calls.iter().zip(outcomes) {
                let reply = match outcome {
                    Ok(result) => Message::tool_result(&call.id, &call.name, result.to_string()),
                    Err(error) => Message::tool_error(
                        &call.id,
                        &call.name,
                        json!({ "error": error }).to_string(),
                    ),
                };
                conversation.push(reply);
            }
        }
    }

    fn build_request(&self, conversation: &Conversation) -> GenerateRequest {
        let has_tools = !self.tool_declarations.is_empty();
        GenerateRequest {
            messages: conversation.messages().to_vec(),
            tools: has_tools.then(|| self.tool_declarations.clone()),
            tool_choice: has_tools.then_some(ToolChoice::Auto),
            config: self.config.clone(),
        }
    }

    /// Execute one round's calls; outcomes are returned in request order
    async fn execute_round(&self, calls: &[ToolCall]) -> Vec<Result<Value, String>> {
        if self.parallel_tool_calls {
            return join_all(calls.iter().map(|call| self.execute_call(call))).await;
        }

        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            outcomes.push(self.execute_call(call).await);
        }
        outcomes
    }

    async fn execute_call(&self, call: &ToolCall) -> Result<Value, String> {
        let outcome = self.tool_executor.execute(call).await;
        match &outcome {
            Ok(_) => tracing::debug!(tool_call_id = %call.id, name = %call.name, "Tool call succeeded"),
            Err(error) => tracing::warn!(
                tool_call_id = %call.id,
                name = %call.name,
                error = %error,
                "Tool call failed"
            ),
        }
        outcome
    }
}
