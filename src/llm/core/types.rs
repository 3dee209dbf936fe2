//! Core types for the LLM abstraction layer

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;

/// Request to generate content from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation history, system prompt included
    pub messages: Vec<Message>,
    /// Available tools the model can call
    pub tools: Option<Vec<ToolDeclaration>>,
    /// How the model may pick tools
    pub tool_choice: Option<ToolChoice>,
    /// Generation parameters
    pub config: GenerationConfig,
}

/// Complete (non-streaming) response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The assistant message, possibly carrying tool calls
    pub message: Message,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Token usage, when the provider reports it
    pub usage: Option<UsageMetadata>,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content blocks in the message
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self::text(MessageRole::System, text)
    }

    /// Create a new user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::text(MessageRole::User, text)
    }

    /// Create a new assistant message with text content
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(MessageRole::Assistant, text)
    }

    /// Create an assistant message that only requests tool calls
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: calls.into_iter().map(ContentBlock::ToolCall).collect(),
        }
    }

    /// Create a new tool message with a tool result
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::tool(tool_call_id, name, content, false)
    }

    /// Create a new tool message with an error result
    pub fn tool_error(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::tool(tool_call_id, name, error, true)
    }

    fn text(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self {
            role: MessageRole::Tool,
            content: vec![ContentBlock::ToolResult {
                tool_call_id: tool_call_id.into(),
                name: name.into(),
                content: content.into(),
                is_error,
            }],
        }
    }

    /// Concatenated text blocks, or `None` when the message has no text
    pub fn text_content(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// Tool calls requested by this message, in order
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolCall(_)))
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions for the model
    System,
    /// Human input
    User,
    /// Model output
    Assistant,
    /// Tool execution result
    Tool,
}

/// Content block within a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// Model requesting a tool call
    ToolCall(ToolCall),
    /// Tool execution result
    ToolResult {
        tool_call_id: String,
        name: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

/// A function call requested by the model
///
/// `arguments` is kept as the raw JSON text the model produced; it may be
/// malformed and is parsed only by whoever executes the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Declaration of a tool available to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Function name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema for parameters
    pub input_schema: serde_json::Value,
}

/// How the model may choose tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// Model decides
    Auto,
}

/// Reason why generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Hit token limit
    MaxTokens,
    /// Waiting for tool execution
    ToolUse,
    /// Provider-specific reason
    Other(String),
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens consumed
    pub input_tokens: u32,
    /// Response tokens generated
    pub output_tokens: u32,
    /// Sum of input and output
    pub total_tokens: u32,
}

impl UsageMetadata {
    /// Create new usage metadata
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// Add usage from another metadata
    pub fn add(&mut self, other: &UsageMetadata) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.total_tokens = self.input_tokens + self.output_tokens;
    }
}
