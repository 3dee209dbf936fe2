//! LLM Abstraction Layer
//!
//! This module provides a provider-neutral interface for function-calling chat
//! models, an OpenAI-compatible client (DeepSeek by default), and the agent
//! loop that mediates between the model and the tool registry.

pub mod agent;
pub mod core;
pub mod openai;
pub mod tools;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_provider, LlmProvider},
    types::{
        ContentBlock, FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole,
        ToolCall, ToolChoice, ToolDeclaration, UsageMetadata,
    },
};

pub use agent::{Agent, AgentError, AgentRun, Conversation, DEFAULT_MAX_ITERATIONS};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use tools::{meta_tool_catalog, MetaToolExecutor, ToolExecutor};
