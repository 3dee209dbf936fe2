//! OpenAI-compatible provider implementation
//!
//! This module provides a client for chat-completions APIs that support
//! function calling, such as DeepSeek and OpenAI.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
