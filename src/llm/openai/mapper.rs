//! Mapping between abstraction types and chat-completions types

use serde_json::{json, Value};

use crate::llm::core::error::LlmError;
use crate::llm::core::types::{
    ContentBlock, FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole,
    ToolCall, ToolChoice, ToolDeclaration, UsageMetadata,
};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatFunction, ChatFunctionCall, ChatMessage,
    ChatTool, ChatToolCall, ChatUsage,
};

/// Convert our abstraction request to a chat-completions request
pub fn to_chat_request(model: &str, request: GenerateRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request.messages.into_iter().map(to_chat_message).collect(),
        tools: request
            .tools
            .map(|tools| tools.into_iter().map(to_chat_tool).collect()),
        tool_choice: request.tool_choice.map(to_tool_choice),
        temperature: request.config.temperature,
        max_tokens: request.config.max_tokens,
        stream: false,
    }
}

fn role_str(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    }
}

/// Convert our Message to a chat message
///
/// A tool message carries exactly one result; the first result block wins.
fn to_chat_message(message: Message) -> ChatMessage {
    let role = role_str(message.role).to_string();

    if message.role == MessageRole::Tool {
        for block in message.content {
            if let ContentBlock::ToolResult {
                tool_call_id,
                name,
                content,
                ..
            } = block
            {
                return ChatMessage {
                    role,
                    content: Some(content),
                    tool_calls: None,
                    tool_call_id: Some(tool_call_id),
                    name: Some(name),
                };
            }
        }
        return ChatMessage {
            role,
            content: None,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        };
    }

    let content = message.text_content();
    let tool_calls: Vec<ChatToolCall> = message
        .tool_calls()
        .into_iter()
        .map(|call| ChatToolCall {
            id: call.id.clone(),
            call_type: "function".to_string(),
            function: ChatFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        })
        .collect();

    ChatMessage {
        role,
        content,
        tool_calls: if tool_calls.is_empty() {
            None
        } else {
            Some(tool_calls)
        },
        tool_call_id: None,
        name: None,
    }
}

fn to_chat_tool(tool: ToolDeclaration) -> ChatTool {
    ChatTool {
        tool_type: "function".to_string(),
        function: ChatFunction {
            name: tool.name,
            description: tool.description,
            parameters: tool.input_schema,
        },
    }
}

fn to_tool_choice(choice: ToolChoice) -> Value {
    match choice {
        ToolChoice::Auto => json!("auto"),
    }
}

/// Convert a chat-completions response into our abstraction response
pub fn from_chat_response(response: ChatCompletionResponse) -> Result<GenerateResponse, LlmError> {
    let usage = response.usage.map(from_chat_usage);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|text| !text.is_empty()) {
        content.push(ContentBlock::Text { text });
    }
    for call in choice.message.tool_calls.unwrap_or_default() {
        content.push(ContentBlock::ToolCall(ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        }));
    }

    Ok(GenerateResponse {
        message: Message {
            role: MessageRole::Assistant,
            content,
        },
        finish_reason: from_finish_reason(choice.finish_reason.as_deref()),
        usage,
    })
}

fn from_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        None | Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::MaxTokens,
        Some("tool_calls") | Some("function_call") => FinishReason::ToolUse,
        Some(other) => FinishReason::Other(other.to_string()),
    }
}

fn from_chat_usage(usage: ChatUsage) -> UsageMetadata {
    UsageMetadata::new(usage.prompt_tokens, usage.completion_tokens)
}
