//! Data models for the OpenAI-compatible chat completion API.
//!
//! - `openai`: Inbound requests, chat messages and content blocks, and the
//!   borrowed body forwarded upstream.

pub mod openai;

pub use openai::{
    ChatCompletionRequest, ChatMessage, ContentBlock, ContentPart, ImageUrl, MessageContent,
    UpstreamChatRequest,
};
