//! OpenAI Chat Completions type definitions.
//!
//! Only the parts of a request the relay rewrites are modelled: the message
//! list and the content of each message. Everything else travels in
//! `#[serde(flatten)]` maps so that unknown fields reach the backend untouched.

use crate::vision::ImageDescriptor;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Inbound chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Conversation so far. `null` or a missing field is an empty conversation.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<ChatMessage>,

    /// Every other top-level field (`model`, `stream`, sampling parameters,
    /// `images`, `allImages`, ...), forwarded as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    /// The model the caller asked for, when it is set to a truthy value.
    pub fn model(&self) -> Option<&Value> {
        self.extra.get("model").filter(|model| is_truthy(model))
    }

    /// Whether the caller asked for a streamed response. Any truthy `stream`
    /// value counts, so `1` and `"yes"` stream as well as `true`.
    pub fn stream(&self) -> bool {
        self.extra.get("stream").is_some_and(is_truthy)
    }

    /// Image descriptors from `images`, falling back to `allImages` when
    /// `images` is missing or empty. Entries that are neither a string nor an
    /// object are dropped.
    pub fn image_descriptors(&self) -> Vec<ImageDescriptor> {
        ["images", "allImages"]
            .iter()
            .filter_map(|field| self.extra.get(*field).and_then(Value::as_array))
            .find(|list| !list.is_empty())
            .map(|list| list.iter().filter_map(ImageDescriptor::from_value).collect())
            .unwrap_or_default()
    }
}

/// A single chat message. Every field other than `content` (`role`, `name`,
/// `tool_calls`, ...) is kept in `extra` as received; `role` is an opaque tag
/// of any JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "MessageContent::is_missing")]
    pub content: MessageContent,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn user(content: MessageContent) -> Self {
        let mut extra = Map::new();
        extra.insert("role".to_string(), Value::from("user"));
        Self { content, extra }
    }

    pub fn role(&self) -> Option<&Value> {
        self.extra.get("role")
    }

    pub fn is_user(&self) -> bool {
        self.role().and_then(Value::as_str) == Some("user")
    }
}

/// Message content as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
    /// Any other JSON value, including `null`.
    Other(Value),
    /// The field was absent.
    #[default]
    #[serde(skip)]
    Missing,
}

impl MessageContent {
    pub fn is_missing(&self) -> bool {
        matches!(self, MessageContent::Missing)
    }
}

/// One element of a content array. Blocks this relay does not model are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Block(ContentBlock),
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentBlock::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                extra: Map::new(),
            },
        }
    }
}

/// `image_url` payload. `detail` and any other sibling of `url` are kept
/// verbatim, `null` values included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The body sent upstream: the (possibly rewritten) messages plus the
/// caller's remaining fields. Borrows from the inbound request.
#[derive(Debug, Serialize)]
pub struct UpstreamChatRequest<'a> {
    pub messages: Cow<'a, [ChatMessage]>,

    #[serde(flatten)]
    pub passthrough: &'a Map<String, Value>,
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
