// Request shaping: fold top-level images into the chat messages

use crate::models::openai::{
    ChatCompletionRequest, ChatMessage, ContentBlock, ContentPart, MessageContent,
    UpstreamChatRequest,
};
use crate::metrics;
use crate::vision::prepare_image_urls;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Build the body forwarded upstream: normalise the request's image
/// descriptors and attach them to the conversation.
pub fn build_upstream_request(request: &ChatCompletionRequest) -> UpstreamChatRequest<'_> {
    let image_urls = prepare_image_urls(&request.image_descriptors());

    debug!(
        "Prepared {} image URL(s) for {} message(s)",
        image_urls.len(),
        request.messages.len()
    );
    if !image_urls.is_empty() {
        metrics::record_images_injected(image_urls.len());
    }

    UpstreamChatRequest {
        messages: compose_messages(&request.messages, &image_urls),
        passthrough: &request.extra,
    }
}

/// Attach `image_urls` to the last user message, creating one when the
/// conversation has none.
///
/// Returns the input unchanged (borrowed) when there is nothing to attach.
/// Otherwise only the targeted message's content differs from the input:
/// string content becomes a text block (dropped when blank) followed by the
/// image blocks, block lists get the image blocks appended, and any other
/// content is replaced by the image blocks.
pub fn compose_messages<'a>(
    messages: &'a [ChatMessage],
    image_urls: &[String],
) -> Cow<'a, [ChatMessage]> {
    if image_urls.is_empty() {
        return Cow::Borrowed(messages);
    }

    let image_parts = image_urls
        .iter()
        .map(|url| ContentPart::Block(ContentBlock::image_url(url.as_str())));

    let mut composed = messages.to_vec();

    match composed.iter().rposition(ChatMessage::is_user) {
        None => {
            debug!("No user message found, appending one for {} image(s)", image_urls.len());
            composed.push(ChatMessage::user(MessageContent::Parts(image_parts.collect())));
        }
        Some(index) => {
            let target = &mut composed[index];
            let parts = match std::mem::take(&mut target.content) {
                MessageContent::Text(text) => {
                    let mut parts = Vec::with_capacity(image_urls.len() + 1);
                    if !text.trim().is_empty() {
                        parts.push(ContentPart::Block(ContentBlock::Text { text }));
                    }
                    parts.extend(image_parts);
                    parts
                }
                MessageContent::Parts(mut parts) => {
                    parts.extend(image_parts);
                    parts
                }
                MessageContent::Missing => image_parts.collect(),
                MessageContent::Other(value) => {
                    warn!(
                        "Replacing non-text content of message {} ({}) with {} image block(s)",
                        index,
                        json_kind(&value),
                        image_urls.len()
                    );
                    image_parts.collect()
                }
            };
            target.content = MessageContent::Parts(parts);
        }
    }

    Cow::Owned(composed)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn messages(value: Value) -> Vec<ChatMessage> {
        serde_json::from_value(value).unwrap()
    }

    fn to_json(messages: &[ChatMessage]) -> Value {
        serde_json::to_value(messages).unwrap()
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_images_is_identity() {
        let input = messages(json!([
            {"role": "system", "content": "sys"},
            {"role": "user", "content": "hello"}
        ]));
        let result = compose_messages(&input, &[]);

        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), input.as_slice());
    }

    #[test]
    fn test_creates_user_turn_when_missing() {
        let input = messages(json!([{"role": "system", "content": "sys"}]));
        let result = compose_messages(&input, &urls(&["data:image/png;base64,QUJD"]));

        assert_eq!(
            to_json(&result),
            json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,QUJD"}}
                ]}
            ])
        );
        // the caller's list is untouched
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn test_empty_conversation_gets_user_turn() {
        let result = compose_messages(&[], &urls(&["https://a/1.png", "https://a/2.png"]));
        assert_eq!(result.len(), 1);
        assert_eq!(
            to_json(&result)[0]["content"],
            json!([
                {"type": "image_url", "image_url": {"url": "https://a/1.png"}},
                {"type": "image_url", "image_url": {"url": "https://a/2.png"}}
            ])
        );
    }

    #[test]
    fn test_appends_to_existing_user_text() {
        let input = messages(json!([{"role": "user", "content": "describe"}]));
        let result = compose_messages(&input, &urls(&["U"]));

        assert_eq!(
            to_json(&result)[0]["content"],
            json!([
                {"type": "text", "text": "describe"},
                {"type": "image_url", "image_url": {"url": "U"}}
            ])
        );
        assert_eq!(input[0].content, MessageContent::Text("describe".to_string()));
    }

    #[test]
    fn test_blank_text_is_dropped() {
        let input = messages(json!([{"role": "user", "content": "  \n\t"}]));
        let result = compose_messages(&input, &urls(&["U"]));
        assert_eq!(
            to_json(&result)[0]["content"],
            json!([{"type": "image_url", "image_url": {"url": "U"}}])
        );
    }

    #[test]
    fn test_targets_last_user_message_only() {
        let input = messages(json!([
            {"role": "user", "content": "first"},
            {"role": "assistant", "content": "ok"},
            {"role": "user", "content": "second", "name": "bob"},
            {"role": "assistant", "content": "thinking"}
        ]));
        let result = compose_messages(&input, &urls(&["U"]));
        let json = to_json(&result);

        assert_eq!(result.len(), 4);
        assert_eq!(json[0], json!({"role": "user", "content": "first"}));
        assert_eq!(json[1], json!({"role": "assistant", "content": "ok"}));
        assert_eq!(
            json[2],
            json!({"role": "user", "name": "bob", "content": [
                {"type": "text", "text": "second"},
                {"type": "image_url", "image_url": {"url": "U"}}
            ]})
        );
        assert_eq!(json[3], json!({"role": "assistant", "content": "thinking"}));
    }

    #[test]
    fn test_appends_to_existing_blocks() {
        let input = messages(json!([{"role": "user", "content": [
            {"type": "text", "text": "compare"},
            {"type": "image_url", "image_url": {"url": "https://a/0.png", "detail": "high"}},
            {"type": "input_audio", "input_audio": {"data": "AAAA", "format": "wav"}}
        ]}]));
        let result = compose_messages(&input, &urls(&["U1", "U2"]));

        assert_eq!(
            to_json(&result)[0]["content"],
            json!([
                {"type": "text", "text": "compare"},
                {"type": "image_url", "image_url": {"url": "https://a/0.png", "detail": "high"}},
                {"type": "input_audio", "input_audio": {"data": "AAAA", "format": "wav"}},
                {"type": "image_url", "image_url": {"url": "U1"}},
                {"type": "image_url", "image_url": {"url": "U2"}}
            ])
        );
    }

    #[test]
    fn test_unrecognised_content_is_replaced() {
        for content in [json!({"weird": true}), json!(42), json!(null)] {
            let input = messages(json!([{"role": "user", "content": content}]));
            let result = compose_messages(&input, &urls(&["U"]));
            assert_eq!(
                to_json(&result)[0]["content"],
                json!([{"type": "image_url", "image_url": {"url": "U"}}])
            );
        }

        let input = messages(json!([{"role": "user"}]));
        let result = compose_messages(&input, &urls(&["U"]));
        assert_eq!(
            to_json(&result),
            json!([{"role": "user", "content": [{"type": "image_url", "image_url": {"url": "U"}}]}])
        );
    }

    #[test]
    fn test_build_upstream_request() {
        let request: ChatCompletionRequest = serde_json::from_value(json!({
            "model": "llava",
            "temperature": 0.1,
            "messages": [{"role": "user", "content": "what is this?"}],
            "images": [{"id": "a", "data": "QUJD"}, "QUJD"]
        }))
        .unwrap();

        let upstream = build_upstream_request(&request);
        let body = serde_json::to_value(&upstream).unwrap();

        assert_eq!(body["model"], "llava");
        assert_eq!(body["temperature"], 0.1);
        assert_eq!(body["images"], json!([{"id": "a", "data": "QUJD"}, "QUJD"]));
        assert_eq!(
            body["messages"],
            json!([{"role": "user", "content": [
                {"type": "text", "text": "what is this?"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,QUJD"}}
            ]}])
        );
    }

    #[test]
    fn test_build_upstream_request_without_images_borrows() {
        let request: ChatCompletionRequest = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .unwrap();

        let upstream = build_upstream_request(&request);
        assert!(matches!(upstream.messages, Cow::Borrowed(_)));
    }
}
