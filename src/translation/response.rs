// Response shaping for buffered completions

use serde_json::Value;
use tracing::debug;

/// Model reported when neither the backend nor the caller named one.
pub const FALLBACK_RESPONSE_MODEL: &str = "local";

const COMPLETION_ID_PREFIX: &str = "chatcmpl-";

/// Make sure a buffered completion carries `id` and `model`.
///
/// Keys already present are left alone, whatever their value. A missing
/// `model` takes the caller's requested model as sent (any JSON type), else
/// `"local"`. Bodies that are not JSON objects are returned unchanged.
pub fn fill_response_metadata(mut body: Value, requested_model: Option<&Value>) -> Value {
    if let Value::Object(fields) = &mut body {
        fields.entry("id").or_insert_with(|| {
            let id = generate_completion_id();
            debug!("Upstream response had no id, assigned {}", id);
            Value::String(id)
        });
        fields.entry("model").or_insert_with(|| {
            requested_model
                .cloned()
                .unwrap_or_else(|| Value::from(FALLBACK_RESPONSE_MODEL))
        });
    }
    body
}

/// `chatcmpl-` followed by 24 lowercase hex characters.
pub fn generate_completion_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", COMPLETION_ID_PREFIX, &hex[..24])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fills_missing_fields() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "a cat"}}]});
        let filled = fill_response_metadata(body, Some(&json!("llava-1.6")));

        let id = filled["id"].as_str().unwrap();
        assert!(id.starts_with("chatcmpl-"));
        assert_eq!(id.len(), "chatcmpl-".len() + 24);
        assert!(id["chatcmpl-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(filled["model"], "llava-1.6");
        assert_eq!(filled["choices"][0]["message"]["content"], "a cat");
    }

    #[test]
    fn test_falls_back_to_local_model() {
        let filled = fill_response_metadata(json!({}), None);
        assert_eq!(filled["model"], FALLBACK_RESPONSE_MODEL);
    }

    #[test]
    fn test_present_fields_untouched() {
        let body = json!({"id": "chatcmpl-upstream", "model": "qwen2-vl", "object": "chat.completion"});
        assert_eq!(fill_response_metadata(body.clone(), Some(&json!("other"))), body);

        // present-but-null counts as present
        let body = json!({"id": null, "model": null});
        assert_eq!(fill_response_metadata(body.clone(), Some(&json!("other"))), body);
    }

    #[test]
    fn test_non_string_model_echoed() {
        let filled = fill_response_metadata(json!({"id": "x"}), Some(&json!(5)));
        assert_eq!(filled["model"], json!(5));
    }

    #[test]
    fn test_non_object_body_unchanged() {
        let body = json!(["not", "an", "object"]);
        assert_eq!(fill_response_metadata(body.clone(), None), body);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_completion_id(), generate_completion_id());
    }
}
