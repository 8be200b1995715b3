// Vision models and types

use serde_json::Value;

/// MIME type assumed for raw base64 payloads. Image bytes are not sniffed.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// One entry of a request's `images` / `allImages` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageDescriptor {
    /// A data URL, an http(s) URL, or a bare base64 payload.
    Raw(String),
    /// `{"id": ..., "data": "<data URL or base64>"}`. `id` is caller bookkeeping only.
    Structured { id: Option<Value>, data: Option<String> },
}

impl ImageDescriptor {
    /// Interpret a JSON value as a descriptor. Values of any other shape yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(raw) => Some(ImageDescriptor::Raw(raw.clone())),
            Value::Object(fields) => Some(ImageDescriptor::Structured {
                id: fields.get("id").cloned(),
                data: fields.get("data").and_then(Value::as_str).map(str::to_string),
            }),
            _ => None,
        }
    }
}

/// `data:<mime>;base64,<payload>`
pub fn is_data_url(s: &str) -> bool {
    s.starts_with("data:") && s.contains(";base64,")
}

pub fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

pub fn to_data_url(payload: &str, mime: &str) -> String {
    format!("data:{};base64,{}", mime, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        assert_eq!(
            ImageDescriptor::from_value(&json!("QUJD")),
            Some(ImageDescriptor::Raw("QUJD".to_string()))
        );
        assert_eq!(
            ImageDescriptor::from_value(&json!({"id": 7, "data": "QUJD"})),
            Some(ImageDescriptor::Structured {
                id: Some(json!(7)),
                data: Some("QUJD".to_string()),
            })
        );
        assert_eq!(
            ImageDescriptor::from_value(&json!({"data": ["not", "a", "string"]})),
            Some(ImageDescriptor::Structured { id: None, data: None })
        );
        assert_eq!(ImageDescriptor::from_value(&json!(null)), None);
        assert_eq!(ImageDescriptor::from_value(&json!(3.5)), None);
        assert_eq!(ImageDescriptor::from_value(&json!(["QUJD"])), None);
    }

    #[test]
    fn test_url_shapes() {
        assert!(is_data_url("data:image/jpeg;base64,/9j/"));
        assert!(!is_data_url("data:image/svg+xml,<svg/>"));
        assert!(!is_data_url("image/png;base64,QUJD"));
        assert!(is_http_url("http://host/a.png"));
        assert!(is_http_url("https://host/a.png"));
        assert!(!is_http_url("ftp://host/a.png"));
        assert_eq!(to_data_url("QUJD", "image/webp"), "data:image/webp;base64,QUJD");
    }
}
