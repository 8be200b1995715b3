// Property tests for image descriptor normalization and message composition

use proptest::prelude::*;
use std::collections::HashSet;
use vision_relay::models::ChatMessage;
use vision_relay::translation::compose_messages;
use vision_relay::vision::{prepare_image_urls, ImageDescriptor};

// Small alphabets so that duplicates are common.
fn descriptor() -> impl Strategy<Value = ImageDescriptor> {
    prop_oneof![
        "[A-D]{0,3}".prop_map(ImageDescriptor::Raw),
        "https://[a-c]{1,2}\\.png".prop_map(ImageDescriptor::Raw),
        "[A-D]{1,3}".prop_map(|p| ImageDescriptor::Raw(format!("data:image/png;base64,{}", p))),
        proptest::option::of("[A-D]{0,3}")
            .prop_map(|data| ImageDescriptor::Structured { id: None, data }),
    ]
}

fn message() -> impl Strategy<Value = ChatMessage> {
    (
        prop_oneof![Just("system"), Just("user"), Just("assistant")],
        "[a-z ]{0,12}",
    )
        .prop_map(|(role, text)| {
            serde_json::from_value(serde_json::json!({"role": role, "content": text})).unwrap()
        })
}

proptest! {
    #[test]
    fn urls_are_unique(inputs in prop::collection::vec(descriptor(), 0..24)) {
        let urls = prepare_image_urls(&inputs);
        let distinct: HashSet<&String> = urls.iter().collect();
        prop_assert_eq!(distinct.len(), urls.len());
    }

    #[test]
    fn urls_follow_first_occurrence(inputs in prop::collection::vec(descriptor(), 0..24)) {
        let mut expected: Vec<String> = Vec::new();
        for input in &inputs {
            for url in prepare_image_urls(std::iter::once(input)) {
                if !expected.contains(&url) {
                    expected.push(url);
                }
            }
        }
        prop_assert_eq!(prepare_image_urls(&inputs), expected);
    }

    #[test]
    fn url_shaped_strings_pass_through(path in "[a-z0-9/]{1,20}") {
        let url = format!("https://{}", path);
        prop_assert_eq!(prepare_image_urls(&[ImageDescriptor::Raw(url.clone())]), vec![url]);
    }

    #[test]
    fn empty_image_list_is_identity(messages in prop::collection::vec(message(), 0..8)) {
        let composed = compose_messages(&messages, &[]);
        prop_assert_eq!(composed.as_ref(), messages.as_slice());
    }

    #[test]
    fn composition_touches_at_most_one_message(
        messages in prop::collection::vec(message(), 0..8),
        image_count in 1usize..4,
    ) {
        let urls: Vec<String> = (0..image_count).map(|i| format!("https://img/{}.png", i)).collect();
        let composed = compose_messages(&messages, &urls);

        let has_user = messages.iter().any(ChatMessage::is_user);
        let expected_len = if has_user { messages.len() } else { messages.len() + 1 };
        prop_assert_eq!(composed.len(), expected_len);

        let changed = messages.iter().zip(composed.iter()).filter(|(a, b)| a != b).count();
        prop_assert_eq!(changed, usize::from(has_user));
    }
}
