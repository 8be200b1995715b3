// Image descriptor normalization

use super::models::{is_data_url, is_http_url, to_data_url, ImageDescriptor, DEFAULT_IMAGE_MIME};
use std::collections::HashSet;
use tracing::debug;

/// Normalise a mixed list of image descriptors into URL strings usable in
/// `image_url` blocks.
///
/// Data URLs and http(s) URLs pass through unchanged; anything else is taken as
/// a raw base64 payload and wrapped as a PNG data URL. Descriptors without
/// usable data are skipped. The result holds each URL once, in order of first
/// appearance.
pub fn prepare_image_urls<'a, I>(descriptors: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ImageDescriptor>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for descriptor in descriptors {
        let Some(url) = normalize_descriptor(descriptor) else {
            debug!("Skipping image descriptor without usable data");
            continue;
        };
        if seen.insert(url.clone()) {
            urls.push(url);
        }
    }

    urls
}

fn normalize_descriptor(descriptor: &ImageDescriptor) -> Option<String> {
    match descriptor {
        ImageDescriptor::Structured { data, .. } => {
            let data = data.as_deref().filter(|d| !d.is_empty())?;
            if is_data_url(data) {
                Some(data.to_string())
            } else {
                Some(to_data_url(data, DEFAULT_IMAGE_MIME))
            }
        }
        ImageDescriptor::Raw(raw) if raw.is_empty() => None,
        ImageDescriptor::Raw(raw) => {
            if is_data_url(raw) || is_http_url(raw) {
                Some(raw.clone())
            } else {
                Some(to_data_url(raw, DEFAULT_IMAGE_MIME))
            }
        }
    }
}
