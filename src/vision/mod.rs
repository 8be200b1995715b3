//! Image descriptor handling for the vision relay.
//!
//! Callers attach images to a chat request through the non-standard top-level
//! `images` / `allImages` fields. This module turns those heterogeneous
//! descriptors into the URL strings an OpenAI-compatible vision backend
//! accepts inside `image_url` content blocks.
//!
//! # Submodules
//!
//! - `models`: The descriptor type and URL shape checks.
//! - `normalize`: Conversion of descriptors into de-duplicated image URLs.

pub mod models;
pub mod normalize;

pub use models::ImageDescriptor;
pub use normalize::prepare_image_urls;
