//! Media items for an edit session.
//!
//! A session's media set mixes two kinds of items: images the post already
//! has on the server (URL-addressed, never re-uploaded) and images produced
//! by the crop pipeline in this session (held locally until submit). The two
//! carry independent identities so removals in one space never perturb the
//! other.

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;

use super::aspect::AspectRatio;

/// Output of the aspect-ratio fitter: an encoded JPEG at exact target
/// dimensions. Immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedImage {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
}

impl FittedImage {
    pub fn content_type(&self) -> &'static str {
        "image/jpeg"
    }

    /// Inline data URL for rendering the preview without an object store.
    pub fn preview_data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.data))
    }
}

/// A single image reference in an edit session.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaItem {
    /// Already persisted on the server. `index` is the item's position in
    /// the post's original image list and is stable for the whole session.
    Existing { index: usize, url: String },
    /// Produced locally this session; uploaded only on submit. `id` is a
    /// session-local monotonic counter.
    New {
        id: u64,
        preview_url: String,
        image: FittedImage,
    },
}

impl MediaItem {
    pub fn is_new(&self) -> bool {
        matches!(self, MediaItem::New { .. })
    }

    /// Display URL for this item: the server URL for existing items, the
    /// inline preview for new ones.
    pub fn display_url(&self) -> &str {
        match self {
            MediaItem::Existing { url, .. } => url,
            MediaItem::New { preview_url, .. } => preview_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_data_url_prefix() {
        let image = FittedImage {
            data: Bytes::from_static(&[0xFF, 0xD8, 0xFF]),
            width: 800,
            height: 800,
            aspect_ratio: AspectRatio::default(),
        };
        let url = image.preview_data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_display_url() {
        let existing = MediaItem::Existing {
            index: 0,
            url: "https://cdn.example.com/a.jpg".to_string(),
        };
        assert_eq!(existing.display_url(), "https://cdn.example.com/a.jpg");
        assert!(!existing.is_new());
    }
}
