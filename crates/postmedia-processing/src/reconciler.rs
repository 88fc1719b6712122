//! Preview/selection reconciliation.
//!
//! An edit session shows a mix of images the post already has on the server
//! and images produced locally this session. The two live in independent
//! index spaces: existing items are addressed by their position in the
//! post's original image list (stable for the whole session, removals are
//! markers), new items by their position among new items. Removing from one
//! space never shifts the other.

use postmedia_core::{FittedImage, MediaItem, MediaPrepError};
use std::collections::BTreeSet;

/// A locally produced item with a stable session identity.
#[derive(Clone, Debug)]
struct NewItem {
    id: u64,
    image: FittedImage,
    preview_url: String,
}

/// The ordered media selection for one edit session.
pub struct MediaSelection {
    /// The post's image URLs at session start. Never mutated; removals are
    /// recorded as markers so original indices stay valid.
    existing: Vec<String>,
    removed: BTreeSet<usize>,
    new_items: Vec<NewItem>,
    next_local_id: u64,
}

impl MediaSelection {
    pub fn new(existing: Vec<String>) -> Self {
        Self {
            existing,
            removed: BTreeSet::new(),
            new_items: Vec::new(),
            next_local_id: 0,
        }
    }

    /// Append a fitted image as a new item. Returns its session-local id.
    pub fn push_fitted(&mut self, image: FittedImage) -> u64 {
        let id = self.next_local_id;
        self.next_local_id += 1;
        let preview_url = image.preview_data_url();
        self.new_items.push(NewItem {
            id,
            image,
            preview_url,
        });
        id
    }

    /// Mark an existing item removed by its original index. The underlying
    /// list is untouched so later indices keep their meaning.
    pub fn remove_existing(&mut self, index: usize) -> Result<(), MediaPrepError> {
        if index >= self.existing.len() {
            return Err(MediaPrepError::InvalidInput(format!(
                "No existing image at index {}",
                index
            )));
        }
        if !self.removed.insert(index) {
            return Err(MediaPrepError::InvalidInput(format!(
                "Existing image at index {} already removed",
                index
            )));
        }
        Ok(())
    }

    /// Remove a new item by its position among new items.
    pub fn remove_new(&mut self, position: usize) -> Result<(), MediaPrepError> {
        if position >= self.new_items.len() {
            return Err(MediaPrepError::InvalidInput(format!(
                "No new image at position {}",
                position
            )));
        }
        self.new_items.remove(position);
        Ok(())
    }

    /// Items currently visible: retained existing plus all new.
    pub fn current_count(&self) -> usize {
        (self.existing.len() - self.removed.len()) + self.new_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_count() == 0
    }

    pub fn has_new(&self) -> bool {
        !self.new_items.is_empty()
    }

    /// The ordered view: retained existing items in original order, then
    /// new items in creation order.
    pub fn media_set(&self) -> Vec<MediaItem> {
        let existing = self
            .existing
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.removed.contains(index))
            .map(|(index, url)| MediaItem::Existing {
                index,
                url: url.clone(),
            });

        let new = self.new_items.iter().map(|item| MediaItem::New {
            id: item.id,
            preview_url: item.preview_url.clone(),
            image: item.image.clone(),
        });

        existing.chain(new).collect()
    }

    /// New-item blobs in creation order, for the upload batch.
    pub fn new_images(&self) -> Vec<FittedImage> {
        self.new_items.iter().map(|item| item.image.clone()).collect()
    }

    /// URLs of existing items not marked removed, in original order.
    pub fn retained_existing(&self) -> Vec<String> {
        self.existing
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.removed.contains(index))
            .map(|(_, url)| url.clone())
            .collect()
    }

    /// The final ordered list to persist: retained existing URLs followed
    /// by the uploaded URLs (one per new item, in creation order).
    pub fn final_images(&self, uploaded_urls: Vec<String>) -> Vec<String> {
        debug_assert_eq!(uploaded_urls.len(), self.new_items.len());
        let mut images = self.retained_existing();
        images.extend(uploaded_urls);
        images
    }

    /// Discard new items. Existing-removal markers persist for the session;
    /// they are only discarded with the session itself.
    pub fn reset(&mut self) {
        self.new_items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use postmedia_core::AspectRatio;

    fn fitted() -> FittedImage {
        FittedImage {
            data: Bytes::from_static(&[0xFF, 0xD8]),
            width: 800,
            height: 800,
            aspect_ratio: AspectRatio::default(),
        }
    }

    fn seeded() -> MediaSelection {
        MediaSelection::new(vec![
            "https://cdn.example.com/e0.jpg".to_string(),
            "https://cdn.example.com/e1.jpg".to_string(),
            "https://cdn.example.com/e2.jpg".to_string(),
        ])
    }

    #[test]
    fn test_media_set_order() {
        let mut selection = seeded();
        selection.push_fitted(fitted());
        selection.push_fitted(fitted());

        let set = selection.media_set();
        assert_eq!(set.len(), 5);
        assert!(matches!(set[0], MediaItem::Existing { index: 0, .. }));
        assert!(matches!(set[2], MediaItem::Existing { index: 2, .. }));
        assert!(matches!(set[3], MediaItem::New { id: 0, .. }));
        assert!(matches!(set[4], MediaItem::New { id: 1, .. }));
    }

    #[test]
    fn test_remove_existing_keeps_original_indices() {
        let mut selection = seeded();
        selection.remove_existing(1).unwrap();

        let set = selection.media_set();
        assert_eq!(set.len(), 2);
        // Indices are the original positions, not recomputed.
        assert!(matches!(set[0], MediaItem::Existing { index: 0, .. }));
        assert!(matches!(set[1], MediaItem::Existing { index: 2, .. }));

        // Removing the same original index twice is an error.
        assert!(selection.remove_existing(1).is_err());
        // Index 2 still addresses e2.
        selection.remove_existing(2).unwrap();
        assert_eq!(selection.retained_existing(), vec!["https://cdn.example.com/e0.jpg"]);
    }

    #[test]
    fn test_removal_index_spaces_independent() {
        let mut selection = seeded();
        let first_new = selection.push_fitted(fitted());
        selection.push_fitted(fitted());

        // Removing an existing item must not change which new item
        // position 0 refers to.
        selection.remove_existing(2).unwrap();
        selection.remove_new(0).unwrap();

        let set = selection.media_set();
        let new_ids: Vec<u64> = set
            .iter()
            .filter_map(|item| match item {
                MediaItem::New { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(new_ids, vec![first_new + 1]);
    }

    #[test]
    fn test_remove_new_shifts_new_space_only() {
        let mut selection = MediaSelection::new(vec![]);
        selection.push_fitted(fitted()); // id 0
        selection.push_fitted(fitted()); // id 1
        selection.push_fitted(fitted()); // id 2

        selection.remove_new(1).unwrap();
        let set = selection.media_set();
        let new_ids: Vec<u64> = set
            .iter()
            .filter_map(|item| match item {
                MediaItem::New { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(new_ids, vec![0, 2]);

        // Position space shrank with the removal.
        assert!(selection.remove_new(2).is_err());
    }

    #[test]
    fn test_current_count() {
        let mut selection = seeded();
        assert_eq!(selection.current_count(), 3);
        selection.push_fitted(fitted());
        assert_eq!(selection.current_count(), 4);
        selection.remove_existing(0).unwrap();
        assert_eq!(selection.current_count(), 3);
        selection.remove_new(0).unwrap();
        assert_eq!(selection.current_count(), 2);
    }

    #[test]
    fn test_media_set_idempotent() {
        let mut selection = seeded();
        selection.push_fitted(fitted());
        selection.remove_existing(1).unwrap();

        let first = selection.media_set();
        let second = selection.media_set();
        assert_eq!(first, second);
    }

    #[test]
    fn test_final_images_order() {
        let mut selection = seeded();
        selection.remove_existing(1).unwrap();
        selection.push_fitted(fitted());

        let images = selection.final_images(vec!["https://cdn.example.com/n0.jpg".to_string()]);
        assert_eq!(
            images,
            vec![
                "https://cdn.example.com/e0.jpg",
                "https://cdn.example.com/e2.jpg",
                "https://cdn.example.com/n0.jpg",
            ]
        );
    }

    #[test]
    fn test_reset_clears_new_only() {
        let mut selection = seeded();
        selection.push_fitted(fitted());
        selection.remove_existing(0).unwrap();

        selection.reset();
        assert!(!selection.has_new());
        // The removal marker survives the reset.
        assert_eq!(selection.current_count(), 2);
    }

    #[test]
    fn test_out_of_range_removals() {
        let mut selection = seeded();
        assert!(selection.remove_existing(3).is_err());
        assert!(selection.remove_new(0).is_err());
    }
}
