//! Trait seams for the upload/persist boundary.

use async_trait::async_trait;
use postmedia_core::{FittedImage, PostResponse, PostUpdate};
use uuid::Uuid;

/// Uploads locally held blobs in one batch. Implementations must return one
/// permanent URL per image, in the order the images were given.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload_batch(&self, images: &[FittedImage]) -> anyhow::Result<Vec<String>>;
}

/// Creates or updates the post record. `post_id` of `None` creates.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn persist(&self, post_id: Option<Uuid>, update: &PostUpdate)
        -> anyhow::Result<PostResponse>;
}
