//! Domain methods for the post media API client.
//!
//! Wire types are re-exported from `postmedia_core::models`. The client
//! implements the pipeline's upload/persist traits so an `ApiClient` can be
//! handed straight to `EditSession::submit`.

use crate::{api_prefix, ApiClient};
use anyhow::{Context, Result};
use async_trait::async_trait;
use postmedia_core::models::{PostResponse, PostUpdate, UploadBatchResponse};
use postmedia_core::FittedImage;
use postmedia_processing::{MediaUploader, PostStore};
use uuid::Uuid;

impl ApiClient {
    /// Upload a batch of fitted images in one multipart call.
    ///
    /// The server returns one permanent URL per blob, in submission order;
    /// a count mismatch is an error rather than a silent truncation.
    pub async fn upload_images(&self, images: &[FittedImage]) -> Result<Vec<String>> {
        let mut form = reqwest::multipart::Form::new();
        for (index, image) in images.iter().enumerate() {
            let part = reqwest::multipart::Part::bytes(image.data.to_vec())
                .file_name(format!("image-{}.jpg", index))
                .mime_str(image.content_type())
                .context("Invalid content type for upload part")?;
            form = form.part("files", part);
        }

        let response: UploadBatchResponse = self
            .post_multipart(&format!("{}/uploads/images", api_prefix()), form)
            .await?;

        if response.urls.len() != images.len() {
            return Err(anyhow::anyhow!(
                "Upload returned {} URLs for {} images",
                response.urls.len(),
                images.len()
            ));
        }

        Ok(response.urls)
    }

    /// Fetch a post record (e.g. to seed an edit session).
    pub async fn get_post(&self, id: Uuid) -> Result<PostResponse> {
        self.get(&format!("{}/posts/{}", api_prefix(), id), &[])
            .await
    }

    /// Create a new post.
    pub async fn create_post(&self, update: &PostUpdate) -> Result<PostResponse> {
        self.post_json(&format!("{}/posts", api_prefix()), update)
            .await
    }

    /// Update an existing post.
    pub async fn update_post(&self, id: Uuid, update: &PostUpdate) -> Result<PostResponse> {
        self.patch_json(&format!("{}/posts/{}", api_prefix(), id), update)
            .await
    }
}

#[async_trait]
impl MediaUploader for ApiClient {
    async fn upload_batch(&self, images: &[FittedImage]) -> Result<Vec<String>> {
        self.upload_images(images).await
    }
}

#[async_trait]
impl PostStore for ApiClient {
    async fn persist(
        &self,
        post_id: Option<Uuid>,
        update: &PostUpdate,
    ) -> Result<PostResponse> {
        match post_id {
            Some(id) => self.update_post(id, update).await,
            None => self.create_post(update).await,
        }
    }
}
