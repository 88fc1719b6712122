//! The edit session: one mount-to-submit lifecycle of the media pipeline.
//!
//! All state is transient and scoped to the session. A failed submit leaves
//! every cropped image and removal marker in place so the user can retry
//! without re-selecting or re-cropping anything; a successful submit
//! re-seeds the session from the persisted post.

use postmedia_core::{
    AspectRatio, CandidateFile, FittedImage, MediaItem, MediaPrepError, PipelineConfig,
    PostResponse, PostUpdate,
};
use uuid::Uuid;

use crate::image::decoder::ImageDecoder;
use crate::image::fitter::FitOptions;
use crate::queue::{CropOutcome, CropQueue, DecodeOutcome, DecodeTicket};
use crate::reconciler::MediaSelection;
use crate::session::traits::{MediaUploader, PostStore};
use crate::validator::BatchValidator;

/// Text fields accompanying the media set on submit.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// One edit session: post creation or editing, from mount to submit.
pub struct EditSession {
    validator: BatchValidator,
    queue: CropQueue,
    selection: MediaSelection,
    ratio_choice: Option<AspectRatio>,
    post_id: Option<Uuid>,
    had_images: bool,
}

impl EditSession {
    /// Session for a brand-new post.
    pub fn new_post(config: &PipelineConfig) -> Self {
        Self {
            validator: BatchValidator::from_config(config),
            queue: CropQueue::new(FitOptions::from(config)),
            selection: MediaSelection::new(Vec::new()),
            ratio_choice: None,
            post_id: None,
            had_images: false,
        }
    }

    /// Session for editing an existing post, seeded with its current
    /// images and (if it has any) its aspect ratio.
    pub fn edit_post(
        config: &PipelineConfig,
        post_id: Uuid,
        existing_images: Vec<String>,
        aspect_ratio: Option<AspectRatio>,
    ) -> Self {
        let had_images = !existing_images.is_empty();
        Self {
            validator: BatchValidator::from_config(config),
            queue: CropQueue::new(FitOptions::from(config)),
            selection: MediaSelection::new(existing_images),
            ratio_choice: if had_images { aspect_ratio } else { None },
            post_id: Some(post_id),
            had_images,
        }
    }

    /// Validate and enqueue a batch of selected files, then drive decoding
    /// until a crop session opens or the queue drains.
    ///
    /// The outer `Err` is a batch rejection: nothing was admitted. The `Ok`
    /// payload lists per-file decode failures encountered while advancing;
    /// those entries were dropped, everything else proceeds.
    #[tracing::instrument(skip(self, files), fields(batch = files.len()))]
    pub async fn add_files(
        &mut self,
        files: Vec<CandidateFile>,
    ) -> Result<Vec<MediaPrepError>, MediaPrepError> {
        let already_selected = self.selection.current_count() + self.queue.in_flight();
        self.validator.validate_batch(already_selected, &files)?;

        let ticket = self.queue.enqueue(files);
        Ok(self.drive_decode(ticket).await)
    }

    /// Confirm the active crop at `ratio` and advance the queue. Once the
    /// session holds an item the ratio is locked; later confirms reuse the
    /// locked value regardless of `ratio`.
    ///
    /// Compositing failures are local to the active file and returned in
    /// the `Ok` list, matching decode failures.
    pub async fn confirm_crop(
        &mut self,
        ratio: AspectRatio,
    ) -> Result<Vec<MediaPrepError>, MediaPrepError> {
        let effective = match self.ratio_choice {
            Some(locked) => {
                if !locked.matches(ratio) {
                    tracing::debug!(
                        requested = %ratio,
                        locked = %locked,
                        "Aspect ratio locked; using locked value"
                    );
                }
                locked
            }
            None => ratio,
        };

        match self.queue.confirm(effective)? {
            CropOutcome::Fitted { image, next } => {
                self.ratio_choice.get_or_insert(effective);
                self.selection.push_fitted(image);
                Ok(self.drive_decode(next).await)
            }
            CropOutcome::Failed {
                filename,
                reason,
                next,
            } => {
                let mut errors = vec![MediaPrepError::Compositing(format!(
                    "{}: {}",
                    filename, reason
                ))];
                errors.extend(self.drive_decode(next).await);
                Ok(errors)
            }
        }
    }

    /// Discard the active crop (or in-flight decode) and advance. Only the
    /// active file is dropped; the rest of the queue proceeds.
    pub async fn cancel_crop(&mut self) -> Vec<MediaPrepError> {
        let next = self.queue.cancel();
        self.drive_decode(next).await
    }

    pub fn remove_existing(&mut self, index: usize) -> Result<(), MediaPrepError> {
        self.selection.remove_existing(index)?;
        self.unlock_ratio_if_empty();
        Ok(())
    }

    pub fn remove_new(&mut self, position: usize) -> Result<(), MediaPrepError> {
        self.selection.remove_new(position)?;
        self.unlock_ratio_if_empty();
        Ok(())
    }

    /// The ordered media set currently shown to the user.
    pub fn media_set(&self) -> Vec<MediaItem> {
        self.selection.media_set()
    }

    pub fn current_count(&self) -> usize {
        self.selection.current_count()
    }

    /// The active cropping session, if one is open.
    pub fn active_crop(&self) -> Option<&crate::queue::ActiveCropSession> {
        self.queue.active_session()
    }

    /// Move the active session's ratio selection (slider preview). Once the
    /// session holds a media item the ratio is locked and cannot move.
    pub fn set_crop_ratio(&mut self, ratio: AspectRatio) -> Result<(), MediaPrepError> {
        if let Some(locked) = self.ratio_choice {
            if !locked.matches(ratio) {
                return Err(MediaPrepError::AspectRatioLocked);
            }
        }
        let session = self
            .queue
            .active_session_mut()
            .ok_or(MediaPrepError::NoActiveSession)?;
        session.set_ratio(ratio);
        Ok(())
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.ratio_choice
    }

    pub fn is_ratio_locked(&self) -> bool {
        self.ratio_choice.is_some()
    }

    /// Discard new items (existing-removal markers persist for the
    /// session).
    pub fn reset(&mut self) {
        self.selection.reset();
        self.unlock_ratio_if_empty();
    }

    /// Upload new items and persist the final image list.
    ///
    /// On failure the session is untouched: every cropped item and removal
    /// marker survives for a retry (which re-runs the whole upload batch).
    /// On success the session re-seeds from the persisted post.
    #[tracing::instrument(skip_all)]
    pub async fn submit(
        &mut self,
        uploader: &dyn MediaUploader,
        store: &dyn PostStore,
        draft: PostDraft,
    ) -> Result<PostResponse, MediaPrepError> {
        let new_images: Vec<FittedImage> = self.selection.new_images();

        let uploaded_urls = if new_images.is_empty() {
            Vec::new()
        } else {
            let urls = uploader
                .upload_batch(&new_images)
                .await
                .map_err(|err| MediaPrepError::Upload(err.to_string()))?;
            if urls.len() != new_images.len() {
                return Err(MediaPrepError::UploadCountMismatch {
                    expected: new_images.len(),
                    received: urls.len(),
                });
            }
            urls
        };

        let update = PostUpdate {
            title: draft.title,
            content: draft.content,
            images: self.selection.final_images(uploaded_urls),
            // The label travels only the first time a ratio is set for the
            // post; afterwards the server value is authoritative.
            aspect_ratio: if self.had_images {
                None
            } else {
                self.ratio_choice.map(|ratio| ratio.label().to_string())
            },
        };

        let response = store
            .persist(self.post_id, &update)
            .await
            .map_err(|err| MediaPrepError::Persist(err.to_string()))?;

        tracing::debug!(
            post_id = %response.id,
            images = response.images.len(),
            "Post persisted; re-seeding session"
        );

        self.post_id = Some(response.id);
        self.had_images = !response.images.is_empty();
        self.selection = MediaSelection::new(response.images.clone());
        if !self.had_images {
            self.ratio_choice = None;
        }

        Ok(response)
    }

    fn unlock_ratio_if_empty(&mut self) {
        if self.selection.is_empty() {
            self.ratio_choice = None;
        }
    }

    /// Run decode completions until a crop session opens or the queue
    /// drains. Decoding happens on the blocking pool; each failure drops
    /// only its own entry.
    async fn drive_decode(&mut self, mut ticket: Option<DecodeTicket>) -> Vec<MediaPrepError> {
        let mut dropped = Vec::new();

        while let Some(current) = ticket.take() {
            let data = current.candidate().data.clone();
            let result = tokio::task::spawn_blocking(move || {
                ImageDecoder::decode(&data).map_err(|err| err.to_string())
            })
            .await
            .unwrap_or_else(|join_err| Err(join_err.to_string()));

            match self.queue.decode_ready(current, result) {
                DecodeOutcome::SessionOpened | DecodeOutcome::Stale => break,
                DecodeOutcome::Dropped {
                    filename,
                    reason,
                    next,
                } => {
                    dropped.push(MediaPrepError::Decode { filename, reason });
                    ticket = next;
                }
            }
        }

        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_candidate(name: &str, width: u32, height: u32) -> CandidateFile {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        CandidateFile::new(name, "image/png", Bytes::from(buffer))
    }

    fn corrupt_candidate(name: &str) -> CandidateFile {
        CandidateFile::new(name, "image/jpeg", Bytes::from_static(b"garbage bytes"))
    }

    fn session() -> EditSession {
        EditSession::new_post(&PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_add_files_opens_session_in_order() {
        let mut s = session();
        let dropped = s
            .add_files(vec![
                png_candidate("a.png", 100, 100),
                png_candidate("b.png", 100, 100),
            ])
            .await
            .unwrap();
        assert!(dropped.is_empty());
        assert_eq!(s.active_crop().unwrap().filename(), "a.png");

        s.confirm_crop(AspectRatio::new(1.0)).await.unwrap();
        assert_eq!(s.active_crop().unwrap().filename(), "b.png");
    }

    #[tokio::test]
    async fn test_add_files_rejects_whole_batch() {
        let mut s = session();
        let err = s
            .add_files(vec![
                png_candidate("ok.png", 10, 10),
                CandidateFile::new("huge.jpg", "image/jpeg", Bytes::from(vec![0; 6 * 1024 * 1024])),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, MediaPrepError::FileTooLarge { .. }));
        assert_eq!(s.current_count(), 0);
        assert!(s.active_crop().is_none());
    }

    #[tokio::test]
    async fn test_cap_counts_in_flight_entries() {
        let mut s = session();
        // Nine queued (one active, eight pending), none confirmed yet.
        let files: Vec<_> = (0..9)
            .map(|i| png_candidate(&format!("{}.png", i), 20, 20))
            .collect();
        s.add_files(files).await.unwrap();
        assert_eq!(s.current_count(), 0);

        // 9 in flight + 2 incoming exceeds the cap of 10.
        let err = s
            .add_files(vec![
                png_candidate("x.png", 20, 20),
                png_candidate("y.png", 20, 20),
            ])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MediaPrepError::TooManyImages {
                requested: 11,
                max: 10
            }
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_dropped_queue_advances() {
        let mut s = session();
        let dropped = s
            .add_files(vec![
                corrupt_candidate("bad.jpg"),
                png_candidate("good.png", 50, 50),
            ])
            .await
            .unwrap();
        assert_eq!(dropped.len(), 1);
        assert!(matches!(
            &dropped[0],
            MediaPrepError::Decode { filename, .. } if filename == "bad.jpg"
        ));
        assert_eq!(s.active_crop().unwrap().filename(), "good.png");
    }

    #[tokio::test]
    async fn test_ratio_locks_on_first_confirm() {
        let mut s = session();
        s.add_files(vec![
            png_candidate("a.png", 100, 100),
            png_candidate("b.png", 100, 100),
        ])
        .await
        .unwrap();

        s.confirm_crop(AspectRatio::new(1.0)).await.unwrap();
        assert!(s.is_ratio_locked());

        // Second confirm asks for 1.91 but the locked square wins.
        s.confirm_crop(AspectRatio::new(1.91)).await.unwrap();
        let set = s.media_set();
        match &set[1] {
            MediaItem::New { image, .. } => {
                assert_eq!(image.aspect_ratio, AspectRatio::new(1.0));
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ratio_unlocks_when_set_empties() {
        let mut s = session();
        s.add_files(vec![png_candidate("a.png", 100, 100)])
            .await
            .unwrap();
        s.confirm_crop(AspectRatio::new(1.0)).await.unwrap();
        assert!(s.is_ratio_locked());

        s.remove_new(0).unwrap();
        assert!(!s.is_ratio_locked());
    }

    #[tokio::test]
    async fn test_cancel_drops_active_only() {
        let mut s = session();
        s.add_files(vec![
            png_candidate("a.png", 100, 100),
            png_candidate("b.png", 100, 100),
        ])
        .await
        .unwrap();

        let dropped = s.cancel_crop().await;
        assert!(dropped.is_empty());
        // a.png is gone without producing an item; b.png is up next.
        assert_eq!(s.current_count(), 0);
        assert_eq!(s.active_crop().unwrap().filename(), "b.png");
    }

    #[tokio::test]
    async fn test_set_crop_ratio_requires_session() {
        let mut s = session();
        assert!(matches!(
            s.set_crop_ratio(AspectRatio::new(1.2)),
            Err(MediaPrepError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn test_set_crop_ratio_rejected_once_locked() {
        let mut s = session();
        s.add_files(vec![
            png_candidate("a.png", 100, 100),
            png_candidate("b.png", 100, 100),
        ])
        .await
        .unwrap();
        s.confirm_crop(AspectRatio::new(1.0)).await.unwrap();

        assert!(matches!(
            s.set_crop_ratio(AspectRatio::new(1.5)),
            Err(MediaPrepError::AspectRatioLocked)
        ));
        // The locked value itself is still accepted.
        s.set_crop_ratio(AspectRatio::new(1.0)).unwrap();
    }
}
