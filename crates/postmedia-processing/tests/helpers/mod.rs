//! Shared fixtures and mock collaborators for pipeline integration tests.

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use postmedia_core::{CandidateFile, FittedImage, PostResponse, PostUpdate};
use postmedia_processing::{MediaUploader, PostStore};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// A decodable PNG candidate of the given pixel dimensions.
pub fn png_candidate(name: &str, width: u32, height: u32) -> CandidateFile {
    let img = RgbaImage::from_pixel(width, height, Rgba([180, 90, 45, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    CandidateFile::new(name, "image/png", Bytes::from(buffer))
}

/// A decodable JPEG candidate of the given pixel dimensions.
pub fn jpeg_candidate(name: &str, width: u32, height: u32) -> CandidateFile {
    let img = RgbaImage::from_pixel(width, height, Rgba([60, 120, 200, 255]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .to_rgb8()
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    CandidateFile::new(name, "image/jpeg", Bytes::from(buffer))
}

/// Uploader that records batch sizes and mints sequential URLs.
pub struct RecordingUploader {
    counter: AtomicU64,
    pub fail_next: AtomicBool,
    pub batches: Mutex<Vec<usize>>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            fail_next: AtomicBool::new(false),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaUploader for RecordingUploader {
    async fn upload_batch(&self, images: &[FittedImage]) -> anyhow::Result<Vec<String>> {
        self.batches.lock().unwrap().push(images.len());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("upload transport failure");
        }
        Ok(images
            .iter()
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                format!("https://cdn.example.com/u{}.jpg", n)
            })
            .collect())
    }
}

/// Store that records every persist call and echoes the update back.
pub struct RecordingStore {
    pub fail_next: AtomicBool,
    pub persisted: Mutex<Vec<(Option<Uuid>, PostUpdate)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            fail_next: AtomicBool::new(false),
            persisted: Mutex::new(Vec::new()),
        }
    }

    pub fn last_update(&self) -> PostUpdate {
        self.persisted.lock().unwrap().last().unwrap().1.clone()
    }

    pub fn persist_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }
}

#[async_trait]
impl PostStore for RecordingStore {
    async fn persist(
        &self,
        post_id: Option<Uuid>,
        update: &PostUpdate,
    ) -> anyhow::Result<PostResponse> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("post endpoint returned 500");
        }
        self.persisted
            .lock()
            .unwrap()
            .push((post_id, update.clone()));
        Ok(PostResponse {
            id: post_id.unwrap_or_else(Uuid::new_v4),
            title: update.title.clone(),
            content: update.content.clone(),
            images: update.images.clone(),
            aspect_ratio: update.aspect_ratio.clone(),
        })
    }
}
