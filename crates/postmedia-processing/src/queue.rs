//! Sequential crop queue.
//!
//! A strictly FIFO state machine that drains pending files one at a time:
//! exactly one cropping session is ever active, entries are processed in
//! submission order, and no entry is processed twice.
//!
//! Decoding is delegated to the caller: when an entry reaches the head of
//! the queue, the controller hands out a [`DecodeTicket`] and waits in the
//! `Decoding` state until [`CropQueue::decode_ready`] is called with that
//! ticket. Tickets carry a generation counter; [`CropQueue::cancel`] bumps
//! it, so a decode that completes after a cancel is recognized as stale and
//! dropped without touching the queue.

use image::{DynamicImage, GenericImageView};
use postmedia_core::{AspectRatio, CandidateFile, FittedImage, MediaPrepError};

use crate::image::fitter::{AspectRatioFitter, FitOptions};
use std::collections::VecDeque;

/// Token for an entry awaiting decode. Issued by [`CropQueue::enqueue`],
/// [`CropQueue::cancel`], and the advance after a confirm; consumed by
/// [`CropQueue::decode_ready`].
#[derive(Debug)]
pub struct DecodeTicket {
    generation: u64,
    candidate: CandidateFile,
}

impl DecodeTicket {
    pub fn candidate(&self) -> &CandidateFile {
        &self.candidate
    }
}

/// The one interactive cropping session. Holds the decoded raster and the
/// current ratio selection, seeded from the source image's own shape.
#[derive(Debug)]
pub struct ActiveCropSession {
    candidate: CandidateFile,
    image: DynamicImage,
    ratio: AspectRatio,
}

impl ActiveCropSession {
    pub fn filename(&self) -> &str {
        &self.candidate.filename
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    /// Move the ratio selection (slider drag). Clamping is inherent to
    /// [`AspectRatio`].
    pub fn set_ratio(&mut self, ratio: AspectRatio) {
        self.ratio = ratio;
    }
}

/// Result of completing a decode for a ticket.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// The decoded entry is now the active cropping session.
    SessionOpened,
    /// The ticket predates a cancel; the queue was not touched.
    Stale,
    /// Decode failed. The entry was dropped and, if the queue is non-empty,
    /// the next entry needs decoding.
    Dropped {
        filename: String,
        reason: String,
        next: Option<DecodeTicket>,
    },
}

/// Result of confirming the active session at a ratio.
#[derive(Debug)]
pub enum CropOutcome {
    Fitted {
        image: FittedImage,
        next: Option<DecodeTicket>,
    },
    /// Compositing failed. Local to that file; the queue advances.
    Failed {
        filename: String,
        reason: String,
        next: Option<DecodeTicket>,
    },
}

enum State {
    Idle,
    /// A ticket is out; waiting for `decode_ready`.
    Decoding,
    Cropping(ActiveCropSession),
}

pub struct CropQueue {
    state: State,
    pending: VecDeque<CandidateFile>,
    generation: u64,
    fit_options: FitOptions,
}

impl CropQueue {
    pub fn new(fit_options: FitOptions) -> Self {
        Self {
            state: State::Idle,
            pending: VecDeque::new(),
            generation: 0,
            fit_options,
        }
    }

    /// Append validated files in selection order. If the queue was idle,
    /// the head entry starts decoding and its ticket is returned.
    pub fn enqueue(&mut self, files: Vec<CandidateFile>) -> Option<DecodeTicket> {
        self.pending.extend(files);
        match self.state {
            State::Idle => self.start_next(),
            _ => None,
        }
    }

    /// Complete a decode. A stale ticket (issued before a cancel) is a
    /// no-op. On failure the entry is dropped and the queue advances.
    pub fn decode_ready(
        &mut self,
        ticket: DecodeTicket,
        result: Result<DynamicImage, String>,
    ) -> DecodeOutcome {
        if ticket.generation != self.generation || !matches!(self.state, State::Decoding) {
            tracing::debug!(
                filename = %ticket.candidate.filename,
                "Discarding stale decode result"
            );
            return DecodeOutcome::Stale;
        }

        match result {
            Ok(image) => {
                let (width, height) = image.dimensions();
                let ratio = AspectRatio::from_dimensions(width, height);
                self.state = State::Cropping(ActiveCropSession {
                    candidate: ticket.candidate,
                    image,
                    ratio,
                });
                DecodeOutcome::SessionOpened
            }
            Err(reason) => {
                tracing::warn!(
                    filename = %ticket.candidate.filename,
                    reason = %reason,
                    "Dropping undecodable queue entry"
                );
                self.state = State::Idle;
                DecodeOutcome::Dropped {
                    filename: ticket.candidate.filename,
                    reason,
                    next: self.start_next(),
                }
            }
        }
    }

    /// Confirm the active session at `ratio`: fit the raster and advance.
    /// Errors only when no session is active (e.g. still decoding).
    pub fn confirm(&mut self, ratio: AspectRatio) -> Result<CropOutcome, MediaPrepError> {
        let session = match std::mem::replace(&mut self.state, State::Idle) {
            State::Cropping(session) => session,
            other => {
                self.state = other;
                return Err(MediaPrepError::NoActiveSession);
            }
        };

        let outcome = match AspectRatioFitter::fit(&session.image, ratio, self.fit_options) {
            Ok(image) => CropOutcome::Fitted {
                image,
                next: self.start_next(),
            },
            Err(err) => {
                tracing::warn!(
                    filename = %session.candidate.filename,
                    error = %err,
                    "Compositing failed, dropping entry"
                );
                CropOutcome::Failed {
                    filename: session.candidate.filename,
                    reason: err.to_string(),
                    next: self.start_next(),
                }
            }
        };
        Ok(outcome)
    }

    /// Discard the active session (or the in-flight decode) without
    /// producing an item. Only the active entry is dropped; the rest of the
    /// queue proceeds.
    pub fn cancel(&mut self) -> Option<DecodeTicket> {
        // Invalidate any decode still in flight for the canceled entry.
        self.generation += 1;
        self.state = State::Idle;
        self.start_next()
    }

    pub fn active_session(&self) -> Option<&ActiveCropSession> {
        match &self.state {
            State::Cropping(session) => Some(session),
            _ => None,
        }
    }

    pub fn active_session_mut(&mut self) -> Option<&mut ActiveCropSession> {
        match &mut self.state {
            State::Cropping(session) => Some(session),
            _ => None,
        }
    }

    /// Entries not yet committed to the media set: queued plus the one
    /// being decoded or cropped.
    pub fn in_flight(&self) -> usize {
        let active = match self.state {
            State::Idle => 0,
            _ => 1,
        };
        self.pending.len() + active
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle) && self.pending.is_empty()
    }

    fn start_next(&mut self) -> Option<DecodeTicket> {
        debug_assert!(matches!(self.state, State::Idle));
        let candidate = self.pending.pop_front()?;
        self.state = State::Decoding;
        Some(DecodeTicket {
            generation: self.generation,
            candidate,
        })
    }
}
