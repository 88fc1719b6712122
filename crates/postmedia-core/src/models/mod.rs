pub mod aspect;
pub mod candidate;
pub mod media;
pub mod post;

pub use aspect::AspectRatio;
pub use candidate::CandidateFile;
pub use media::{FittedImage, MediaItem};
pub use post::{PostResponse, PostUpdate, UploadBatchResponse};
