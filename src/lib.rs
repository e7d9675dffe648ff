pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod llm;
pub mod summary;
pub mod transcript;

use std::sync::Arc;
use archive::VideoArchive;
use summary::Summarizer;
use transcript::TranscriptSource;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Summarizer,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub archive: VideoArchive,
}
