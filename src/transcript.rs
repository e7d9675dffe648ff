use async_trait::async_trait;
use tracing::debug;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use crate::error::{Result, AppError};

/// One timed caption line as returned by the transcript provider.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Offset from the start of the video, in seconds.
    pub start: f64,
    pub text: String,
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;
}

/// Caption retrieval backed by YouTube's public transcript endpoints.
pub struct YouTubeTranscripts {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl YouTubeTranscripts {
    pub fn new(languages: Vec<String>) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| AppError::ConfigError(format!("Failed to build transcript client: {}", e)))?;
        Ok(Self { api, languages })
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| AppError::UpstreamFetch(e.to_string()))?;

        debug!(
            video_id,
            language = %transcript.language_code,
            snippets = transcript.snippets.len(),
            "Fetched transcript"
        );

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| TranscriptSegment {
                start: snippet.start,
                text: snippet.text,
            })
            .collect())
    }
}

/// `MM:SS` from a second offset. Minutes are not wrapped into hours.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn format_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| format!("[{}] {}", format_timestamp(segment.start), segment.text))
        .collect::<Vec<_>>()
        .join("\n")
}
