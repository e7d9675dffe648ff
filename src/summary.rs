//! Summary prompt selection and the summarization flow shared by both
//! summarize routes.
//!
//! Two contract versions coexist. `V1` (`/summarize`) defaults to `concise`
//! and leaves formatting to the model. `V2` (`/api/summarize`) defaults to
//! `insights`, swaps the meaning of `concise` and `insights`, and asks for
//! compact inline HTML unless the caller opts out.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::llm::TextGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractVersion {
    V1,
    V2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryType {
    Concise,
    Insights,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Html,
}

impl ContractVersion {
    pub fn default_summary_type(self) -> SummaryType {
        match self {
            ContractVersion::V1 => SummaryType::Concise,
            ContractVersion::V2 => SummaryType::Insights,
        }
    }

    pub fn default_format(self) -> OutputFormat {
        match self {
            ContractVersion::V1 => OutputFormat::Plain,
            ContractVersion::V2 => OutputFormat::Html,
        }
    }
}

impl SummaryType {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryType::Concise => "concise",
            SummaryType::Insights => "insights",
            SummaryType::Detailed => "detailed",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "concise" => Some(SummaryType::Concise),
            "insights" => Some(SummaryType::Insights),
            "detailed" => Some(SummaryType::Detailed),
            _ => None,
        }
    }
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "plain" => Some(OutputFormat::Plain),
            "html" => Some(OutputFormat::Html),
            _ => None,
        }
    }
}

const V1_CONCISE: &str = "You are a YouTube summarizer. Generate a single, concise paragraph (under 20 words) summarizing this transcript. The main thing to judge is how valuable this video is: is it clickbait or a superb use of the viewer's time?";
const V1_INSIGHTS: &str = "You are a YouTube summarizer. Generate a bulleted list of the key insights from this transcript. Start each bullet point with an emoji. Focus on the main ideas.";
const V1_DETAILED: &str = "You are a YouTube summarizer. Generate a detailed, multi-paragraph summary (under 450 words) of this transcript. Use a clear structure and bullet points covering all main topics and supporting details.";

const V2_INSIGHTS: &str = "You are a YouTube summarizer. Generate a single, concise paragraph (under 20 words) summarizing this transcript. The main thing to judge is how valuable this video is: is it clickbait or a superb use of the viewer's time?";
const V2_CONCISE: &str = "You are a YouTube summarizer. Generate at most five concise bullet points with the key insights from this transcript. Start each bullet point with an emoji. Focus on the main ideas.";
const V2_DETAILED: &str = "You are a YouTube summarizer. Generate a detailed, multi-paragraph summary (under 450 words) of this transcript. Use a clear structure and bullet points covering all main topics and supporting details.";

const HTML_RULE: &str = "Format the answer as compact inline HTML using only <p>, <ul>, <li>, <strong> and <em>. Do not use Markdown, code fences, an <html> or <body> wrapper, or blank lines between elements.";
const LANGUAGE_RULE: &str = "Respond in the same language as the transcript: if the transcript is in Arabic, respond in Arabic; if it is in English, respond in English; otherwise use the transcript's language.";

/// The full instruction block that precedes the transcript.
pub fn template(version: ContractVersion, summary_type: SummaryType, format: OutputFormat) -> String {
    let body = match (version, summary_type) {
        (ContractVersion::V1, SummaryType::Concise) => V1_CONCISE,
        (ContractVersion::V1, SummaryType::Insights) => V1_INSIGHTS,
        (ContractVersion::V1, SummaryType::Detailed) => V1_DETAILED,
        (ContractVersion::V2, SummaryType::Concise) => V2_CONCISE,
        (ContractVersion::V2, SummaryType::Insights) => V2_INSIGHTS,
        (ContractVersion::V2, SummaryType::Detailed) => V2_DETAILED,
    };
    match format {
        OutputFormat::Plain => format!("{body} {LANGUAGE_RULE}\n\nTranscript: "),
        OutputFormat::Html => format!("{body} {HTML_RULE} {LANGUAGE_RULE}\n\nTranscript: "),
    }
}

/// Template followed by the transcript, byte for byte. No escaping or truncation.
pub fn build_prompt(template: &str, transcript: &str) -> String {
    let mut result = String::with_capacity(template.len() + transcript.len());
    result.push_str(template);
    result.push_str(transcript);
    result
}

/// Caller-supplied summarize parameters, still in wire form.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub transcript: Option<&'a str>,
    /// `None` when the field was absent, `Some(None)` when it was `null`.
    pub summary_type: Option<Option<&'a str>>,
    pub format: Option<&'a str>,
    pub video_id: Option<&'a str>,
}

#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Validates the input and resolves the selector into a complete prompt.
    pub fn prepare(version: ContractVersion, input: &SummaryInput<'_>) -> Result<(SummaryType, String)> {
        let transcript = input
            .transcript
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::MissingInput("No transcript provided".to_string()))?;

        let summary_type = match input.summary_type {
            None => version.default_summary_type(),
            Some(raw) => raw
                .and_then(SummaryType::parse)
                .ok_or_else(|| AppError::InvalidSelector("Invalid summary_type".to_string()))?,
        };

        let format = match (version, input.format) {
            (ContractVersion::V2, Some(raw)) => OutputFormat::parse(raw)
                .ok_or_else(|| AppError::InvalidSelector("Invalid format".to_string()))?,
            _ => version.default_format(),
        };

        let prompt = build_prompt(&template(version, summary_type, format), transcript);
        Ok((summary_type, prompt))
    }

    /// Calls the generator exactly once; validation failures return before any call.
    pub async fn summarize(&self, version: ContractVersion, input: SummaryInput<'_>) -> Result<String> {
        let (summary_type, prompt) = Self::prepare(version, &input)?;
        let video_id = input.video_id.unwrap_or("-");

        match self.generator.generate(&prompt).await {
            Ok(summary) => {
                info!(summary_type = summary_type.as_str(), video_id, "Summary generated successfully");
                Ok(summary)
            }
            Err(err) => {
                warn!(summary_type = summary_type.as_str(), video_id, error = %err, "Error generating summary");
                Err(match err {
                    AppError::UpstreamGeneration(msg) => AppError::UpstreamGeneration(msg),
                    other => AppError::UpstreamGeneration(other.to_string()),
                })
            }
        }
    }
}
