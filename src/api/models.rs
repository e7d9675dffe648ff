use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
pub struct TranscriptQuery {
    pub video_id: Option<String>,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
    pub status: String,
}

/// Body of both summarize routes. Every field is optional on the wire so that
/// omissions surface as `MissingInput` rather than a deserialization rejection.
#[derive(Deserialize, Default)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub transcript: Option<String>,
    /// Outer `None` when absent, inner `None` when sent as `null`.
    #[serde(default, deserialize_with = "present")]
    pub summary_type: Option<Option<String>>,
    #[serde(default)]
    pub video_id: Option<String>,
    /// Only honoured by `/api/summarize`.
    #[serde(default)]
    pub format: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Serialize)]
pub struct StoreResponse {
    pub status: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_selector_are_distinct() {
        let absent: SummarizeRequest = serde_json::from_str(r#"{"transcript":"hi"}"#).unwrap();
        let null: SummarizeRequest =
            serde_json::from_str(r#"{"transcript":"hi","summary_type":null}"#).unwrap();
        let given: SummarizeRequest =
            serde_json::from_str(r#"{"transcript":"hi","summary_type":"detailed"}"#).unwrap();

        assert_eq!(absent.summary_type, None);
        assert_eq!(null.summary_type, Some(None));
        assert_eq!(given.summary_type, Some(Some("detailed".to_string())));
    }
}
