use axum::{
    routing::{get, post},
    Router,
    extract::{Json, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{Result, AppError};
use crate::api::models::{
    StoreResponse, SummarizeRequest, SummaryResponse, TranscriptQuery, TranscriptResponse,
};
use crate::api::response;
use crate::summary::{ContractVersion, SummaryInput};
use crate::transcript::format_transcript;
use crate::AppState;

pub const LIVENESS_MESSAGE: &str = "YouTube Summarizer API is running!";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/transcript", get(transcript_handler))
        .route("/summarize", post(summarize_v1_handler))
        .route("/api/summarize", post(summarize_v2_handler))
        .route("/api/store-video-data", post(store_video_data_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

/// A JSON body whose rejection is turned into an `AppError` by the handler.
type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn transcript_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<TranscriptQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let video_id = query
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::MissingInput("No video_id provided".to_string()))?;

    let segments = state.transcripts.fetch(&video_id).await.map_err(|err| {
        warn!(%video_id, error = %err, "Transcript fetch failed");
        match err {
            AppError::UpstreamFetch(msg) => AppError::UpstreamFetch(msg),
            other => AppError::UpstreamFetch(other.to_string()),
        }
    })?;

    info!(%video_id, segments = segments.len(), "Transcript fetched");
    Ok(response::success(TranscriptResponse {
        transcript: format_transcript(&segments),
        status: "success".to_string(),
    }))
}

/// Legacy contract: defaults to `concise`, upstream failures are 500.
pub async fn summarize_v1_handler(
    State(state): State<AppState>,
    body: JsonBody<SummarizeRequest>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    let summary = state
        .summarizer
        .summarize(ContractVersion::V1, summary_input(&req))
        .await?;

    Ok(response::success(SummaryResponse { summary }))
}

/// Current contract: defaults to `insights`, HTML output, upstream failures are 400.
pub async fn summarize_v2_handler(
    State(state): State<AppState>,
    body: JsonBody<SummarizeRequest>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    match state
        .summarizer
        .summarize(ContractVersion::V2, summary_input(&req))
        .await
    {
        Ok(summary) => response::success(SummaryResponse { summary }).into_response(),
        Err(AppError::UpstreamGeneration(msg)) => {
            response::error(StatusCode::BAD_REQUEST, msg).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn store_video_data_handler(
    State(state): State<AppState>,
    body: JsonBody<Value>,
) -> Result<impl IntoResponse> {
    let Json(payload) = body?;
    let filename = state.archive.store(&payload).await?;

    Ok(response::success(StoreResponse {
        status: "success".to_string(),
        filename,
    }))
}

fn summary_input(req: &SummarizeRequest) -> SummaryInput<'_> {
    SummaryInput {
        transcript: req.transcript.as_deref(),
        summary_type: req.summary_type.as_ref().map(|value| value.as_deref()),
        format: req.format.as_deref(),
        video_id: req.video_id.as_deref(),
    }
}
