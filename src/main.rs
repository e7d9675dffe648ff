use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yt_summary_api::{
    archive::VideoArchive,
    config::Config,
    api::routes::create_router,
    llm::GeminiClient,
    summary::Summarizer,
    transcript::YouTubeTranscripts,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::load()?;
    let server_addr = config.server_addr;

    let generator = GeminiClient::from_config(&config)?;
    info!(model = generator.model(), "Using Gemini model");

    let app_state = AppState {
        summarizer: Summarizer::new(Arc::new(generator)),
        transcripts: Arc::new(YouTubeTranscripts::new(config.transcript_languages.clone())?),
        archive: VideoArchive::new(config.archive_dir.clone()),
    };
    info!(dir = %config.archive_dir.display(), "Video data directory");

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!(%server_addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
