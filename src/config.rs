use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const ARCHIVE_DIR_NAME: &str = "video_data";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_endpoint: String,
    pub transcript_languages: Vec<String>,
    pub archive_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let google_api_key = env::var("GOOGLE_API_KEY")
            .map_err(|_| AppError::ConfigError("Missing GOOGLE_API_KEY".to_string()))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let gemini_model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_endpoint = non_empty_var("GEMINI_ENDPOINT")
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string());

        let transcript_languages = parse_languages(
            &non_empty_var("TRANSCRIPT_LANGUAGES").unwrap_or_else(|| "en".to_string()),
        );

        let archive_dir = match non_empty_var("VIDEO_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_archive_dir()?,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            google_api_key,
            gemini_model,
            gemini_endpoint,
            transcript_languages,
            archive_dir,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `video_data` next to the running executable.
fn default_archive_dir() -> Result<PathBuf> {
    let exe = env::current_exe()
        .map_err(|e| AppError::ConfigError(format!("Cannot locate executable: {}", e)))?;
    let base = exe
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join(ARCHIVE_DIR_NAME))
}

pub fn parse_languages(raw: &str) -> Vec<String> {
    let languages: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();

    if languages.is_empty() {
        vec!["en".to_string()]
    } else {
        languages
    }
}
