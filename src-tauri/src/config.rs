//! Startup configuration.
//!
//! Everything here is fixed once the app starts. Values come from the
//! process environment, optionally seeded from a local `.env` file.

use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const MAX_TOKENS_VAR: &str = "OPENAI_MAX_TOKENS";
pub const TEMPERATURE_VAR: &str = "OPENAI_TEMPERATURE";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Automatic trigger period. The first automatic cycle fires one period
/// after start.
pub const TRIGGER_INTERVAL: Duration = Duration::from_secs(5);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CURSOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Longest side of the image sent to the API, in pixels.
pub const IMAGE_MAX_DIMENSION: u32 = 1024;
pub const JPEG_QUALITY: u8 = 85;

/// Size limits for the overlay window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub initial: (u32, u32),
    pub min: (u32, u32),
    pub max: (u32, u32),
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            initial: (450, 600),
            min: (350, 300),
            max: (800, 1200),
        }
    }
}

/// OpenAI request settings, passed through to the API unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub detail: &'static str,
    pub timeout: Duration,
}

/// Timing of the orchestrator's background loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub trigger_interval: Duration,
    pub cursor_poll: Duration,
    pub request_timeout: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            trigger_interval: TRIGGER_INTERVAL,
            cursor_poll: CURSOR_POLL_INTERVAL,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub loops: LoopConfig,
    pub window: WindowBounds,
}

impl AppConfig {
    /// Load from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, StartupError> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("[CONFIG] Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("[CONFIG] Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(StartupError::MissingApiKey)?;

        let max_tokens = match get(MAX_TOKENS_VAR) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(StartupError::InvalidSetting {
                    key: MAX_TOKENS_VAR,
                    value: raw,
                })?,
            None => DEFAULT_MAX_TOKENS,
        };

        let temperature = match get(TEMPERATURE_VAR) {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or(StartupError::InvalidSetting {
                    key: TEMPERATURE_VAR,
                    value: raw,
                })?,
            None => DEFAULT_TEMPERATURE,
        };

        let base_url = get(BASE_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api: ApiConfig {
                api_key,
                base_url,
                model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens,
                temperature,
                detail: "auto",
                timeout: REQUEST_TIMEOUT,
            },
            loops: LoopConfig::default(),
            window: WindowBounds::default(),
        })
    }
}

/// Conditions that stop the app before any window is shown.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("OPENAI_API_KEY is not set. Export it or add it to a .env file next to the app.")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("Screen capture is unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Failed to initialise the app: {0}")]
    Init(String),
}
