use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;

use crate::navigation::Page;

#[derive(Debug, Clone)]
pub struct Settings {
    pub(super) runtime: RuntimeSettings,
    pub(super) api: ApiSettings,
    pub(super) session: SessionSettings,
    pub(super) ui: UiSettings,
    pub(super) intake: IntakeSettings,
    pub(super) analysis: AnalysisSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UiSettings {
    pub initial_page: Page,
}

#[derive(Debug, Clone)]
pub struct IntakeSettings {
    pub max_upload_size_mb: u64,
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub latency_ms: u64,
    pub endpoint: Option<Url>,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub log_level: String,
    pub json: bool,
    pub prometheus_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub environment: Environment,
    pub strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }

    pub(super) fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid url for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("unknown page id for {field}: {value}")]
    UnknownPage { field: &'static str, value: String },
    #[error("missing required setting {0}")]
    Missing(&'static str),
}
