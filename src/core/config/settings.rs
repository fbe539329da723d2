use std::path::PathBuf;

use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_environment, parse_page, parse_positive_u64,
    parse_u64, parse_url,
};
use super::types::{
    AnalysisSettings, ApiSettings, ConfigError, IntakeSettings, RuntimeSettings, SessionSettings,
    Settings, TelemetrySettings, UiSettings,
};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/exec";

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            parse_environment(env_optional("TUTOR_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("TUTOR_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let raw_api_url = env_optional("TUTOR_API_URL");
        if strict_config && raw_api_url.is_none() {
            return Err(ConfigError::Missing("TUTOR_API_URL"));
        }
        let base_url =
            parse_url("TUTOR_API_URL", raw_api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()))?;

        let session_file =
            PathBuf::from(env_or_default("TUTOR_SESSION_FILE", ".tutor_session.json"));
        let initial_page =
            parse_page("TUTOR_INITIAL_PAGE", env_or_default("TUTOR_INITIAL_PAGE", "dashboard"))?;

        let max_upload_size_mb =
            parse_positive_u64("MAX_UPLOAD_SIZE_MB", env_or_default("MAX_UPLOAD_SIZE_MB", "20"))?;

        let latency_ms =
            parse_u64("ANALYSIS_LATENCY_MS", env_or_default("ANALYSIS_LATENCY_MS", "2000"))?;
        let endpoint = env_optional("ANALYSIS_ENDPOINT")
            .map(|value| parse_url("ANALYSIS_ENDPOINT", value))
            .transpose()?;

        let log_level = env_or_default("TUTOR_LOG_LEVEL", "info");
        let json = env_optional("TUTOR_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        Ok(Self {
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { base_url },
            session: SessionSettings { file: session_file },
            ui: UiSettings { initial_page },
            intake: IntakeSettings { max_upload_size_mb },
            analysis: AnalysisSettings { latency_ms, endpoint },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        })
    }

    pub fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub fn session(&self) -> &SessionSettings {
        &self.session
    }

    pub fn ui(&self) -> &UiSettings {
        &self.ui
    }

    pub fn intake(&self) -> &IntakeSettings {
        &self.intake
    }

    pub fn analysis(&self) -> &AnalysisSettings {
        &self.analysis
    }

    pub fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }
}
