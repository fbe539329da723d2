mod parsing;
mod settings;
mod types;

pub use types::{
    AnalysisSettings, ApiSettings, ConfigError, Environment, IntakeSettings, RuntimeSettings,
    SessionSettings, Settings, TelemetrySettings, UiSettings,
};
