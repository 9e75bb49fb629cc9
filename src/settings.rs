use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::trivia::paginate::DEFAULT_QUESTIONS_PER_PAGE;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub trivia: TriviaSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriviaSettings {
    pub questions_per_page: usize,
    /// Reported as `currentCategory` when listing every question.
    pub all_label: String,
    /// Reported as `currentCategory` by search results.
    pub search_label: String,
}

impl Default for TriviaSettings {
    fn default() -> Self {
        Self {
            questions_per_page: DEFAULT_QUESTIONS_PER_PAGE,
            all_label: "all".to_owned(),
            search_label: "Entertainment".to_owned(),
        }
    }
}

/// Defaults, then the optional file, then `TRIVIA_*` variables
/// (`TRIVIA_SERVER__PORT=9000`).
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let defaults = TriviaSettings::default();
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("database.path", "trivia.db")?
        .set_default(
            "trivia.questions_per_page",
            defaults.questions_per_page as i64,
        )?
        .set_default("trivia.all_label", defaults.all_label)?
        .set_default("trivia.search_label", defaults.search_label)?;
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }
    let settings: Settings = builder
        .add_source(
            Environment::with_prefix("TRIVIA")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    if settings.trivia.questions_per_page == 0 {
        return Err(ConfigError::Message(
            "trivia.questions_per_page must be greater than zero".to_owned(),
        ));
    }
    Ok(settings)
}
