use config::{Config, ConfigError, Environment, File as ConfigFile};
use glob::Pattern;
use serde::Deserialize;
use tracing::error;

pub const DEFAULT_SIDECAR_EXTENSION: &str = "xmp";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Extension (without the dot) that marks a metadata sidecar.
    pub sidecar_extension: String,
    /// Glob patterns for paths the scanner never descends into.
    pub ignore_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sidecar_extension: DEFAULT_SIDECAR_EXTENSION.to_string(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Suffix appended to a base file's full name to form its sidecar name, e.g. `.xmp`.
    pub fn sidecar_suffix(&self) -> String {
        format!(".{}", self.sidecar_extension.trim_start_matches('.'))
    }

    /// Compiled ignore globs. Invalid patterns are logged and dropped.
    pub fn ignore_globs(&self) -> Vec<Pattern> {
        self.ignore_patterns
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect()
    }
}

/// Load `Config.toml` (optional) and `NAME_TIDY_*` environment overrides on top of the defaults.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("sidecar_extension", DEFAULT_SIDECAR_EXTENSION)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("NAME_TIDY"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
