use std::sync::OnceLock;

use anyhow::Result;
use config::Config;
use serde::Deserialize;
use uuid::Uuid;

use crate::constants::{CONFIG_FILE, ENV_PREFIX};

static CONFIG: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub overrides: OverrideConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub ids: IdConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideConfig {
    /// Reject immutable members found in a recurrence delta instead of
    /// skipping them.
    #[serde(default)]
    pub strict_immutable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdConfig {
    #[serde(default)]
    pub version: IdVersion,
}

/// UUID flavour used for freshly generated collection keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdVersion {
    #[default]
    V4,
    V7,
}

impl IdVersion {
    /// ## Summary
    /// Generates a new identifier of this version.
    #[must_use]
    pub fn generate(self) -> Uuid {
        match self {
            Self::V4 => Uuid::new_v4(),
            Self::V7 => Uuid::now_v7(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `jscal.toml` and `JSCAL_`-prefixed environment
    /// variables into a `Settings`. Environment variables take precedence over
    /// file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("overrides.strict_immutable", false)?
            .set_default("output.pretty", false)?
            .set_default("ids.version", "v4")?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            // Env, e.g. JSCAL_OVERRIDES__STRICT_IMMUTABLE=true
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file and installs
/// it as the process-wide settings.
///
/// If settings were already installed (by an earlier call, or by `get_config`
/// falling back to defaults) the installed settings are returned unchanged.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<&'static Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(?settings, "Configuration loaded");

    Ok(CONFIG.get_or_init(|| settings))
}

/// ## Summary
/// Returns the process-wide settings, installing the defaults if nothing was
/// loaded yet.
pub fn get_config() -> &'static Settings {
    CONFIG.get_or_init(Settings::default)
}
