use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::offer::policy::SelectionPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "upsell.toml";
pub const NESTED_CONFIG_FILE: &str = "config/upsell.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub rental_api: RentalApiConfig,
    pub catalog: CatalogConfig,
    pub selection: SelectionPolicy,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct RentalApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub source: CatalogSourceKind,
    pub cache_dir: PathBuf,
    /// Zero disables the background refresh.
    pub refresh_interval_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSourceKind {
    Remote,
    Cache,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Heuristic,
    OpenAi,
    Ollama,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub rental_api_base_url: Option<String>,
    pub catalog_source: Option<CatalogSourceKind>,
    pub catalog_cache_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub llm_api_key: Option<String>,
    pub server_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rental_api: RentalApiConfig {
                base_url: "https://hackatum25.sixt.io".to_string(),
                timeout_secs: 15,
            },
            catalog: CatalogConfig {
                source: CatalogSourceKind::Remote,
                cache_dir: PathBuf::from("."),
                refresh_interval_secs: 0,
            },
            selection: SelectionPolicy::default(),
            llm: LlmConfig {
                provider: LlmProvider::Heuristic,
                api_key: None,
                base_url: None,
                model: "gpt-4o".to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for CatalogSourceKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "cache" => Ok(Self::Cache),
            other => Err(ConfigError::Validation(format!(
                "unsupported catalog source `{other}` (expected remote|cache)"
            ))),
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected heuristic|openai|ollama)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl LlmConfig {
    /// Chat-completions root for the configured provider.
    pub fn effective_base_url(&self) -> Option<String> {
        if let Some(base_url) = &self.base_url {
            return Some(base_url.trim_end_matches('/').to_string());
        }
        match self.provider {
            LlmProvider::OpenAi => Some("https://api.openai.com/v1".to_string()),
            LlmProvider::Ollama => Some("http://localhost:11434/v1".to_string()),
            LlmProvider::Heuristic => None,
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(rental_api) = patch.rental_api {
            if let Some(base_url) = rental_api.base_url {
                self.rental_api.base_url = base_url;
            }
            if let Some(timeout_secs) = rental_api.timeout_secs {
                self.rental_api.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(source) = catalog.source {
                self.catalog.source = source;
            }
            if let Some(cache_dir) = catalog.cache_dir {
                self.catalog.cache_dir = cache_dir;
            }
            if let Some(refresh_interval_secs) = catalog.refresh_interval_secs {
                self.catalog.refresh_interval_secs = refresh_interval_secs;
            }
        }

        if let Some(selection) = patch.selection {
            if let Some(multiplier) = selection.budget_slack_multiplier {
                self.selection.budget_slack_multiplier = multiplier;
            }
            if let Some(threshold) = selection.mid_tier_threshold {
                self.selection.mid_tier_threshold = threshold;
            }
            if let Some(threshold) = selection.premium_tier_threshold {
                self.selection.premium_tier_threshold = threshold;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("UPSELL_RENTAL_API_BASE_URL") {
            self.rental_api.base_url = value;
        }
        if let Some(value) = read_env("UPSELL_RENTAL_API_TIMEOUT_SECS") {
            self.rental_api.timeout_secs = parse_u64("UPSELL_RENTAL_API_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("UPSELL_CATALOG_SOURCE") {
            self.catalog.source = value.parse()?;
        }
        if let Some(value) = read_env("UPSELL_CATALOG_CACHE_DIR") {
            self.catalog.cache_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("UPSELL_CATALOG_REFRESH_INTERVAL_SECS") {
            self.catalog.refresh_interval_secs =
                parse_u64("UPSELL_CATALOG_REFRESH_INTERVAL_SECS", &value)?;
        }

        if let Some(value) = read_env("UPSELL_SELECTION_BUDGET_SLACK_MULTIPLIER") {
            self.selection.budget_slack_multiplier =
                parse_decimal("UPSELL_SELECTION_BUDGET_SLACK_MULTIPLIER", &value)?;
        }
        if let Some(value) = read_env("UPSELL_SELECTION_MID_TIER_THRESHOLD") {
            self.selection.mid_tier_threshold =
                parse_decimal("UPSELL_SELECTION_MID_TIER_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("UPSELL_SELECTION_PREMIUM_TIER_THRESHOLD") {
            self.selection.premium_tier_threshold =
                parse_decimal("UPSELL_SELECTION_PREMIUM_TIER_THRESHOLD", &value)?;
        }

        if let Some(value) = read_env("UPSELL_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        if let Some(value) = read_env("UPSELL_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("UPSELL_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("UPSELL_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("UPSELL_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("UPSELL_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("UPSELL_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("UPSELL_SERVER_PORT") {
            self.server.port = parse_u16("UPSELL_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("UPSELL_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("UPSELL_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("UPSELL_LOGGING_LEVEL").or_else(|| read_env("UPSELL_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("UPSELL_LOGGING_FORMAT").or_else(|| read_env("UPSELL_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.rental_api_base_url {
            self.rental_api.base_url = base_url;
        }
        if let Some(source) = overrides.catalog_source {
            self.catalog.source = source;
        }
        if let Some(cache_dir) = overrides.catalog_cache_dir {
            self.catalog.cache_dir = cache_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rental_api(&self.rental_api)?;
        validate_catalog(&self.catalog)?;
        validate_selection(&self.selection)?;
        validate_llm(&self.llm)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Path of the config file `load` would read, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_rental_api(rental_api: &RentalApiConfig) -> Result<(), ConfigError> {
    let base_url = rental_api.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "rental_api.base_url must start with http:// or https://".to_string(),
        ));
    }

    if rental_api.timeout_secs == 0 || rental_api.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "rental_api.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.cache_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("catalog.cache_dir must not be empty".to_string()));
    }

    if catalog.refresh_interval_secs != 0 && catalog.refresh_interval_secs < 10 {
        return Err(ConfigError::Validation(
            "catalog.refresh_interval_secs must be 0 (disabled) or at least 10".to_string(),
        ));
    }

    Ok(())
}

fn validate_selection(selection: &SelectionPolicy) -> Result<(), ConfigError> {
    if selection.budget_slack_multiplier <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "selection.budget_slack_multiplier must be greater than zero".to_string(),
        ));
    }

    if selection.mid_tier_threshold < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "selection.mid_tier_threshold must not be negative".to_string(),
        ));
    }

    if selection.mid_tier_threshold >= selection.premium_tier_threshold {
        return Err(ConfigError::Validation(
            "selection.mid_tier_threshold must be below selection.premium_tier_threshold"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    match llm.provider {
        LlmProvider::OpenAi => {
            let missing = llm
                .api_key
                .as_ref()
                .map(|value| value.expose_secret().trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.api_key is required for the openai provider".to_string(),
                ));
            }
        }
        LlmProvider::Ollama | LlmProvider::Heuristic => {}
    }

    if llm.provider != LlmProvider::Heuristic && llm.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "llm.model is required when an llm provider is configured".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.trim().parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    rental_api: Option<RentalApiPatch>,
    catalog: Option<CatalogPatch>,
    selection: Option<SelectionPatch>,
    llm: Option<LlmPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RentalApiPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    source: Option<CatalogSourceKind>,
    cache_dir: Option<PathBuf>,
    refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SelectionPatch {
    budget_slack_multiplier: Option<Decimal>,
    mid_tier_threshold: Option<Decimal>,
    premium_tier_threshold: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
