use std::env;
use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use toml::Value;
use upsell_core::config::{resolve_config_path, AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_token(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    let fields: Vec<(&str, String, &str)> = vec![
        ("rental_api.base_url", config.rental_api.base_url.clone(), "UPSELL_RENTAL_API_BASE_URL"),
        (
            "rental_api.timeout_secs",
            config.rental_api.timeout_secs.to_string(),
            "UPSELL_RENTAL_API_TIMEOUT_SECS",
        ),
        ("catalog.source", format!("{:?}", config.catalog.source), "UPSELL_CATALOG_SOURCE"),
        (
            "catalog.cache_dir",
            config.catalog.cache_dir.display().to_string(),
            "UPSELL_CATALOG_CACHE_DIR",
        ),
        (
            "catalog.refresh_interval_secs",
            config.catalog.refresh_interval_secs.to_string(),
            "UPSELL_CATALOG_REFRESH_INTERVAL_SECS",
        ),
        (
            "selection.budget_slack_multiplier",
            config.selection.budget_slack_multiplier.to_string(),
            "UPSELL_SELECTION_BUDGET_SLACK_MULTIPLIER",
        ),
        (
            "selection.mid_tier_threshold",
            config.selection.mid_tier_threshold.to_string(),
            "UPSELL_SELECTION_MID_TIER_THRESHOLD",
        ),
        (
            "selection.premium_tier_threshold",
            config.selection.premium_tier_threshold.to_string(),
            "UPSELL_SELECTION_PREMIUM_TIER_THRESHOLD",
        ),
        ("llm.provider", format!("{:?}", config.llm.provider), "UPSELL_LLM_PROVIDER"),
        ("llm.model", config.llm.model.clone(), "UPSELL_LLM_MODEL"),
        (
            "llm.base_url",
            config.llm.effective_base_url().unwrap_or_else(|| "<unset>".to_string()),
            "UPSELL_LLM_BASE_URL",
        ),
        ("llm.api_key", api_key, "UPSELL_LLM_API_KEY"),
        ("server.bind_address", config.server.bind_address.clone(), "UPSELL_SERVER_BIND_ADDRESS"),
        ("server.port", config.server.port.to_string(), "UPSELL_SERVER_PORT"),
        ("logging.level", config.logging.level.clone(), "UPSELL_LOGGING_LEVEL"),
        ("logging.format", format!("{:?}", config.logging.format), "UPSELL_LOGGING_FORMAT"),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.into_iter().map(|(key, value, env_key)| {
        let source = field_source(
            key,
            env_key,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        format!("- {key} = {value} (source: {source})")
    }));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
