use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = require("BUSDESK_API_BASE_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BUSDESK_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    let env = parse_environment(&or_default("BUSDESK_ENV", "development"))?;
    let api_token = lookup("BUSDESK_API_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let log_level = or_default("BUSDESK_LOG_LEVEL", "info");
    let cache_dir = PathBuf::from(or_default("BUSDESK_CACHE_DIR", "./.busdesk"));

    let request_timeout_secs = parse_u64("BUSDESK_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BUSDESK_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("BUSDESK_USER_AGENT", "busdesk/0.1 (agency-admin)");
    let max_image_bytes = parse_u64("BUSDESK_MAX_IMAGE_BYTES", "5242880")?;

    Ok(AppConfig {
        env,
        api_base_url,
        api_token,
        log_level,
        cache_dir,
        request_timeout_secs,
        user_agent,
        max_image_bytes,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BUSDESK_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
