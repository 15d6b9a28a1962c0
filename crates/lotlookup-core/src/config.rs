use crate::app_config::{AppConfig, CopartStrategy, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; defaults target the public Copart and IAAI sites.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(invalid(var, "must be greater than zero".to_owned())),
            secs => Ok(secs),
        }
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let env = parse_environment(&or_default("LOTLOOKUP_ENV", "development"));

    let bind_addr = or_default("LOTLOOKUP_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LOTLOOKUP_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("LOTLOOKUP_LOG_LEVEL", "info");

    let copart_base_url = or_default("LOTLOOKUP_COPART_BASE_URL", "https://www.copart.com");
    let iaai_base_url = or_default("LOTLOOKUP_IAAI_BASE_URL", "https://www.iaai.com");
    let user_agent = or_default("LOTLOOKUP_USER_AGENT", "Mozilla/5.0");

    let request_timeout_secs = parse_secs("LOTLOOKUP_REQUEST_TIMEOUT_SECS", "30")?;
    let resolve_deadline_secs = parse_secs("LOTLOOKUP_RESOLVE_DEADLINE_SECS", "90")?;
    let navigation_timeout_secs = parse_secs("LOTLOOKUP_NAVIGATION_TIMEOUT_SECS", "60")?;
    let render_wait_secs = parse_secs("LOTLOOKUP_RENDER_WAIT_SECS", "15")?;

    let copart_strategy = parse_copart_strategy(&or_default("LOTLOOKUP_COPART_STRATEGY", "api"))
        .ok_or_else(|| {
            invalid(
                "LOTLOOKUP_COPART_STRATEGY",
                "expected \"api\" or \"rendered\"".to_owned(),
            )
        })?;

    let browser_executable = lookup("LOTLOOKUP_BROWSER_EXECUTABLE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);
    let browser_headless = parse_bool("LOTLOOKUP_BROWSER_HEADLESS", "true")?;

    let max_concurrent_resolves = match or_default("LOTLOOKUP_MAX_CONCURRENT_RESOLVES", "4")
        .parse::<usize>()
        .map_err(|e| invalid("LOTLOOKUP_MAX_CONCURRENT_RESOLVES", e.to_string()))?
    {
        0 => {
            return Err(invalid(
                "LOTLOOKUP_MAX_CONCURRENT_RESOLVES",
                "must be greater than zero".to_owned(),
            ))
        }
        n => n,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        copart_base_url,
        iaai_base_url,
        user_agent,
        request_timeout_secs,
        resolve_deadline_secs,
        navigation_timeout_secs,
        render_wait_secs,
        copart_strategy,
        browser_executable,
        browser_headless,
        max_concurrent_resolves,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_copart_strategy(s: &str) -> Option<CopartStrategy> {
    match s.to_ascii_lowercase().as_str() {
        "api" => Some(CopartStrategy::Api),
        "rendered" => Some(CopartStrategy::Rendered),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
