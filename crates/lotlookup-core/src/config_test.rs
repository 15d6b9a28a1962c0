use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.copart_base_url, "https://www.copart.com");
    assert_eq!(cfg.iaai_base_url, "https://www.iaai.com");
    assert_eq!(cfg.user_agent, "Mozilla/5.0");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.resolve_deadline_secs, 90);
    assert_eq!(cfg.navigation_timeout_secs, 60);
    assert_eq!(cfg.render_wait_secs, 15);
    assert_eq!(cfg.copart_strategy, CopartStrategy::Api);
    assert!(cfg.browser_executable.is_none());
    assert!(cfg.browser_headless);
    assert_eq!(cfg.max_concurrent_resolves, 4);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_ENV", "production");
    map.insert("LOTLOOKUP_BIND_ADDR", "127.0.0.1:9000");
    map.insert("LOTLOOKUP_RESOLVE_DEADLINE_SECS", "45");
    map.insert("LOTLOOKUP_COPART_STRATEGY", "Rendered");
    map.insert("LOTLOOKUP_BROWSER_EXECUTABLE", "/usr/bin/chromium");
    map.insert("LOTLOOKUP_BROWSER_HEADLESS", "false");
    map.insert("LOTLOOKUP_MAX_CONCURRENT_RESOLVES", "2");

    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should be valid");

    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:9000");
    assert_eq!(cfg.resolve_deadline_secs, 45);
    assert_eq!(cfg.copart_strategy, CopartStrategy::Rendered);
    assert_eq!(
        cfg.browser_executable.as_deref(),
        Some(std::path::Path::new("/usr/bin/chromium"))
    );
    assert!(!cfg.browser_headless);
    assert_eq!(cfg.max_concurrent_resolves, 2);
}

#[test]
fn blank_browser_executable_is_ignored() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_BROWSER_EXECUTABLE", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.browser_executable.is_none());
}

#[test]
fn invalid_bind_addr_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_BIND_ADDR", "not-a-socket-addr");
    assert_invalid(&map, "LOTLOOKUP_BIND_ADDR");
}

#[test]
fn non_numeric_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_REQUEST_TIMEOUT_SECS", "soon");
    assert_invalid(&map, "LOTLOOKUP_REQUEST_TIMEOUT_SECS");
}

#[test]
fn zero_deadline_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_RESOLVE_DEADLINE_SECS", "0");
    assert_invalid(&map, "LOTLOOKUP_RESOLVE_DEADLINE_SECS");
}

#[test]
fn unknown_copart_strategy_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_COPART_STRATEGY", "scrape");
    assert_invalid(&map, "LOTLOOKUP_COPART_STRATEGY");
}

#[test]
fn invalid_headless_flag_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_BROWSER_HEADLESS", "maybe");
    assert_invalid(&map, "LOTLOOKUP_BROWSER_HEADLESS");
}

#[test]
fn zero_concurrency_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LOTLOOKUP_MAX_CONCURRENT_RESOLVES", "0");
    assert_invalid(&map, "LOTLOOKUP_MAX_CONCURRENT_RESOLVES");
}
