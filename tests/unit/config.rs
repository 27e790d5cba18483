//! Unit tests for configuration

use levelcache::config::{parse_patterns, CacheConfig, DEFAULT_CACHE_NAMESPACE};
use levelcache::logging::{is_production, LogFormat};

#[test]
fn test_cache_config_default() {
    let config = CacheConfig::default();
    assert_eq!(config.namespace, DEFAULT_CACHE_NAMESPACE);
    assert_eq!(
        config.transient_patterns,
        vec!["rate limit", "too many requests", "quota"]
    );
}

#[test]
fn test_parse_patterns() {
    assert_eq!(
        parse_patterns(" Rate Limit, ,overloaded ,"),
        vec!["rate limit".to_string(), "overloaded".to_string()]
    );
    assert!(parse_patterns("").is_empty());
}

#[test]
fn test_cache_config_from_env() {
    std::env::set_var("CACHE_NAMESPACE", "test_ns_");
    std::env::set_var("CACHE_TRANSIENT_PATTERNS", "busy,try again");

    let config = CacheConfig::from_env();

    std::env::remove_var("CACHE_NAMESPACE");
    std::env::remove_var("CACHE_TRANSIENT_PATTERNS");

    assert_eq!(config.namespace, "test_ns_");
    assert_eq!(config.transient_patterns, vec!["busy", "try again"]);
}

#[test]
fn test_production_detection() {
    assert!(is_production("production"));
    assert!(is_production("prod"));
    assert!(!is_production("sandbox"));
}

#[test]
fn test_log_format_resolution() {
    assert_eq!(LogFormat::resolve("production", None), LogFormat::Json);
    assert_eq!(LogFormat::resolve("sandbox", None), LogFormat::Pretty);
    assert_eq!(LogFormat::resolve("sandbox", Some("JSON")), LogFormat::Json);
    assert_eq!(LogFormat::resolve("production", Some("pretty")), LogFormat::Pretty);
    assert_eq!(LogFormat::resolve("production", Some("xml")), LogFormat::Json);
}
