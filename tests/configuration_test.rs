// ABOUTME: Environment-driven configuration tests for the server, envelope, and provider selection
// ABOUTME: Serialized because every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety
#![allow(clippy::unwrap_used)]

mod common;

use std::env;
use std::fs;

use anyhow::Result;
use serial_test::serial;
use spotter_safety::{ConfigError, SafetyEnvelope};
use spotter_server::config::{env_keys, LlmProviderType, ServerConfig};
use spotter_server::llm::{create_provider, LlmProvider};
use spotter_server::stores::load_library_file;
use tempfile::TempDir;

const SERVER_KEYS: &[&str] = &[
    env_keys::HOST,
    env_keys::PORT,
    env_keys::DATABASE_URL,
    env_keys::GENERATION_TIMEOUT_SECS,
    env_keys::REQUEST_TIMEOUT_SECS,
    LlmProviderType::ENV_VAR,
];

const ENVELOPE_KEYS: &[&str] = &[
    "SPOTTER_MAX_DURATION_MINUTES",
    "SPOTTER_MAX_SETS_PER_EXERCISE",
    "SPOTTER_MAX_REPS_PER_SET",
    "SPOTTER_SAFETY_RULES_PATH",
];

fn clear(keys: &[&str]) {
    for key in keys {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_server_config_defaults() -> Result<()> {
    clear(SERVER_KEYS);

    let config = ServerConfig::from_env()?;

    assert_eq!(config.bind_address(), "127.0.0.1:8081");
    assert_eq!(config.generation_timeout_secs, 30);
    assert_eq!(config.llm_provider, LlmProviderType::Groq);
    Ok(())
}

#[test]
#[serial]
fn test_server_config_overrides() -> Result<()> {
    clear(SERVER_KEYS);
    env::set_var(env_keys::PORT, "9090");
    env::set_var(env_keys::GENERATION_TIMEOUT_SECS, "5");
    env::set_var(env_keys::REQUEST_TIMEOUT_SECS, "20");
    env::set_var(LlmProviderType::ENV_VAR, "off");

    let config = ServerConfig::from_env()?;
    clear(SERVER_KEYS);

    assert_eq!(config.port, 9090);
    assert_eq!(config.generation_timeout().as_secs(), 5);
    assert_eq!(config.request_timeout().as_secs(), 20);
    assert_eq!(config.llm_provider, LlmProviderType::Disabled);
    Ok(())
}

#[test]
#[serial]
fn test_server_config_rejects_bad_values() {
    clear(SERVER_KEYS);
    env::set_var(env_keys::PORT, "eighty");
    assert!(matches!(ServerConfig::from_env(), Err(ConfigError::Parse(_))));
    clear(SERVER_KEYS);

    env::set_var(env_keys::GENERATION_TIMEOUT_SECS, "60");
    env::set_var(env_keys::REQUEST_TIMEOUT_SECS, "30");
    assert!(matches!(ServerConfig::from_env(), Err(ConfigError::InvalidRange(_))));
    clear(SERVER_KEYS);
}

#[test]
#[serial]
fn test_disabled_provider_creates_nothing() {
    let provider = create_provider(LlmProviderType::Disabled).unwrap();
    assert!(provider.is_none());
}

#[test]
#[serial]
fn test_groq_without_key_is_config_error() {
    env::remove_var("GROQ_API_KEY");
    assert!(create_provider(LlmProviderType::Groq).is_err());
}

#[test]
#[serial]
fn test_local_provider_needs_no_key() {
    env::remove_var("LOCAL_LLM_API_KEY");
    let provider = create_provider(LlmProviderType::Local).unwrap().unwrap();
    assert_eq!(provider.name(), "local");
    assert!(!provider.capabilities().supports_json_mode());
}

#[test]
#[serial]
fn test_envelope_overrides_and_ceiling() -> Result<()> {
    clear(ENVELOPE_KEYS);
    env::set_var("SPOTTER_MAX_SETS_PER_EXERCISE", "4");
    let envelope = SafetyEnvelope::load()?;
    assert_eq!(envelope.max_sets_per_exercise, 4);

    env::set_var("SPOTTER_MAX_SETS_PER_EXERCISE", "12");
    assert!(SafetyEnvelope::load().is_err());
    clear(ENVELOPE_KEYS);
    Ok(())
}

#[test]
#[serial]
fn test_envelope_rules_file_replaces_defaults() -> Result<()> {
    clear(ENVELOPE_KEYS);
    let dir = TempDir::new()?;
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"{
            "exercise_blacklist": ["Plank"],
            "injury_restrictions": {},
            "medical_contraindications": {},
            "high_risk_exercises": {}
        }"#,
    )?;
    env::set_var("SPOTTER_SAFETY_RULES_PATH", &path);

    let envelope = SafetyEnvelope::load()?;
    clear(ENVELOPE_KEYS);

    assert!(envelope.rules.is_blacklisted("plank"));
    assert!(!envelope.rules.is_blacklisted("upright row"));
    Ok(())
}

#[test]
fn test_library_file_validation() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("library.json");
    fs::write(
        &path,
        r#"[{"id": "x", "name": "X", "category": "core", "movement_pattern": "hold",
             "safety_rating": 9, "difficulty_level": 1}]"#,
    )?;
    assert!(load_library_file(&path).is_err());

    fs::write(&path, "not json")?;
    assert!(load_library_file(&path).is_err());

    assert!(load_library_file(&dir.path().join("missing.json")).is_err());
    assert!(!load_library_file(&common::library_path())?.is_empty());
    Ok(())
}
