/*!
 * Tests for application configuration functionality
 */

use log::LevelFilter;
use wikilibs::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.article.endpoint, "https://en.wikipedia.org/w/api.php");
    assert_eq!(config.article.namespace, 0);
    assert_eq!(config.article.thumbnail_size, 300);
    assert_eq!(config.article.timeout_secs, 30);
    assert!(config.article.user_agent.starts_with("wikilibs/"));
    assert_eq!(config.speech.language, "en");
    assert_eq!(config.speech.program, "espeak-ng");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.speech.language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.speech.language = "en-US".to_string();
    assert!(config.validate().is_ok());

    config.article.endpoint = "ftp://example.org/api.php".to_string();
    assert!(config.validate().is_err());
    config.article.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.article.endpoint = "https://fr.wikipedia.org/w/api.php".to_string();
    assert!(config.validate().is_ok());

    config.article.thumbnail_size = 0;
    assert!(config.validate().is_err());
    config.article.thumbnail_size = 120;

    config.article.timeout_secs = 0;
    assert!(config.validate().is_err());
    config.article.timeout_secs = 5;

    config.speech.program = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "wikilibs.json",
        r#"{ "speech": { "language": "fr" }, "log_level": "debug" }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.speech.language, "fr");
    assert_eq!(config.speech.program, "espeak-ng");
    assert_eq!(config.article.thumbnail_size, 300);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "broken.json", "{ not json").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("wikilibs.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.article.endpoint, created.article.endpoint);
    assert_eq!(reloaded.speech.language, created.speech.language);
}

#[test]
fn test_logLevel_shouldConvertToLevelFilter() {
    assert_eq!(LevelFilter::from(&LogLevel::Error), LevelFilter::Error);
    assert_eq!(LevelFilter::from(&LogLevel::Trace), LevelFilter::Trace);
}
