use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fs::atomic_write;
use crate::i18n::Language;
use crate::paths;
use crate::session::{DEFAULT_FEEDBACK_DELAY, DEFAULT_FEEDBACK_THRESHOLD, SessionOptions};

/// Chatbot service used when neither the CLI nor the config file names one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Default settings in the `[parley]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Base URL of the chatbot service.
    pub endpoint: Option<String>,
    /// Starting conversation language (`en` or `ar`).
    pub language: Option<String>,
}

/// The `[feedback]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Replies below this confidence prompt for feedback.
    pub confidence_threshold: Option<f64>,
    /// Delay before the feedback prompt, in milliseconds.
    pub delay_ms: Option<u64>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/parley/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub parley: ParleyConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub language: Language,
    pub feedback_threshold: f64,
    pub feedback_delay: Duration,
}

impl ResolvedConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            language: self.language,
            feedback_threshold: self.feedback_threshold,
            feedback_delay: self.feedback_delay,
        }
    }
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub endpoint: Option<String>,
    pub language: Option<String>,
}

/// Merges CLI options, the config file and built-in defaults, in that order.
///
/// # Errors
///
/// Returns an error if the endpoint is not an http(s) URL, the language is
/// not supported, or the feedback threshold is outside `[0, 1]`.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let endpoint = options
        .endpoint
        .as_deref()
        .or(config_file.parley.endpoint.as_deref())
        .unwrap_or(DEFAULT_ENDPOINT);
    validate_endpoint(endpoint)?;

    let language = options
        .language
        .as_deref()
        .or(config_file.parley.language.as_deref())
        .map(str::parse::<Language>)
        .transpose()?
        .unwrap_or_default();

    let feedback_threshold = config_file
        .feedback
        .confidence_threshold
        .unwrap_or(DEFAULT_FEEDBACK_THRESHOLD);
    if !(0.0..=1.0).contains(&feedback_threshold) {
        bail!(
            "Invalid feedback.confidence_threshold: {feedback_threshold}\n\n\
             The threshold must be between 0.0 and 1.0."
        );
    }

    let feedback_delay = config_file
        .feedback
        .delay_ms
        .map_or(DEFAULT_FEEDBACK_DELAY, Duration::from_millis);

    Ok(ResolvedConfig {
        endpoint: endpoint.to_string(),
        language,
        feedback_threshold,
        feedback_delay,
    })
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).with_context(|| {
        format!(
            "Invalid endpoint URL: '{endpoint}'\n\n\
             Please provide it via:\n  \
             - CLI option: parley --endpoint <url>\n  \
             - Config file: ~/.config/parley/config.toml"
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid endpoint URL: '{endpoint}' (expected http or https)");
    }

    Ok(())
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Configuration is stored at `$XDG_CONFIG_HOME/parley/config.toml`
    /// or `~/.config/parley/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_write(&self.config_path, &contents)
    }

    /// Missing file means defaults. A file that fails to parse is reported.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = ConfigFile {
            parley: ParleyConfig {
                endpoint: Some("https://bot.example.com".to_string()),
                language: Some("ar".to_string()),
            },
            feedback: FeedbackConfig {
                confidence_threshold: Some(0.5),
                delay_ms: Some(250),
            },
        };

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(
            loaded.parley.endpoint,
            Some("https://bot.example.com".to_string())
        );
        assert_eq!(loaded.parley.language, Some("ar".to_string()));
        assert_eq!(loaded.feedback.confidence_threshold, Some(0.5));
        assert_eq!(loaded.feedback.delay_ms, Some(250));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().unwrap().parley.endpoint.is_none());
    }

    #[test]
    fn test_load_or_default_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[parley\nendpoint = ").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    fn test_partial_file_parses() {
        let config: ConfigFile = toml::from_str("[feedback]\ndelay_ms = 10\n").unwrap();
        assert!(config.parley.endpoint.is_none());
        assert_eq!(config.feedback.delay_ms, Some(10));
    }

    #[test]
    fn test_resolve_built_in_defaults() {
        let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.language, Language::En);
        assert!((resolved.feedback_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(resolved.feedback_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_resolve_invalid_language() {
        let options = ResolveOptions {
            language: Some("fr".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &ConfigFile::default());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid language code")
        );
    }

    #[test]
    fn test_resolve_invalid_endpoint() {
        for endpoint in ["not a url", "ftp://bot.example.com"] {
            let options = ResolveOptions {
                endpoint: Some(endpoint.to_string()),
                ..ResolveOptions::default()
            };
            let result = resolve_config(&options, &ConfigFile::default());
            assert!(result.unwrap_err().to_string().contains("Invalid endpoint"));
        }
    }

    #[test]
    fn test_resolve_threshold_out_of_range() {
        let mut config = ConfigFile::default();
        config.feedback.confidence_threshold = Some(1.5);

        let result = resolve_config(&ResolveOptions::default(), &config);
        assert!(result.unwrap_err().to_string().contains("threshold"));
    }

    #[test]
    fn test_session_options_from_resolved() {
        let mut config = ConfigFile::default();
        config.parley.language = Some("ar".to_string());
        config.feedback.delay_ms = Some(50);

        let options = resolve_config(&ResolveOptions::default(), &config)
            .unwrap()
            .session_options();

        assert_eq!(options.language, Language::Ar);
        assert_eq!(options.feedback_delay, Duration::from_millis(50));
    }
}
