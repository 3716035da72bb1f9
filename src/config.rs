use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::pipeline::blanks::{BlankPolicy, MAX_FREQUENCY, MIN_FREQUENCY};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_blank_frequency")]
    pub blank_frequency: u8,
    #[serde(default = "default_only_important_words")]
    pub only_important_words: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_assistant_base_url")]
    pub assistant_base_url: String,
    #[serde(default = "default_assistant_model")]
    pub assistant_model: String,
    /// Name of the environment variable holding the API key; the key itself
    /// never lands in the config file.
    #[serde(default = "default_assistant_key_env")]
    pub assistant_key_env: String,
}

fn default_blank_frequency() -> u8 {
    15
}
fn default_only_important_words() -> bool {
    true
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_assistant_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}
fn default_assistant_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_assistant_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blank_frequency: default_blank_frequency(),
            only_important_words: default_only_important_words(),
            theme: default_theme(),
            assistant_base_url: default_assistant_base_url(),
            assistant_model: default_assistant_model(),
            assistant_key_env: default_assistant_key_env(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clozr")
            .join("config.toml")
    }

    /// Clamp hand-edited values back into documented ranges. Out-of-range
    /// settings are a caller error per the pipeline contract, so they are
    /// fixed here before anything downstream sees them.
    pub fn validate(&mut self) {
        self.blank_frequency = self.blank_frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY);
        if self.assistant_base_url.trim().is_empty() {
            self.assistant_base_url = default_assistant_base_url();
        }
        if self.assistant_model.trim().is_empty() {
            self.assistant_model = default_assistant_model();
        }
        if self.assistant_key_env.trim().is_empty() {
            self.assistant_key_env = default_assistant_key_env();
        }
    }

    pub fn blank_policy(&self) -> BlankPolicy {
        BlankPolicy::new(self.blank_frequency, self.only_important_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_deserializes_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.blank_frequency, 15);
        assert!(config.only_important_words);
        assert_eq!(config.assistant_key_env, "GROQ_API_KEY");
    }

    #[test]
    fn old_file_with_partial_fields_gets_defaults_for_the_rest() {
        let toml_str = r#"
blank_frequency = 25
theme = "terminal-default"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.blank_frequency, 25);
        assert_eq!(config.theme, "terminal-default");
        assert!(config.only_important_words);
        assert!(config.assistant_base_url.contains("groq"));
    }

    #[test]
    fn serde_roundtrip_preserves_settings() {
        let mut config = Config::default();
        config.blank_frequency = 20;
        config.only_important_words = false;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.blank_frequency, 20);
        assert!(!deserialized.only_important_words);
    }

    #[test]
    fn validate_clamps_frequency_into_range() {
        let mut config = Config::default();
        config.blank_frequency = 0;
        config.validate();
        assert_eq!(config.blank_frequency, 5);

        config.blank_frequency = 200;
        config.validate();
        assert_eq!(config.blank_frequency, 30);
    }

    #[test]
    fn validate_restores_blank_assistant_settings() {
        let mut config = Config::default();
        config.assistant_model = "  ".to_string();
        config.validate();
        assert_eq!(config.assistant_model, default_assistant_model());
    }

    #[test]
    fn blank_policy_mirrors_the_config() {
        let mut config = Config::default();
        config.blank_frequency = 22;
        config.only_important_words = false;
        let policy = config.blank_policy();
        assert_eq!(policy.frequency, 22);
        assert!(!policy.only_important_words);
    }
}
