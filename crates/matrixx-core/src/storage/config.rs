//! TOML-based engine configuration.
//!
//! Stores:
//! - Reveal pacing for transcript messages and interview questions
//! - Simulated reply delay and the upload size limit
//! - Interview time limit and warning threshold
//!
//! Configuration is stored at `~/.config/matrixx/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::catalog::{self, default_questions};
use crate::error::ConfigError;
use crate::session::EngineSettings;
use crate::timer::RevealTiming;

/// Reveal pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_char_interval")]
    pub char_interval_ms: u64,
    #[serde(default = "default_word_interval")]
    pub word_interval_ms: u64,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_question_initial_delay")]
    pub question_initial_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_reply_delay")]
    pub reply_delay_ms: u64,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Applied to every question.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u32,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_secs: u32,
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
}

fn default_char_interval() -> u64 {
    30
}
fn default_word_interval() -> u64 {
    50
}
fn default_initial_delay() -> u64 {
    150
}
fn default_question_initial_delay() -> u64 {
    300
}
fn default_reply_delay() -> u64 {
    1_000
}
fn default_max_file_size() -> u64 {
    catalog::DEFAULT_MAX_FILE_SIZE_BYTES
}
fn default_time_limit() -> u32 {
    catalog::DEFAULT_TIME_LIMIT_SECS
}
fn default_warning_threshold() -> u32 {
    30
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            char_interval_ms: default_char_interval(),
            word_interval_ms: default_word_interval(),
            initial_delay_ms: default_initial_delay(),
            question_initial_delay_ms: default_question_initial_delay(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit(),
            warning_threshold_secs: default_warning_threshold(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Every field in this config holds an unsigned integer, so leaves are
    /// parsed as `u64` and range-checked on deserialization.
    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        match obj.get(leaf) {
            Some(serde_json::Value::Number(_)) => {}
            _ => return Err(unknown()),
        }

        let n: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{value}' is not a non-negative integer"),
        })?;
        obj.insert(leaf.to_string(), serde_json::Value::Number(n.into()));
        Ok(())
    }

    /// Path of the config file inside [`data_dir`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, in memory. Call [`Config::save`]
    /// to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Every leaf key with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// Runtime settings for a [`crate::SessionController`].
    pub fn engine_settings(&self) -> EngineSettings {
        let message_reveal = RevealTiming {
            char_interval_ms: self.reveal.char_interval_ms,
            word_interval_ms: self.reveal.word_interval_ms,
            initial_delay_ms: self.reveal.initial_delay_ms,
        };
        EngineSettings {
            message_reveal,
            question_reveal: RevealTiming {
                initial_delay_ms: self.reveal.question_initial_delay_ms,
                ..message_reveal
            },
            reply_delay_ms: self.chat.reply_delay_ms,
            max_file_size_bytes: self.chat.max_file_size_bytes,
            warning_threshold_secs: self.interview.warning_threshold_secs,
            questions: default_questions(self.interview.time_limit_secs),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[chat]\nreply_delay_ms = 250\n").unwrap();
        assert_eq!(parsed.chat.reply_delay_ms, 250);
        assert_eq!(parsed.chat.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(parsed.reveal, RevealConfig::default());
        assert_eq!(parsed.interview.time_limit_secs, 120);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("reveal.word_interval_ms").as_deref(), Some("50"));
        assert_eq!(cfg.get("interview.warning_threshold_secs").as_deref(), Some("30"));
        assert!(cfg.get("reveal.missing_key").is_none());
        assert!(cfg.get("reveal").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("chat.reply_delay_ms", "2500").unwrap();
        assert_eq!(cfg.chat.reply_delay_ms, 2_500);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("chat.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("chat", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_invalid_value() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("reveal.char_interval_ms", "fast"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // u32 field overflow surfaces on deserialization
        assert!(matches!(
            cfg.set("interview.time_limit_secs", "99999999999"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn entries_list_every_leaf() {
        let entries = Config::default().entries();
        assert_eq!(entries.len(), 8);
        assert!(entries.contains(&("chat.reply_delay_ms".to_string(), "1000".to_string())));
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("reveal.question_initial_delay_ms", "500").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat\nreply_delay_ms = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn engine_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.set("interview.time_limit_secs", "45").unwrap();
        cfg.set("reveal.question_initial_delay_ms", "0").unwrap();
        let settings = cfg.engine_settings();
        assert!(settings.questions.iter().all(|q| q.time_limit_seconds == 45));
        assert_eq!(settings.question_reveal.initial_delay_ms, 0);
        assert_eq!(settings.question_reveal.char_interval_ms, 30);
        assert_eq!(Config::default().engine_settings(), EngineSettings::default());
    }
}
