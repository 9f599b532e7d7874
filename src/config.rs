//! ユーザー設定
//!
//! `<config_dir>/minimal-timer/config.json` から読み込む。ファイルは任意で、
//! 存在しなければデフォルト値を使う。`MINIMAL_TIMER_CONFIG` でパスを上書きできる。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::hooks::{HookDefinition, DEFAULT_HOOK_TIMEOUT_SECS};
use crate::notification::{validate_title, NotificationError};

/// 設定ファイルのパスを上書きする環境変数
pub const CONFIG_ENV_VAR: &str = "MINIMAL_TIMER_CONFIG";

const CONFIG_DIR_NAME: &str = "minimal-timer";
const CONFIG_FILE_NAME: &str = "config.json";

/// フックタイムアウトの上限（秒）
pub const MAX_HOOK_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("could not determine the config directory")]
    NoConfigDir,
}

/// タイマーの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// 端末ベルを鳴らす
    pub bell: bool,
    /// デスクトップ通知を出す
    pub desktop_notification: bool,
    /// サウンドを再生する
    pub sound: bool,
    /// 再生するサウンドファイル（未指定ならシステムサウンド）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_file: Option<PathBuf>,
    /// デスクトップ通知のタイトル
    pub notification_title: String,
    /// フック定義
    pub hooks: Vec<HookDefinition>,
    /// フックのデフォルトタイムアウト（秒）
    pub hook_timeout: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            bell: true,
            desktop_notification: true,
            sound: true,
            sound_file: None,
            notification_title: "Timer".to_string(),
            hooks: Vec::new(),
            hook_timeout: DEFAULT_HOOK_TIMEOUT_SECS,
        }
    }
}

/// コマンドラインからの上書き
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub no_bell: bool,
    pub no_notify: bool,
    pub no_sound: bool,
}

impl TimerConfig {
    /// 設定ファイルのパス
    ///
    /// 環境変数が設定されていればそれを優先する。
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// デフォルトパスから読み込む
    ///
    /// ファイルが存在しなければデフォルト値を返す。
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        match Self::load_from(&path) {
            Err(ConfigError::NotFound(path)) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// 指定パスから読み込んで検証する
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(
            "Loaded config from {} ({} hooks)",
            path.display(),
            config.hooks.len()
        );
        Ok(config)
    }

    /// 設定値の検証
    ///
    /// # Errors
    /// - 通知タイトルが空、または長すぎる場合
    /// - フック名が空、スクリプトが相対パス、タイムアウトが範囲外の場合
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_title(&self.notification_title).map_err(|e| match e {
            NotificationError::InvalidInput(msg) => ConfigError::Invalid(msg),
            other => ConfigError::Invalid(other.to_string()),
        })?;

        if self.hook_timeout == 0 || self.hook_timeout > MAX_HOOK_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "hook_timeout must be between 1 and {} seconds",
                MAX_HOOK_TIMEOUT_SECS
            )));
        }

        for hook in &self.hooks {
            if hook.name.trim().is_empty() {
                return Err(ConfigError::Invalid("hook name must not be empty".to_string()));
            }
            if !hook.script.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "hook '{}': script must be an absolute path: {}",
                    hook.name,
                    hook.script.display()
                )));
            }
            if let Some(timeout) = hook.timeout {
                if timeout == 0 || timeout > MAX_HOOK_TIMEOUT_SECS {
                    return Err(ConfigError::Invalid(format!(
                        "hook '{}': timeout must be between 1 and {} seconds",
                        hook.name, MAX_HOOK_TIMEOUT_SECS
                    )));
                }
            }
        }

        Ok(())
    }

    /// コマンドラインの指定で上書きする
    ///
    /// フラグは無効化のみで、設定ファイルで無効なものを有効にはしない。
    pub fn apply_args(&mut self, overrides: &ConfigOverrides) {
        if overrides.no_bell {
            self.bell = false;
        }
        if overrides.no_notify {
            self.desktop_notification = false;
        }
        if overrides.no_sound {
            self.sound = false;
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HookEvent;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, content).unwrap();
        path
    }

    // ------------------------------------------------------------------------
    // Defaults
    // ------------------------------------------------------------------------

    #[test]
    fn test_default_config() {
        let config = TimerConfig::default();
        assert!(config.bell);
        assert!(config.desktop_notification);
        assert!(config.sound);
        assert_eq!(config.sound_file, None);
        assert_eq!(config.notification_title, "Timer");
        assert!(config.hooks.is_empty());
        assert_eq!(config.hook_timeout, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TimerConfig = serde_json::from_str(r#"{"sound": false}"#).unwrap();
        assert!(!config.sound);
        assert!(config.bell);
        assert_eq!(config.notification_title, "Timer");
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "bell": false,
                "notification_title": "Tea",
                "hooks": [
                    {"name": "log", "script": "/usr/local/bin/log", "events": ["cancelled"]}
                ],
                "hook_timeout": 10
            }"#,
        );

        let config = TimerConfig::load_from(&path).unwrap();
        assert!(!config.bell);
        assert_eq!(config.notification_title, "Tea");
        assert_eq!(config.hook_timeout, 10);
        assert_eq!(config.hooks.len(), 1);
        assert_eq!(config.hooks[0].events, vec![HookEvent::Cancelled]);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(
            TimerConfig::load_from(&path),
            Err(ConfigError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_from_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");
        let err = TimerConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn test_load_from_invalid_value() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"notification_title": ""}"#);
        assert!(matches!(
            TimerConfig::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_hook_timeout_range() {
        let config = TimerConfig {
            hook_timeout: 0,
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TimerConfig {
            hook_timeout: MAX_HOOK_TIMEOUT_SECS + 1,
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_relative_hook_script() {
        let config = TimerConfig {
            hooks: vec![HookDefinition::new("rel", "hooks/done.sh")],
            ..TimerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("absolute path"));
    }

    #[test]
    fn test_validate_empty_hook_name() {
        let config = TimerConfig {
            hooks: vec![HookDefinition::new(" ", "/bin/true")],
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_hook_individual_timeout() {
        let config = TimerConfig {
            hooks: vec![HookDefinition::new("slow", "/bin/true").with_timeout(0)],
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // ------------------------------------------------------------------------
    // Overrides
    // ------------------------------------------------------------------------

    #[test]
    fn test_apply_args_disables() {
        let mut config = TimerConfig::default();
        config.apply_args(&ConfigOverrides {
            no_bell: true,
            no_notify: false,
            no_sound: true,
        });
        assert!(!config.bell);
        assert!(config.desktop_notification);
        assert!(!config.sound);
    }

    #[test]
    fn test_apply_args_never_enables() {
        let mut config = TimerConfig {
            bell: false,
            ..TimerConfig::default()
        };
        config.apply_args(&ConfigOverrides::default());
        assert!(!config.bell);
    }

    #[test]
    fn test_to_json_round_trips() {
        let config = TimerConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"notification_title\": \"Timer\""));
        let parsed: TimerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
