//! アプリケーション設定管理モジュール
//!
//! XDGディレクトリを使用した設定ファイルの永続化と管理を提供します。
//! フィルターの選択状態はセッション内でのみ保持し、ここには保存しません。

use crate::analytics::{slider_max, slider_min, DateRangeSlider, Platform, SLIDER_STEP_DAYS};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// ウィンドウ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub maximized: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 900,
            x: 100,
            y: 100,
            maximized: false,
        }
    }
}

/// ログ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// カスタムログディレクトリ（Noneの場合はXDGデフォルト使用）
    pub log_dir: Option<PathBuf>,
    /// ログレベル (trace/debug/info/warn/error)
    pub log_level: String,
    /// ファイル出力有効化
    pub enable_file_logging: bool,
    /// 保存するログファイル数上限
    pub max_log_files: u32,
    /// 古いログファイル自動削除
    pub auto_cleanup_enabled: bool,
    /// ログファイル名の接頭辞
    pub log_file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_level: "info".to_string(),
            enable_file_logging: true,
            max_log_files: 30,
            auto_cleanup_enabled: true,
            log_file_prefix: "wikiviews".to_string(),
        }
    }
}

/// ダッシュボード設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// スライダー下限
    pub slider_min: NaiveDate,
    /// スライダー上限
    pub slider_max: NaiveDate,
    /// スライダーの刻み（日数）
    pub step_days: i64,
    /// 起動時に選択するプラットフォーム（空なら全選択）
    pub default_platforms: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            slider_min: slider_min(),
            slider_max: slider_max(),
            step_days: SLIDER_STEP_DAYS,
            default_platforms: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn slider(&self) -> DateRangeSlider {
        DateRangeSlider::new(self.slider_min, self.slider_max, self.step_days)
    }

    /// 既定の選択プラットフォーム。空または全て不明なら `None`（全選択）
    pub fn default_selection(&self) -> Option<Vec<Platform>> {
        let platforms: Vec<Platform> = self
            .default_platforms
            .iter()
            .filter_map(|name| match name.parse::<Platform>() {
                Ok(platform) => Some(platform),
                Err(e) => {
                    warn!("⚠️ Ignoring configured platform: {}", e);
                    None
                }
            })
            .collect();

        if platforms.is_empty() {
            None
        } else {
            Some(platforms)
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 起動時に読み込むデータセット
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// ダッシュボード設定
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// ウィンドウ設定
    #[serde(default)]
    pub window: WindowConfig,

    /// ログ設定
    #[serde(default)]
    pub log: LogConfig,
}

/// 設定管理マネージャー
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::with_path(config_path)
    }

    /// 任意のパスを使う設定マネージャー（`--config` 指定時）
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        // 設定ディレクトリを作成（存在しない場合）
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self { config_path })
    }

    /// XDGディレクトリに基づく設定ファイルパスを取得
    fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "wikiviews", "wikiviews")
            .context("Failed to get project directories")?;

        let config_file = project_dirs.config_dir().join("config.toml");

        debug!("Config file path: {}", config_file.display());

        Ok(config_file)
    }

    /// 設定を読み込み
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_exists() {
            info!(
                "Config file not found, using default settings: {}",
                self.config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let config_content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: AppConfig = toml::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        info!(
            "✅ Configuration loaded from: {}",
            self.config_path.display()
        );

        Ok(config)
    }

    /// 設定を保存
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let config_content =
            toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, config_content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        info!("💾 Configuration saved to: {}", self.config_path.display());

        Ok(())
    }

    /// ウィンドウ設定だけを更新して保存（既存設定が壊れている場合は保存しない）
    pub fn save_window(&self, window: &WindowConfig) -> Result<()> {
        let mut config = self.load_config()?;
        config.window = window.clone();
        self.save_config(&config)
    }

    /// 設定ファイルパスを取得（デバッグ用）
    pub fn get_config_file_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// 設定をリセット（デフォルト値に戻す）
    pub fn reset_config(&self) -> Result<()> {
        self.save_config(&AppConfig::default())?;
        info!("🔄 Configuration reset to defaults");
        Ok(())
    }

    /// 設定ファイルが存在するかチェック
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }

    /// 設定ファイルをバックアップ
    pub fn backup_config(&self) -> Result<PathBuf> {
        if !self.config_exists() {
            return Err(anyhow::anyhow!("Config file does not exist"));
        }

        let backup_path = self.config_path.with_extension("toml.bak");
        fs::copy(&self.config_path, &backup_path)
            .with_context(|| format!("Failed to backup config to: {}", backup_path.display()))?;

        info!("📋 Configuration backed up to: {}", backup_path.display());

        Ok(backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
        assert!(serialized.contains("slider_min = \"2017-02-09\""));
    }

    #[test]
    fn test_config_manager_save_load() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let manager = ConfigManager { config_path };
        let original_config = AppConfig {
            data_file: Some(PathBuf::from("/data/st03.csv")),
            ..AppConfig::default()
        };

        // 保存
        manager.save_config(&original_config).unwrap();

        // 読み込み
        let loaded_config = manager.load_config().unwrap();

        assert_eq!(original_config.data_file, loaded_config.data_file);
        assert_eq!(original_config.dashboard, loaded_config.dashboard);
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let manager = ConfigManager { config_path };

        // 存在しないファイルの読み込み時はデフォルトが返される
        let loaded_config = manager.load_config().unwrap();
        assert_eq!(loaded_config, AppConfig::default());
        assert!(!manager.config_exists());
    }

    #[test]
    fn test_config_load_corrupted_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("corrupted.toml");

        // 破損したTOMLファイルを作成
        std::fs::write(&config_path, "invalid toml content [unclosed section").unwrap();

        let manager = ConfigManager { config_path };

        let result = manager.load_config();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_partial_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("partial.toml");

        let partial_toml = r#"
data_file = "pageviews.ndjson"

[dashboard]
step_days = 7
default_platforms = ["TikTok", "youtube"]
"#;
        std::fs::write(&config_path, partial_toml).unwrap();

        let manager = ConfigManager { config_path };
        let loaded_config = manager.load_config().unwrap();

        // 指定されたフィールドは読み込まれ、省略されたフィールドはデフォルト値になる
        assert_eq!(loaded_config.data_file, Some(PathBuf::from("pageviews.ndjson")));
        assert_eq!(loaded_config.dashboard.step_days, 7);
        assert_eq!(loaded_config.dashboard.slider_min, slider_min());
        assert_eq!(loaded_config.window, WindowConfig::default());
        assert_eq!(loaded_config.log.log_level, "info");
        assert_eq!(
            loaded_config.dashboard.default_selection(),
            Some(vec![Platform::TikTok, Platform::Youtube])
        );
    }

    #[test]
    fn test_default_selection_ignores_unknown_names() {
        let config = DashboardConfig {
            default_platforms: vec!["Myspace".to_string()],
            ..DashboardConfig::default()
        };
        assert_eq!(config.default_selection(), None);
        assert_eq!(DashboardConfig::default().default_selection(), None);
    }

    #[test]
    fn test_dashboard_config_slider() {
        let slider = DashboardConfig::default().slider();
        assert_eq!(slider, DateRangeSlider::default());
    }

    #[test]
    fn test_config_save_invalid_path() {
        let config_path = PathBuf::from("/nonexistent/directory/config.toml");
        let manager = ConfigManager { config_path };

        // 存在しないディレクトリへの保存は失敗する
        assert!(manager.save_config(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_save_window_keeps_other_sections() {
        let temp_dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nested/window.toml")).unwrap();

        let config = AppConfig {
            data_file: Some(PathBuf::from("keep.csv")),
            ..AppConfig::default()
        };
        manager.save_config(&config).unwrap();

        let window = WindowConfig {
            width: 1600,
            maximized: true,
            ..WindowConfig::default()
        };
        manager.save_window(&window).unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.window, window);
        assert_eq!(loaded.data_file, Some(PathBuf::from("keep.csv")));
    }

    #[test]
    fn test_config_backup_and_reset() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("backup_test.toml");
        let manager = ConfigManager {
            config_path: config_path.clone(),
        };

        // 存在しない設定はバックアップできない
        assert!(manager.backup_config().is_err());

        let config = AppConfig {
            data_file: Some(PathBuf::from("original.csv")),
            ..AppConfig::default()
        };
        manager.save_config(&config).unwrap();

        let backup_path = manager.backup_config().unwrap();
        assert!(backup_path.exists());

        manager.reset_config().unwrap();
        assert_eq!(manager.load_config().unwrap(), AppConfig::default());

        std::fs::copy(&backup_path, &config_path).unwrap();
        assert_eq!(manager.load_config().unwrap(), config);
    }
}
