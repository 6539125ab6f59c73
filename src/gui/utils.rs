// GUI用ユーティリティ関数

use crate::gui::config_manager::{LogConfig, WindowConfig};
use anyhow::Context;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログディレクトリを決定（未指定ならXDGデータディレクトリ配下）
pub fn resolve_log_dir(config: &LogConfig) -> Option<PathBuf> {
    if let Some(dir) = &config.log_dir {
        return Some(dir.clone());
    }
    ProjectDirs::from("dev", "wikiviews", "wikiviews")
        .map(|dirs| dirs.data_local_dir().join("logs"))
}

/// ログ初期化
///
/// コンソールにはコンパクト形式、ファイルには日次ローテーションのJSON形式で出力する。
/// 返されたガードはプロセス終了まで保持すること。
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to build log filter")?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact();

    let mut guard = None;
    let mut log_dir_in_use = None;
    let file_layer = if config.enable_file_logging {
        match resolve_log_dir(config) {
            Some(log_dir) => {
                std::fs::create_dir_all(&log_dir).with_context(|| {
                    format!("Failed to create log directory: {}", log_dir.display())
                })?;

                let file_appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(config.log_file_prefix.as_str())
                    .filename_suffix("log")
                    .build(&log_dir)
                    .context("Failed to create log appender")?;

                let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
                guard = Some(worker_guard);
                log_dir_in_use = Some(log_dir);

                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
            }
            None => None,
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(log_dir) = log_dir_in_use {
        info!(log_dir = %log_dir.display(), "📝 File logging enabled");
        if config.auto_cleanup_enabled {
            match cleanup_old_logs(&log_dir, &config.log_file_prefix, config.max_log_files as usize) {
                Ok(removed) if removed > 0 => info!(removed, "🧹 Old log files removed"),
                Ok(_) => {}
                Err(e) => warn!("⚠️ Log cleanup failed: {}", e),
            }
        }
    }

    Ok(guard)
}

/// 上限を超えた古いログファイルを削除し、削除数を返す
pub fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_files: usize) -> anyhow::Result<usize> {
    let pattern = log_dir.join(format!("{}.*.log", glob::Pattern::escape(prefix)));
    let pattern = pattern.to_string_lossy();

    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid log file pattern: {}", pattern))?
        .filter_map(Result::ok)
        .collect();

    if files.len() <= max_files {
        return Ok(0);
    }

    // ファイル名に日付が入るため名前順が時系列順
    files.sort();
    let excess = files.len() - max_files;
    let mut removed = 0;
    for path in files.into_iter().take(excess) {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "🗑️ Log file removed");
                removed += 1;
            }
            Err(e) => warn!(path = %path.display(), "⚠️ Failed to remove log file: {}", e),
        }
    }

    Ok(removed)
}

/// UI更新のパフォーマンス測定
pub struct UiUpdateTimer {
    start: std::time::Instant,
    context: String,
}

impl UiUpdateTimer {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            start: std::time::Instant::now(),
            context: context.into(),
        }
    }
}

impl Drop for UiUpdateTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        if duration.as_millis() > 16 {
            // 60fps以下の場合警告
            warn!(
                context = %self.context,
                duration_ms = duration.as_millis(),
                "⚠️ Slow UI update detected"
            );
        } else {
            debug!(
                context = %self.context,
                duration_ms = duration.as_millis(),
                "✅ UI update completed"
            );
        }
    }
}

/// エラー詳細のログ
pub fn log_error_with_context(error: &anyhow::Error, context: &str) {
    error!(
        context = context,
        error = %error,
        error_chain = ?error.chain().map(|e| e.to_string()).collect::<Vec<_>>(),
        "❌ Error occurred"
    );
}

/// ファイル操作のログ
pub fn log_file_operation(
    operation: &str,
    file_path: &str,
    success: bool,
    size_bytes: Option<usize>,
) {
    if success {
        info!(
            operation = operation,
            file_path = file_path,
            size_bytes = size_bytes,
            "📁 File operation successful"
        );
    } else {
        error!(
            operation = operation,
            file_path = file_path,
            "❌ File operation failed"
        );
    }
}

/// ウィンドウ位置・サイズを最低限の範囲に収める
pub fn validate_window_bounds(config: &mut WindowConfig) {
    if config.x < 0 {
        config.x = 100;
    }
    if config.y < 0 {
        config.y = 100;
    }
    if config.width < 640 {
        config.width = 640;
    }
    if config.height < 480 {
        config.height = 480;
    }
    debug!(
        "🖥️ Window bounds: {}x{} at ({}, {})",
        config.width, config.height, config.x, config.y
    );
}
