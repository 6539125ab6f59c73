use clap::Parser;
use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::prelude::*;
use std::path::PathBuf;
use std::sync::Mutex;
use wikiviews::{
    gui::{config_manager, utils, DashboardContext, MainWindow},
    DashboardError, PageviewDashboard, WikiviewsResult,
};

/// ウィンドウ設定の保存用
static LAST_WINDOW_CONFIG: Mutex<Option<config_manager::WindowConfig>> = Mutex::new(None);

/// 設定ファイルの保存先（`--config` 指定時はそのパス）
static CONFIG_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Wikipedia pageview dashboard for social media platforms
#[derive(Parser, Debug)]
#[command(name = "wikiviews", version, about)]
struct Cli {
    /// Dataset file (.csv, .ndjson, .jsonl or .json)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn app() -> Element {
    let window = dioxus::desktop::use_window();

    // リサイズ・移動のたびに最新のウィンドウ状態を記録
    dioxus::desktop::use_wry_event_handler(move |event, _| {
        if let Event::WindowEvent {
            event: WindowEvent::Resized(_) | WindowEvent::Moved(_),
            ..
        } = event
        {
            let current_size = window.inner_size();
            let current_position = window.outer_position().unwrap_or_default();

            let window_config = config_manager::WindowConfig {
                width: current_size.width,
                height: current_size.height,
                x: current_position.x,
                y: current_position.y,
                maximized: window.is_maximized(),
            };

            if let Ok(mut last_config) = LAST_WINDOW_CONFIG.lock() {
                *last_config = Some(window_config);
            }
        }
    });

    rsx! {
        MainWindow {}
    }
}

fn open_config_manager(path: Option<PathBuf>) -> anyhow::Result<config_manager::ConfigManager> {
    match path {
        Some(path) => config_manager::ConfigManager::with_path(path),
        None => config_manager::ConfigManager::new(),
    }
}

/// データセットを読み込んでコンテキストを作る（失敗してもUIは警告表示で起動する）
fn build_context(cli: &Cli, config: &config_manager::AppConfig) -> DashboardContext {
    let source = cli.data.clone().or_else(|| config.data_file.clone());
    let initial_platforms = config.dashboard.default_selection();

    let Some(path) = source.clone() else {
        tracing::warn!("⚠️ No dataset configured; pass --data or set data_file in the config");
        return DashboardContext::not_loaded(None, "no dataset file configured");
    };

    match PageviewDashboard::load(&path, config.dashboard.slider()) {
        Ok(dashboard) => {
            tracing::info!(
                path = %path.display(),
                platforms = dashboard.platform_options().len(),
                "✅ Dataset loaded"
            );
            DashboardContext::loaded(dashboard, source).with_initial_platforms(initial_platforms)
        }
        Err(DashboardError::DatasetNotLoaded) => {
            tracing::warn!(path = %path.display(), "⚠️ Dataset is empty");
            DashboardContext::not_loaded(source, "dataset is empty")
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "❌ Failed to load dataset: {}", e);
            DashboardContext::not_loaded(source, e.to_string())
        }
    }
}

fn main() -> WikiviewsResult<()> {
    let cli = Cli::parse();

    let config_manager = open_config_manager(cli.config.clone())?;
    let (mut config, config_load_error) = match config_manager.load_config() {
        Ok(config) => (config, None),
        Err(e) => (config_manager::AppConfig::default(), Some(e)),
    };

    let _log_guard = utils::init_logging(&config.log)?;

    tracing::info!("🎬 Starting wikiviews dashboard");
    if let Some(e) = config_load_error {
        tracing::warn!("設定読み込みエラー、デフォルト設定を使用: {}", e);
    }

    if let Ok(mut path) = CONFIG_PATH.lock() {
        *path = Some(config_manager.get_config_file_path().clone());
    }

    let context = build_context(&cli, &config);

    // ウィンドウ位置を最低限の範囲に調整
    utils::validate_window_bounds(&mut config.window);

    tracing::info!(
        "🪟 ウィンドウ設定: {}x{} at ({}, {}), 最大化: {}",
        config.window.width,
        config.window.height,
        config.window.x,
        config.window.y,
        config.window.maximized
    );

    let launch_builder = dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::tao::window::WindowBuilder::new()
                    .with_title("wikiviews - Social Media Pageviews")
                    .with_inner_size(dioxus::desktop::tao::dpi::LogicalSize::new(
                        config.window.width as f64,
                        config.window.height as f64,
                    ))
                    .with_position(dioxus::desktop::tao::dpi::LogicalPosition::new(
                        config.window.x as f64,
                        config.window.y as f64,
                    ))
                    .with_maximized(config.window.maximized)
                    .with_resizable(true),
            ),
        )
        .with_context(context);

    // Ctrl+Cシグナルハンドラー
    ctrlc::set_handler(move || {
        tracing::info!("🛑 終了シグナルを受信しました");
        save_window_config_on_exit();
        std::process::exit(0);
    })
    .map_err(|e| DashboardError::Configuration(format!("Failed to set signal handler: {}", e)))?;

    launch_builder.launch(app);

    // 正常終了時の設定保存
    save_window_config_on_exit();

    tracing::info!("👋 wikiviews shutting down");
    Ok(())
}

/// 終了時にウィンドウ設定を保存
fn save_window_config_on_exit() {
    let window_config = match LAST_WINDOW_CONFIG.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => None,
    };
    let Some(window_config) = window_config else {
        tracing::debug!("保存する最新のウィンドウ設定が見つかりませんでした");
        return;
    };

    let config_path = CONFIG_PATH.lock().ok().and_then(|guard| guard.clone());
    match open_config_manager(config_path) {
        Ok(manager) => match manager.save_window(&window_config) {
            Ok(()) => tracing::info!(
                "💾 ウィンドウ設定を保存しました: {}x{} at ({}, {}), 最大化: {}",
                window_config.width,
                window_config.height,
                window_config.x,
                window_config.y,
                window_config.maximized
            ),
            Err(e) => tracing::error!("設定保存エラー: {}", e),
        },
        Err(e) => tracing::error!("ConfigManagerの作成に失敗しました: {}", e),
    }
}
