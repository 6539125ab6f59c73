// Core modules
pub mod config_manager; // 設定管理モジュール
pub mod models;
pub mod utils;

// Dioxus UI components
pub mod components;
pub mod styles;

pub use components::MainWindow;
pub use config_manager::{AppConfig, ConfigManager, DashboardConfig, LogConfig, WindowConfig};
pub use models::{DashboardContext, ExportStatus};
