use crate::analytics::{ExportFormat, PageviewDashboard, Platform};
use std::path::PathBuf;
use std::sync::Arc;

/// 起動時に注入されるダッシュボードの入力
///
/// 読み込みに失敗した場合は `dashboard` が `None` で `load_error` に理由が入る。
#[derive(Debug, Clone, Default)]
pub struct DashboardContext {
    pub dashboard: Option<Arc<PageviewDashboard>>,
    pub source: Option<PathBuf>,
    pub load_error: Option<String>,
    /// 起動時の選択（`None` なら全選択）
    pub initial_platforms: Option<Vec<Platform>>,
}

impl DashboardContext {
    pub fn loaded(dashboard: PageviewDashboard, source: Option<PathBuf>) -> Self {
        Self {
            dashboard: Some(Arc::new(dashboard)),
            source,
            load_error: None,
            initial_platforms: None,
        }
    }

    pub fn not_loaded(source: Option<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            dashboard: None,
            source,
            load_error: Some(reason.into()),
            initial_platforms: None,
        }
    }

    pub fn with_initial_platforms(mut self, platforms: Option<Vec<Platform>>) -> Self {
        self.initial_platforms = platforms;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.dashboard.is_some()
    }

    /// ソースファイル名（表示用）
    pub fn source_label(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(none)".to_string())
    }
}

impl PartialEq for DashboardContext {
    fn eq(&self, other: &Self) -> bool {
        let same_dashboard = match (&self.dashboard, &other.dashboard) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_dashboard
            && self.source == other.source
            && self.load_error == other.load_error
            && self.initial_platforms == other.initial_platforms
    }
}

/// エクスポートの進行状態
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    InProgress(ExportFormat),
    Completed { path: PathBuf, size_bytes: usize },
    Cancelled,
    Failed(String),
}

impl ExportStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, ExportStatus::InProgress(_))
    }

    /// ステータス表示文
    pub fn message(&self) -> Option<String> {
        match self {
            ExportStatus::Idle => None,
            ExportStatus::InProgress(format) => Some(format!(
                "⏳ Exporting {}...",
                format.file_extension().to_uppercase()
            )),
            ExportStatus::Completed { path, size_bytes } => Some(format!(
                "✅ Saved {} ({} bytes)",
                path.display(),
                size_bytes
            )),
            ExportStatus::Cancelled => Some("Export cancelled".to_string()),
            ExportStatus::Failed(reason) => Some(format!("❌ Export failed: {}", reason)),
        }
    }
}
