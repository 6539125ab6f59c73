use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub mod csv_exporter;
pub mod excel_exporter;
pub mod json_exporter;
pub mod report_data;

pub use csv_exporter::CsvExporter;
pub use excel_exporter::ExcelExporter;
pub use json_exporter::JsonExporter;
pub use report_data::{MonthlyRow, ReportData, ReportMetadata, TotalRow};

/// エクスポート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// 拡張子から形式を推定
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Some(ExportFormat::Csv),
            Some("json") => Some(ExportFormat::Json),
            Some("xlsx") => Some(ExportFormat::Excel),
            _ => None,
        }
    }
}

/// エクスポート対象テーブル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportScope {
    /// フィルター後の月次集計
    MonthlyViews,
    /// プラットフォーム別合計（サマリーテーブル）
    PlatformTotals,
}

/// エクスポートエラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported format: {format:?}")]
    UnsupportedFormat { format: ExportFormat },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

/// エクスポート設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub scope: ExportScope,
    pub include_metadata: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            scope: ExportScope::PlatformTotals,
            include_metadata: true,
        }
    }
}

/// フォーマットハンドラートレイト
pub trait FormatHandler: Send + Sync {
    fn export(&self, data: &ReportData, config: &ExportConfig) -> Result<Vec<u8>, ExportError>;
    fn file_extension(&self) -> &str;
}

/// エクスポートマネージャー
pub struct ExportManager {
    format_handlers: HashMap<ExportFormat, Box<dyn FormatHandler>>,
}

impl ExportManager {
    /// 新しいエクスポートマネージャーを作成
    pub fn new() -> Self {
        let mut manager = Self {
            format_handlers: HashMap::new(),
        };

        // デフォルトハンドラーを登録
        manager.register_handler(ExportFormat::Csv, Box::new(CsvExporter::new()));
        manager.register_handler(ExportFormat::Json, Box::new(JsonExporter::new()));
        manager.register_handler(ExportFormat::Excel, Box::new(ExcelExporter::new()));

        manager
    }

    /// フォーマットハンドラーを登録
    pub fn register_handler(&mut self, format: ExportFormat, handler: Box<dyn FormatHandler>) {
        self.format_handlers.insert(format, handler);
    }

    /// データをエクスポート
    pub fn export(
        &self,
        data: &ReportData,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let handler =
            self.format_handlers
                .get(&config.format)
                .ok_or(ExportError::UnsupportedFormat {
                    format: config.format,
                })?;

        handler.export(data, config)
    }

    /// エクスポートしてファイルに書き込む
    pub fn export_to_file(
        &self,
        data: &ReportData,
        config: &ExportConfig,
        path: &Path,
    ) -> Result<usize, ExportError> {
        let bytes = self.export(data, config)?;
        std::fs::write(path, &bytes)?;

        tracing::info!(
            path = %path.display(),
            format = ?config.format,
            scope = ?config.scope,
            size_bytes = bytes.len(),
            "💾 Report exported"
        );

        Ok(bytes.len())
    }

    /// サポートされている形式を取得
    pub fn supported_formats(&self) -> Vec<ExportFormat> {
        self.format_handlers.keys().copied().collect()
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}
