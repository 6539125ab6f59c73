pub mod analytics;
pub mod gui;
pub mod io;

use thiserror::Error;

// Re-export the main error types for convenience
pub use analytics::{ChartError, ExportError};
pub use io::DatasetError;

// Re-export the dataset pipeline
pub use analytics::{
    render_line_chart_svg, DashboardView, DateRange, DateRangeSlider, MonthKey, MonthlyAggregate,
    PageviewDashboard, PageviewFilter, Platform, PlatformTotal, TableSection,
};
pub use io::{load_dataset, read_dataset, DatasetFormat, RawRecord};

/// ダッシュボード全体のエラー
#[derive(Error, Debug)]
pub enum DashboardError {
    /// データセットが未読み込み、または空
    #[error("Data not loaded")]
    DatasetNotLoaded,

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// バイナリ層で使う結果型
pub type WikiviewsResult<T> = anyhow::Result<T>;
