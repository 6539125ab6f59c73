//! ページビューダッシュボードの導出ロジック
//!
//! データセットは構築時に一度だけ正規化・集計し、フィルター変更のたびに
//! [`PageviewDashboard::derive`] でチャートとテーブルを再計算する。

use super::chart::ChartData;
use super::filter::{DateRange, DateRangeSlider, PageviewFilter};
use super::pageviews::{
    aggregate_monthly, distinct_platforms, normalize, platform_totals, MonthlyAggregate,
    NormalizedRecord, PlatformTotal,
};
use super::platform::Platform;
use crate::io::{load_dataset, RawRecord};
use crate::DashboardError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// ページの説明文
pub const PAGE_TITLE: &str = "📱 Social Media Analysis";
pub const DATA_NOT_LOADED_MESSAGE: &str =
    "Data not loaded. Please ensure the dataset was loaded successfully and the data files exist.";
pub const NO_PAGEVIEWS_MESSAGE: &str = "No pageviews found";

/// サマリーテーブルの列名
pub const TOTALS_TABLE_COLUMNS: [&str; 2] = ["platform", "total_views"];

/// サマリーテーブル部分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableSection {
    /// 未フィルターの月次集計が空
    NoData,
    /// フィルター後のプラットフォーム別合計（空のこともある）
    Totals(Vec<PlatformTotal>),
}

/// 1回の描画分の導出結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub date_range: DateRange,
    /// フィルター後の月次集計
    pub filtered: Vec<MonthlyAggregate>,
    pub chart: ChartData,
    pub table: TableSection,
}

impl DashboardView {
    /// 「Displaying data from … to …」の日付表記
    pub fn range_caption(&self) -> String {
        format!(
            "Displaying data from {} to {}",
            self.date_range.start.format("%Y-%m-%d"),
            self.date_range.end.format("%Y-%m-%d")
        )
    }

    /// テーブル見出し
    pub fn table_heading(&self) -> String {
        format!(
            "Pageviews for each platform from {} to {}",
            self.date_range.start.format("%Y-%m-%d"),
            self.date_range.end.format("%Y-%m-%d")
        )
    }
}

/// ダッシュボード本体
#[derive(Debug, Clone, PartialEq)]
pub struct PageviewDashboard {
    records: Vec<NormalizedRecord>,
    monthly: Vec<MonthlyAggregate>,
    platforms: Vec<Platform>,
    slider: DateRangeSlider,
}

impl PageviewDashboard {
    /// データセットを検証して集計する。空なら [`DashboardError::DatasetNotLoaded`]
    pub fn new(records: &[RawRecord]) -> Result<Self, DashboardError> {
        Self::with_slider(records, DateRangeSlider::default())
    }

    pub fn with_slider(records: &[RawRecord], slider: DateRangeSlider) -> Result<Self, DashboardError> {
        if records.is_empty() {
            return Err(DashboardError::DatasetNotLoaded);
        }

        let normalized = normalize(records);
        let monthly = aggregate_monthly(&normalized);
        let platforms = distinct_platforms(&monthly);

        info!(
            record_count = normalized.len(),
            monthly_rows = monthly.len(),
            platform_count = platforms.len(),
            "📊 Pageview dataset aggregated"
        );

        Ok(Self {
            records: normalized,
            monthly,
            platforms,
            slider,
        })
    }

    /// ファイルからデータセットを読み込んでダッシュボードを作る
    pub fn load(path: impl AsRef<Path>, slider: DateRangeSlider) -> Result<Self, DashboardError> {
        let records = load_dataset(path)?;
        Self::with_slider(&records, slider)
    }

    /// 読み込み結果（`None`は未読み込み）からダッシュボードを作る
    pub fn from_loaded(records: Option<&[RawRecord]>) -> Result<Self, DashboardError> {
        match records {
            Some(records) => Self::new(records),
            None => Err(DashboardError::DatasetNotLoaded),
        }
    }

    /// 未フィルターの月次集計
    pub fn monthly(&self) -> &[MonthlyAggregate] {
        &self.monthly
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// プラットフォーム選択肢（集計結果に現れる順）
    pub fn platform_options(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn slider(&self) -> &DateRangeSlider {
        &self.slider
    }

    /// 既定のフィルター（全プラットフォーム・全期間）
    pub fn default_filter(&self) -> PageviewFilter {
        PageviewFilter::all(&self.platforms, &self.slider)
    }

    /// フィルターからチャートとテーブルを導出する（副作用なし）
    pub fn derive(&self, filter: &PageviewFilter) -> DashboardView {
        let filtered_refs = filter.apply(&self.monthly);
        let chart = ChartData::from_rows(&filtered_refs, filter.date_range);

        // 「データなし」判定は未フィルターの集計に対して行う
        let table = if self.monthly.is_empty() {
            TableSection::NoData
        } else {
            TableSection::Totals(platform_totals(filtered_refs.iter().copied()))
        };

        let filtered: Vec<MonthlyAggregate> = filtered_refs.into_iter().cloned().collect();

        debug!(
            selected_platforms = filter.selected_platforms.len(),
            start = %filter.date_range.start,
            end = %filter.date_range.end,
            filtered_rows = filtered.len(),
            "🔄 Dashboard view derived"
        );

        DashboardView {
            date_range: filter.date_range,
            filtered,
            chart,
            table,
        }
    }
}
