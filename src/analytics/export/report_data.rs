use crate::analytics::{DashboardView, PageviewFilter, TableSection};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// エクスポート用の月次集計行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub platform: String,
    /// `YYYY-MM`
    pub month: String,
    /// 期間マーカー（月末日）
    pub period_end: NaiveDate,
    pub views: i64,
}

/// エクスポート用のプラットフォーム別合計行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRow {
    pub platform: String,
    pub views: i64,
}

/// レポートのメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub selected_platforms: Vec<String>,
    /// 未フィルターの集計が空だったか
    pub no_data: bool,
}

/// エクスポート対象のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    pub metadata: ReportMetadata,
    pub monthly: Vec<MonthlyRow>,
    pub totals: Vec<TotalRow>,
}

impl ReportData {
    /// 導出済みビューからレポートを作成
    pub fn from_view(view: &DashboardView, filter: &PageviewFilter) -> Self {
        let monthly = view
            .filtered
            .iter()
            .map(|row| MonthlyRow {
                platform: row.platform.display_name().to_string(),
                month: row.month.to_string(),
                period_end: row.month.period_end(),
                views: row.total_views,
            })
            .collect();

        let (totals, no_data) = match &view.table {
            TableSection::NoData => (Vec::new(), true),
            TableSection::Totals(totals) => (
                totals
                    .iter()
                    .map(|t| TotalRow {
                        platform: t.platform.display_name().to_string(),
                        views: t.total_views,
                    })
                    .collect(),
                false,
            ),
        };

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                start_date: view.date_range.start,
                end_date: view.date_range.end,
                selected_platforms: filter
                    .selected_platforms
                    .iter()
                    .map(|p| p.display_name().to_string())
                    .collect(),
                no_data,
            },
            monthly,
            totals,
        }
    }

    /// 合計ビュー数
    pub fn grand_total(&self) -> i64 {
        self.totals
            .iter()
            .fold(0i64, |acc, t| acc.saturating_add(t.views))
    }

    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty() && self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::PageviewDashboard;
    use crate::io::RawRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_report_from_view() {
        let records = vec![
            RawRecord::new("Q209330", date(2017, 2, 9), 100),
            RawRecord::new("Q355", date(2017, 2, 9), 300),
            RawRecord::new("Q209330", date(2017, 2, 20), 50),
        ];
        let dashboard = PageviewDashboard::new(&records).unwrap();
        let filter = dashboard.default_filter();
        let view = dashboard.derive(&filter);

        let report = ReportData::from_view(&view, &filter);
        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.monthly[0].platform, "Facebook");
        assert_eq!(report.monthly[0].period_end, date(2017, 2, 28));
        assert_eq!(report.totals[0].platform, "Facebook");
        assert_eq!(report.grand_total(), 450);
        assert!(!report.metadata.no_data);
        assert_eq!(report.metadata.selected_platforms, vec!["Instagram", "Facebook"]);
    }
}
