//! ダッシュボード導出の統合テスト
//!
//! データセット読み込みからチャート・テーブル導出までを通しで確認する

use chrono::NaiveDate;
use std::io::Write;
use wikiviews::{
    analytics::{render_line_chart_svg, ChartStyle, PlatformTotal},
    DashboardError, DateRange, MonthKey, MonthlyAggregate, PageviewDashboard, PageviewFilter,
    Platform, RawRecord, TableSection,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn full_range() -> DateRange {
    DateRange::new(date(2017, 2, 9), date(2021, 12, 31))
}

fn instagram_february() -> Vec<RawRecord> {
    vec![
        RawRecord::new("Q209330", date(2017, 2, 9), 100),
        RawRecord::new("Q209330", date(2017, 2, 20), 50),
    ]
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_daily_rows_sum_into_one_month() {
        let dashboard = PageviewDashboard::new(&instagram_february()).unwrap();

        assert_eq!(
            dashboard.monthly(),
            &[MonthlyAggregate {
                platform: Platform::Instagram,
                month: MonthKey {
                    year: 2017,
                    month: 2
                },
                total_views: 150,
            }]
        );
        assert_eq!(dashboard.platform_options(), &[Platform::Instagram]);
    }

    #[test]
    fn test_unselected_platform_gives_empty_table_not_no_data() {
        let dashboard = PageviewDashboard::new(&instagram_february()).unwrap();
        let filter = PageviewFilter::new([Platform::TikTok], full_range());

        let view = dashboard.derive(&filter);

        assert!(view.filtered.is_empty());
        assert!(view.chart.is_empty());
        // 未フィルターの集計は空ではないので「データなし」にはならない
        assert_eq!(view.table, TableSection::Totals(Vec::new()));
    }

    #[test]
    fn test_totals_sorted_descending() {
        let mut records = instagram_february();
        records.push(RawRecord::new("Q355", date(2017, 2, 15), 300));
        let dashboard = PageviewDashboard::new(&records).unwrap();

        let view = dashboard.derive(&dashboard.default_filter());

        assert_eq!(
            view.table,
            TableSection::Totals(vec![
                PlatformTotal {
                    platform: Platform::Facebook,
                    total_views: 300,
                },
                PlatformTotal {
                    platform: Platform::Instagram,
                    total_views: 150,
                },
            ])
        );
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_empty_dataset_is_not_loaded() {
        let result = PageviewDashboard::new(&[]);
        assert!(matches!(result, Err(DashboardError::DatasetNotLoaded)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Data not loaded"
        );
    }

    #[test]
    fn test_inverted_range_selects_nothing() {
        let dashboard = PageviewDashboard::new(&instagram_february()).unwrap();
        let filter = PageviewFilter::new(
            [Platform::Instagram],
            DateRange::new(date(2021, 1, 1), date(2017, 1, 1)),
        );

        let view = dashboard.derive(&filter);

        assert!(view.filtered.is_empty());
        assert_eq!(view.table, TableSection::Totals(Vec::new()));
    }

    #[test]
    fn test_only_unknown_qids_yields_no_data_section() {
        let records = vec![
            RawRecord::new("Q1", date(2018, 5, 1), 10),
            RawRecord::new("Q2", date(2018, 5, 2), 20),
        ];
        let dashboard = PageviewDashboard::new(&records).unwrap();

        assert!(dashboard.monthly().is_empty());
        assert!(dashboard.platform_options().is_empty());

        let view = dashboard.derive(&dashboard.default_filter());
        assert_eq!(view.table, TableSection::NoData);
    }

    #[test]
    fn test_unknown_qids_are_dropped_from_totals() {
        let mut records = instagram_february();
        records.push(RawRecord::new("Q999999", date(2017, 2, 10), 1_000));
        let dashboard = PageviewDashboard::new(&records).unwrap();

        let view = dashboard.derive(&dashboard.default_filter());

        assert_eq!(
            view.table,
            TableSection::Totals(vec![PlatformTotal {
                platform: Platform::Instagram,
                total_views: 150,
            }])
        );
        // 正規化済みレコードには残る
        assert_eq!(dashboard.records().len(), 3);
    }

    #[test]
    fn test_month_is_compared_by_its_last_day() {
        let records = vec![RawRecord::new("Q866", date(2019, 3, 2), 42)];
        let dashboard = PageviewDashboard::new(&records).unwrap();

        // 3月31日を含まない範囲では3月の集計は除外される
        let early = PageviewFilter::new(
            [Platform::Youtube],
            DateRange::new(date(2019, 3, 1), date(2019, 3, 30)),
        );
        assert!(dashboard.derive(&early).filtered.is_empty());

        let whole = PageviewFilter::new(
            [Platform::Youtube],
            DateRange::new(date(2019, 3, 1), date(2019, 3, 31)),
        );
        assert_eq!(dashboard.derive(&whole).filtered.len(), 1);
    }
}

#[cfg(test)]
mod load_and_render_tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_load_csv_file_into_dashboard() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "qid,date,views").unwrap();
        writeln!(file, "Q209330,2017-02-09,100").unwrap();
        writeln!(file, "Q209330,2017-02-20,50").unwrap();
        writeln!(file, "Q918,2017-03-01,75").unwrap();
        file.flush().unwrap();

        let dashboard = PageviewDashboard::load(file.path(), Default::default()).unwrap();

        assert_eq!(
            dashboard.platform_options(),
            &[Platform::Instagram, Platform::Twitter]
        );
        let view = dashboard.derive(&dashboard.default_filter());
        assert_eq!(view.filtered.len(), 2);
        assert_eq!(
            view.range_caption(),
            "Displaying data from 2017-02-09 to 2021-12-31"
        );
    }

    #[test]
    fn test_load_header_only_file_is_not_loaded() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "qid,date,views").unwrap();
        file.flush().unwrap();

        let result = PageviewDashboard::load(file.path(), Default::default());
        assert!(matches!(result, Err(DashboardError::DatasetNotLoaded)));
    }

    #[test]
    fn test_load_unsupported_extension_is_dataset_error() {
        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let result = PageviewDashboard::load(file.path(), Default::default());
        assert!(matches!(result, Err(DashboardError::Dataset(_))));
    }

    #[test]
    fn test_rendered_chart_contains_series_names() {
        let mut records = instagram_february();
        records.push(RawRecord::new("Q355", date(2017, 3, 15), 300));
        let dashboard = PageviewDashboard::new(&records).unwrap();
        let view = dashboard.derive(&dashboard.default_filter());

        assert_eq!(view.chart.series.len(), 2);

        let svg = render_line_chart_svg(&view.chart, &ChartStyle::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Instagram"));
        assert!(svg.contains("Facebook"));
        assert!(svg.contains("#E193ED"));
        assert!(svg.contains("#156EC8"));
    }

    #[test]
    fn test_overflowing_views_do_not_panic() {
        let records = vec![
            RawRecord::new("Q355", date(2018, 1, 1), i64::MAX),
            RawRecord::new("Q355", date(2018, 1, 2), 1),
        ];
        let dashboard = PageviewDashboard::new(&records).unwrap();
        let view = dashboard.derive(&dashboard.default_filter());

        assert_eq!(
            view.table,
            TableSection::Totals(vec![PlatformTotal {
                platform: Platform::Facebook,
                total_views: i64::MAX,
            }])
        );
    }
}
