//! レポートエクスポートの統合テスト
//!
//! ダッシュボードの導出結果を各形式でファイルに書き出す

use chrono::NaiveDate;
use tempfile::tempdir;
use wikiviews::analytics::{ExportConfig, ExportFormat, ExportManager, ExportScope, ReportData};
use wikiviews::{DateRange, PageviewDashboard, PageviewFilter, Platform, RawRecord};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_report(platforms: &[Platform]) -> ReportData {
    let records = vec![
        RawRecord::new("Q209330", date(2017, 2, 9), 100),
        RawRecord::new("Q209330", date(2017, 2, 20), 50),
        RawRecord::new("Q355", date(2017, 2, 15), 300),
        RawRecord::new("Q355", date(2017, 3, 1), 25),
    ];
    let dashboard = PageviewDashboard::new(&records).unwrap();
    let filter = PageviewFilter::new(
        platforms.iter().copied(),
        DateRange::new(date(2017, 2, 9), date(2017, 12, 31)),
    );
    let view = dashboard.derive(&filter);
    ReportData::from_view(&view, &filter)
}

#[test]
fn test_totals_csv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("totals.csv");
    let report = sample_report(&[Platform::Instagram, Platform::Facebook]);

    let config = ExportConfig {
        include_metadata: false,
        ..ExportConfig::default()
    };
    let size = ExportManager::new()
        .export_to_file(&report, &config, &path)
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(size, text.len());
    assert_eq!(text, "platform,views\nFacebook,325\nInstagram,150\n");
}

#[test]
fn test_monthly_csv_file_with_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("monthly.csv");
    let report = sample_report(&[Platform::Facebook]);

    let config = ExportConfig {
        format: ExportFormat::Csv,
        scope: ExportScope::MonthlyViews,
        include_metadata: true,
    };
    ExportManager::new()
        .export_to_file(&report, &config, &path)
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("# Date range: 2017-02-09 to 2017-12-31\n"));
    assert!(text.contains("# Platforms: Facebook\n"));
    assert!(text.contains("platform,month,period_end,views\n"));
    assert!(text.contains("Facebook,2017-02,2017-02-28,300\n"));
    assert!(text.contains("Facebook,2017-03,2017-03-31,25\n"));
    assert!(!text.contains("Instagram"));
}

#[test]
fn test_json_file_matches_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("totals.json");
    let report = sample_report(&[Platform::Instagram, Platform::Facebook]);

    let config = ExportConfig {
        format: ExportFormat::Json,
        scope: ExportScope::PlatformTotals,
        include_metadata: true,
    };
    ExportManager::new()
        .export_to_file(&report, &config, &path)
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let totals = value["platform_totals"].as_array().unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0]["platform"], "Facebook");
    assert_eq!(totals[0]["views"], 325);
    assert_eq!(value["metadata"]["no_data"], false);
}

#[test]
fn test_excel_file_is_zip_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    let report = sample_report(&[Platform::Instagram]);

    let config = ExportConfig {
        format: ExportFormat::from_path(&path).unwrap(),
        scope: ExportScope::PlatformTotals,
        include_metadata: true,
    };
    assert_eq!(config.format, ExportFormat::Excel);

    let size = ExportManager::new()
        .export_to_file(&report, &config, &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), size);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_empty_selection_exports_empty_table() {
    let report = sample_report(&[]);
    assert!(report.is_empty());
    assert!(!report.metadata.no_data);

    let bytes = ExportManager::new()
        .export(
            &report,
            &ExportConfig {
                include_metadata: false,
                ..ExportConfig::default()
            },
        )
        .unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "platform,views\n");
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("totals.csv");
    let report = sample_report(&[Platform::Instagram]);

    let result = ExportManager::new().export_to_file(&report, &ExportConfig::default(), &path);
    assert!(matches!(result, Err(wikiviews::ExportError::Io(_))));
}
