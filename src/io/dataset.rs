//! ページビューデータセットの読み込み
//!
//! CSV / NDJSON / JSON 形式の生レコード（`qid`, `date`, `views`）を読み込み、
//! 型付きの [`RawRecord`] に変換します。

use super::ndjson::parse_ndjson_reader;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

/// データセット読み込み時のエラー
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O error when reading files
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error at line {line}: {source}")]
    JsonParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Missing required column in a row
    #[error("Missing required field '{field}' in row {row}")]
    MissingField { row: usize, field: String },

    /// Value that cannot be coerced to the column type
    #[error("Invalid value for '{field}' in row {row}: {value}")]
    InvalidField {
        row: usize,
        field: String,
        value: String,
    },

    /// Unsupported file extension
    #[error("Unsupported dataset format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Generic error with context
    #[error("Error in {context}: {message}")]
    Generic { context: String, message: String },
}

impl DatasetError {
    /// Create a new generic error with context
    pub fn generic(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generic {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(row: usize, field: impl Into<String>) -> Self {
        Self::MissingField {
            row,
            field: field.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(row: usize, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            row,
            field: field.into(),
            value: value.into(),
        }
    }
}

/// 型変換済みの生レコード（1プラットフォーム・1日分）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub qid: String,
    pub date: NaiveDate,
    pub views: i64,
}

impl RawRecord {
    pub fn new(qid: impl Into<String>, date: NaiveDate, views: i64) -> Self {
        Self {
            qid: qid.into(),
            date,
            views,
        }
    }
}

/// 入力ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Ndjson,
    Json,
}

impl DatasetFormat {
    /// 拡張子から形式を判定
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "ndjson" | "jsonl" => Ok(DatasetFormat::Ndjson),
            "json" => Ok(DatasetFormat::Json),
            _ => Err(DatasetError::UnsupportedFormat { extension }),
        }
    }
}

/// CSV行（全列を文字列として受け取る）
#[derive(Debug, Deserialize)]
struct CsvRow {
    qid: Option<String>,
    date: Option<String>,
    views: Option<String>,
}

/// JSON行（viewsは数値・文字列どちらも許容）
#[derive(Debug, Deserialize)]
struct JsonRow {
    qid: Option<String>,
    date: Option<serde_json::Value>,
    views: Option<serde_json::Value>,
}

/// `.json` ファイルの外形：配列、または `st03_df` キーを持つオブジェクト
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Rows(Vec<JsonRow>),
    Session { st03_df: Vec<JsonRow> },
}

/// パスからデータセットを読み込む（拡張子で形式を判定）
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, DatasetError> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;
    let file = File::open(path).map_err(|e| {
        DatasetError::generic(
            "opening dataset",
            format!("Failed to open '{}': {}", path.display(), e),
        )
    })?;

    let records = read_dataset(file, format)?;

    info!(
        path = %path.display(),
        format = ?format,
        record_count = records.len(),
        "📂 Dataset loaded"
    );

    Ok(records)
}

/// 任意のリーダーからデータセットを読み込む
pub fn read_dataset<R: Read>(reader: R, format: DatasetFormat) -> Result<Vec<RawRecord>, DatasetError> {
    let records = match format {
        DatasetFormat::Csv => read_csv(reader)?,
        DatasetFormat::Ndjson => {
            let rows: Vec<JsonRow> = parse_ndjson_reader(reader)?;
            convert_json_rows(rows)?
        }
        DatasetFormat::Json => {
            let document: JsonDocument =
                serde_json::from_reader(reader).map_err(|e| DatasetError::JsonParse {
                    line: e.line(),
                    source: e,
                })?;
            let rows = match document {
                JsonDocument::Rows(rows) => rows,
                JsonDocument::Session { st03_df } => st03_df,
            };
            convert_json_rows(rows)?
        }
    };

    report_identifier_quality(&records);
    Ok(records)
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let row_number = index + 1;

        let qid = require(row.qid, row_number, "qid")?;
        let date_text = require(row.date, row_number, "date")?;
        let views_text = require(row.views, row_number, "views")?;

        let date = parse_date(&date_text)
            .ok_or_else(|| DatasetError::invalid_field(row_number, "date", date_text.clone()))?;
        let views = parse_views_text(&views_text)
            .ok_or_else(|| DatasetError::invalid_field(row_number, "views", views_text.clone()))?;

        records.push(RawRecord { qid, date, views });
    }

    Ok(records)
}

fn convert_json_rows(rows: Vec<JsonRow>) -> Result<Vec<RawRecord>, DatasetError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let row_number = index + 1;

            let qid = require(row.qid, row_number, "qid")?;
            let date_value = row
                .date
                .filter(|v| !v.is_null())
                .ok_or_else(|| DatasetError::missing_field(row_number, "date"))?;
            let views_value = row
                .views
                .filter(|v| !v.is_null())
                .ok_or_else(|| DatasetError::missing_field(row_number, "views"))?;

            let date = date_value
                .as_str()
                .and_then(parse_date)
                .ok_or_else(|| DatasetError::invalid_field(row_number, "date", date_value.to_string()))?;
            let views = coerce_views(&views_value)
                .ok_or_else(|| DatasetError::invalid_field(row_number, "views", views_value.to_string()))?;

            Ok(RawRecord { qid, date, views })
        })
        .collect()
}

fn require(value: Option<String>, row: usize, field: &str) -> Result<String, DatasetError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DatasetError::missing_field(row, field))
}

/// 日付文字列を暦日に変換（時刻部分は捨てる）
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(datetime.date());
        }
    }

    // Wikimedia REST API のタイムスタンプ形式（YYYYMMDDHH / YYYYMMDD）
    if text.chars().all(|c| c.is_ascii_digit()) {
        let date_part = match text.len() {
            8 => Some(text),
            10 => text.get(..8),
            _ => None,
        };
        return date_part.and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok());
    }

    None
}

/// 文字列のviews値を整数に変換
pub fn parse_views_text(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// JSON値のviewsを整数に変換（浮動小数は0方向に切り捨て）
pub fn coerce_views(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(text) => parse_views_text(text),
        _ => None,
    }
}

fn qid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Q[1-9][0-9]*$").expect("static QID pattern is valid"))
}

/// QIDとして正しい形式かどうか
pub fn is_wellformed_qid(qid: &str) -> bool {
    qid_pattern().is_match(qid.trim())
}

/// 識別子の品質をログに記録（除外はしない）
fn report_identifier_quality(records: &[RawRecord]) {
    let malformed = records
        .iter()
        .filter(|r| !is_wellformed_qid(&r.qid))
        .count();
    if malformed > 0 {
        warn!(
            malformed_count = malformed,
            total = records.len(),
            "⚠️ Dataset contains identifiers that are not Wikidata QIDs"
        );
    } else {
        debug!(total = records.len(), "✅ All dataset identifiers are well-formed QIDs");
    }
}
