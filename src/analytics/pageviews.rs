//! 月次ページビュー集計
//!
//! 生レコードをプラットフォーム名へ正規化し、(プラットフォーム, 暦月) ごとに
//! ビュー数を合計します。

use super::platform::Platform;
use crate::io::RawRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// 暦月
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// 日付が属する月
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 月初日
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 月末日（期間マーカー。日付範囲フィルターはこの日で比較する）
    pub fn period_end(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    /// 翌月
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// 月の通し番号（チャートのX軸用）
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// 通し番号から月を復元
    pub fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: (ordinal.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// 正規化済みレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// 未知のQIDは`None`
    pub platform: Option<Platform>,
    pub date: NaiveDate,
    pub views: i64,
}

/// 月次集計行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub platform: Platform,
    pub month: MonthKey,
    pub total_views: i64,
}

/// プラットフォーム別合計（サマリーテーブルの行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTotal {
    pub platform: Platform,
    pub total_views: i64,
}

/// QIDをプラットフォーム名に変換
pub fn normalize(records: &[RawRecord]) -> Vec<NormalizedRecord> {
    let normalized: Vec<NormalizedRecord> = records
        .iter()
        .map(|record| NormalizedRecord {
            platform: Platform::from_qid(&record.qid),
            date: record.date,
            views: record.views,
        })
        .collect();

    let unmapped = normalized.iter().filter(|r| r.platform.is_none()).count();
    if unmapped > 0 {
        debug!(
            unmapped_count = unmapped,
            total = normalized.len(),
            "🔍 Records with unknown QIDs are excluded from grouping"
        );
    }

    normalized
}

/// (プラットフォーム, 暦月) ごとにビュー数を合計
///
/// 行の順序に依存しない。レコードが1件もない組み合わせは出力されない。
/// 結果はプラットフォーム表示名、月の順に並ぶ。合計は `i64` の範囲で飽和する。
pub fn aggregate_monthly(records: &[NormalizedRecord]) -> Vec<MonthlyAggregate> {
    let mut groups: BTreeMap<(&'static str, MonthKey), (Platform, i64)> = BTreeMap::new();

    for record in records {
        let Some(platform) = record.platform else {
            continue;
        };
        let entry = groups
            .entry((platform.display_name(), MonthKey::of(record.date)))
            .or_insert((platform, 0));
        entry.1 = entry.1.saturating_add(record.views);
    }

    groups
        .into_iter()
        .map(|((_, month), (platform, total_views))| MonthlyAggregate {
            platform,
            month,
            total_views,
        })
        .collect()
}

/// 集計行をプラットフォーム別に合計し、降順に並べる
///
/// 同数の場合は表示名順。
pub fn platform_totals<'a, I>(rows: I) -> Vec<PlatformTotal>
where
    I: IntoIterator<Item = &'a MonthlyAggregate>,
{
    let mut totals: HashMap<Platform, i64> = HashMap::new();
    for row in rows {
        let total = totals.entry(row.platform).or_insert(0);
        *total = total.saturating_add(row.total_views);
    }

    let mut result: Vec<PlatformTotal> = totals
        .into_iter()
        .map(|(platform, total_views)| PlatformTotal {
            platform,
            total_views,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_views
            .cmp(&a.total_views)
            .then_with(|| a.platform.display_name().cmp(b.platform.display_name()))
    });

    result
}

/// 集計結果に現れるプラットフォーム（初出順＝表示名順）
pub fn distinct_platforms(rows: &[MonthlyAggregate]) -> Vec<Platform> {
    let mut platforms: Vec<Platform> = Vec::new();
    for row in rows {
        if !platforms.contains(&row.platform) {
            platforms.push(row.platform);
        }
    }
    platforms
}
