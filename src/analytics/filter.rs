//! ダッシュボードのフィルター条件
//!
//! プラットフォームの選択集合と日付範囲。セッション内でのみ保持される。

use super::pageviews::{MonthlyAggregate, NormalizedRecord};
use super::platform::Platform;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// スライダー下限
pub fn slider_min() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 2, 9).unwrap_or(NaiveDate::MIN)
}

/// スライダー上限
pub fn slider_max() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// スライダーの刻み（日数）
pub const SLIDER_STEP_DAYS: i64 = 30;

/// 両端を含む日付範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 開始日の 00:00:00
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// 終了日の 23:59:59.999999999
    pub fn end_datetime(&self) -> NaiveDateTime {
        let end_of_day =
            NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
        self.end.and_time(end_of_day)
    }

    /// 日時が範囲内か。開始が終了より後なら常に偽
    pub fn contains_datetime(&self, value: NaiveDateTime) -> bool {
        value >= self.start_datetime() && value <= self.end_datetime()
    }

    /// 日付（00:00:00として扱う）が範囲内か
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_datetime(date.and_time(NaiveTime::MIN))
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// 日付範囲スライダーのモデル
///
/// 位置 `p` の日付は `min + p * step`。最終位置は常に `max`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeSlider {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub step_days: i64,
}

impl Default for DateRangeSlider {
    fn default() -> Self {
        Self {
            min: slider_min(),
            max: slider_max(),
            step_days: SLIDER_STEP_DAYS,
        }
    }
}

impl DateRangeSlider {
    pub fn new(min: NaiveDate, max: NaiveDate, step_days: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            step_days: step_days.max(1),
        }
    }

    /// スライダー全体の範囲
    pub fn full_range(&self) -> DateRange {
        DateRange::new(self.min, self.max)
    }

    /// 最終位置
    pub fn last_position(&self) -> u32 {
        let span = (self.max - self.min).num_days();
        let steps = span / self.step_days;
        if span % self.step_days == 0 {
            steps as u32
        } else {
            steps as u32 + 1
        }
    }

    /// 位置に対応する日付
    pub fn date_at(&self, position: u32) -> NaiveDate {
        if position >= self.last_position() {
            return self.max;
        }
        let offset = Duration::days(position as i64 * self.step_days);
        self.min
            .checked_add_signed(offset)
            .map(|d| d.min(self.max))
            .unwrap_or(self.max)
    }

    /// 日付に最も近い位置
    pub fn position_of(&self, date: NaiveDate) -> u32 {
        if date <= self.min {
            return 0;
        }
        if date >= self.max {
            return self.last_position();
        }

        let last = self.last_position();
        let approx = ((date - self.min).num_days() as f64 / self.step_days as f64).round() as u32;
        let candidates = [approx.saturating_sub(1), approx.min(last), (approx + 1).min(last)];
        candidates
            .into_iter()
            .min_by_key(|p| (self.date_at(*p) - date).num_days().abs())
            .unwrap_or(0)
    }

    /// 到達可能な日付に丸める
    pub fn snap(&self, date: NaiveDate) -> NaiveDate {
        self.date_at(self.position_of(date))
    }

    /// 範囲の両端を丸める
    pub fn snap_range(&self, range: DateRange) -> DateRange {
        DateRange::new(self.snap(range.start), self.snap(range.end))
    }
}

/// プラットフォーム・日付範囲フィルター
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageviewFilter {
    pub selected_platforms: BTreeSet<Platform>,
    pub date_range: DateRange,
}

impl PageviewFilter {
    pub fn new(selected_platforms: impl IntoIterator<Item = Platform>, date_range: DateRange) -> Self {
        Self {
            selected_platforms: selected_platforms.into_iter().collect(),
            date_range,
        }
    }

    /// 全プラットフォーム・全期間（既定の選択）
    pub fn all(platforms: &[Platform], slider: &DateRangeSlider) -> Self {
        Self::new(platforms.iter().copied(), slider.full_range())
    }

    pub fn is_selected(&self, platform: Platform) -> bool {
        self.selected_platforms.contains(&platform)
    }

    /// 選択状態を反転
    pub fn toggle_platform(&mut self, platform: Platform) {
        if !self.selected_platforms.remove(&platform) {
            self.selected_platforms.insert(platform);
        }
    }

    pub fn select_all(&mut self, platforms: &[Platform]) {
        self.selected_platforms.extend(platforms.iter().copied());
    }

    pub fn clear(&mut self) {
        self.selected_platforms.clear();
    }

    /// 集計行が条件に一致するか（月は月末日で比較）
    pub fn matches(&self, row: &MonthlyAggregate) -> bool {
        self.is_selected(row.platform) && self.date_range.contains(row.month.period_end())
    }

    /// 正規化済みレコードが条件に一致するか
    pub fn matches_record(&self, record: &NormalizedRecord) -> bool {
        record.platform.is_some_and(|p| self.is_selected(p)) && self.date_range.contains(record.date)
    }

    /// 集計行を絞り込む（元の並びを保つ）
    pub fn apply<'a>(&self, rows: &'a [MonthlyAggregate]) -> Vec<&'a MonthlyAggregate> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}
