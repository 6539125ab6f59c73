use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use wikiviews::analytics::{aggregate_monthly, normalize, platform_totals};
use wikiviews::{
    DateRange, DateRangeSlider, PageviewDashboard, PageviewFilter, Platform, RawRecord,
    TableSection,
};

const QIDS: [&str; 10] = [
    "Q209330", "Q48938223", "Q355", "Q170726", "Q866", "Q4555537", "Q918", "Q1049511",
    // 未知のQID
    "Q1", "Q424242",
];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 6, 1).unwrap()
}

fn record_strategy() -> impl Strategy<Value = RawRecord> {
    (0..QIDS.len(), 0i64..2200, 0i64..5_000_000).prop_map(|(qid, offset, views)| {
        RawRecord::new(QIDS[qid], base_date() + Duration::days(offset), views)
    })
}

fn records_strategy() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(record_strategy(), 1..200)
}

fn platforms_strategy() -> impl Strategy<Value = Vec<Platform>> {
    prop::sample::subsequence(Platform::ALL.to_vec(), 0..=Platform::ALL.len())
}

fn range_strategy() -> impl Strategy<Value = DateRange> {
    (0i64..2200, 0i64..2200).prop_map(|(a, b)| {
        DateRange::new(base_date() + Duration::days(a), base_date() + Duration::days(b))
    })
}

// Property: 行の並び順は月次集計に影響しない
proptest! {
    #[test]
    fn prop_aggregation_ignores_row_order(records in records_strategy(), rotate in 0usize..200) {
        let expected = aggregate_monthly(&normalize(&records));

        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate_monthly(&normalize(&reversed)), expected.clone());

        let mut rotated = records.clone();
        let len = rotated.len();
        rotated.rotate_left(rotate % len);
        prop_assert_eq!(aggregate_monthly(&normalize(&rotated)), expected);
    }
}

// Property: 既知QIDのビュー数は集計で失われない
proptest! {
    #[test]
    fn prop_aggregation_preserves_known_views(records in records_strategy()) {
        let known_total: i64 = records
            .iter()
            .filter(|r| Platform::from_qid(&r.qid).is_some())
            .map(|r| r.views)
            .sum();

        let monthly = aggregate_monthly(&normalize(&records));
        let monthly_total: i64 = monthly.iter().map(|row| row.total_views).sum();
        prop_assert_eq!(monthly_total, known_total);

        // (プラットフォーム, 月) は一意
        let mut keys: Vec<_> = monthly.iter().map(|row| (row.platform, row.month)).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);
    }
}

// Property: 導出は純粋関数（同じ入力なら同じ結果）
proptest! {
    #[test]
    fn prop_derive_is_idempotent(
        records in records_strategy(),
        platforms in platforms_strategy(),
        range in range_strategy(),
    ) {
        let dashboard = PageviewDashboard::new(&records).unwrap();
        let filter = PageviewFilter::new(platforms, range);

        prop_assert_eq!(dashboard.derive(&filter), dashboard.derive(&filter));
    }
}

// Property: テーブル合計は絞り込み後の月次集計と一致し、降順に並ぶ
proptest! {
    #[test]
    fn prop_totals_match_filtered_rows(
        records in records_strategy(),
        platforms in platforms_strategy(),
        range in range_strategy(),
    ) {
        let dashboard = PageviewDashboard::new(&records).unwrap();
        let filter = PageviewFilter::new(platforms, range);
        let view = dashboard.derive(&filter);

        for row in &view.filtered {
            prop_assert!(filter.is_selected(row.platform));
            prop_assert!(range.contains(row.month.period_end()));
        }

        match view.table {
            TableSection::NoData => prop_assert!(dashboard.monthly().is_empty()),
            TableSection::Totals(totals) => {
                let table_sum: i64 = totals.iter().map(|t| t.total_views).sum();
                let filtered_sum: i64 = view.filtered.iter().map(|r| r.total_views).sum();
                prop_assert_eq!(table_sum, filtered_sum);
                prop_assert!(totals.windows(2).all(|pair| pair[0].total_views >= pair[1].total_views));
                prop_assert_eq!(totals, platform_totals(view.filtered.iter()));
            }
        }
    }
}

// Property: 月末日で揃えた範囲では「日次で絞ってから集計」と「集計してから絞る」が一致する
proptest! {
    #[test]
    fn prop_filter_commutes_with_aggregation_on_month_bounds(
        records in records_strategy(),
        platforms in platforms_strategy(),
        start_month in 0i64..70,
        span in 0i64..24,
    ) {
        let start_key = wikiviews::MonthKey::from_ordinal(2016 * 12 + 5 + start_month);
        let end_key = wikiviews::MonthKey::from_ordinal(2016 * 12 + 5 + start_month + span);
        let range = DateRange::new(start_key.first_day(), end_key.period_end());
        let filter = PageviewFilter::new(platforms, range);

        let normalized = normalize(&records);
        let daily_filtered: Vec<_> = normalized
            .iter()
            .filter(|r| filter.matches_record(r))
            .cloned()
            .collect();
        let filter_then_aggregate = aggregate_monthly(&daily_filtered);

        let monthly = aggregate_monthly(&normalized);
        let aggregate_then_filter: Vec<_> = filter.apply(&monthly).into_iter().cloned().collect();

        prop_assert_eq!(filter_then_aggregate, aggregate_then_filter);
    }
}

// Property: スライダーの丸めは到達可能な日付を返し、2回目以降は変化しない
proptest! {
    #[test]
    fn prop_slider_snap_is_stable(offset in -100i64..2000) {
        let slider = DateRangeSlider::default();
        let date = slider.min + Duration::days(offset);

        let snapped = slider.snap(date);
        prop_assert!(snapped >= slider.min && snapped <= slider.max);
        prop_assert_eq!(slider.snap(snapped), snapped);
        prop_assert_eq!(slider.date_at(slider.position_of(snapped)), snapped);
    }
}
