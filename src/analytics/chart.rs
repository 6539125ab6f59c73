//! 月次ページビューの折れ線グラフ
//!
//! 系列データの組み立てと plotters による SVG 描画。

use super::filter::DateRange;
use super::pageviews::{MonthKey, MonthlyAggregate};
use super::platform::Platform;
use serde::{Deserialize, Serialize};

/// グラフタイトル
pub const CHART_TITLE: &str =
    "How has engagement with social media companies fluctuated based on Wiki pageviews";

/// 固定色のない系列に使う既定パレット
const DEFAULT_PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// グラフの1点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: MonthKey,
    pub views: i64,
}

/// 1プラットフォーム分の系列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// 系列色（固定色がなければパレットから）
    pub fn color(&self, index: usize) -> &'static str {
        Platform::color_for_name(&self.name)
            .unwrap_or(DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()])
    }
}

/// 折れ線グラフの入力データ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    /// データがない場合のX軸範囲
    pub date_range: DateRange,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// 絞り込み済みの集計行から系列を組み立てる（行の並び順で系列を作る）
    pub fn from_rows(rows: &[&MonthlyAggregate], date_range: DateRange) -> Self {
        let mut series: Vec<ChartSeries> = Vec::new();

        for row in rows {
            let name = row.platform.display_name();
            let point = ChartPoint {
                month: row.month,
                views: row.total_views,
            };
            match series.iter_mut().find(|s| s.name == name) {
                Some(existing) => existing.points.push(point),
                None => series.push(ChartSeries {
                    name: name.to_string(),
                    points: vec![point],
                }),
            }
        }

        for s in &mut series {
            s.points.sort_by_key(|p| p.month);
        }

        Self {
            title: CHART_TITLE.to_string(),
            x_label: "Years (Monthly)".to_string(),
            y_label: "Pageviews (Millions)".to_string(),
            legend_title: "Platform".to_string(),
            date_range,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// X軸の月範囲（通し番号、両端含む）
    pub fn month_span(&self) -> (i64, i64) {
        let ordinals = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.month.ordinal()));
        let (min, max) = ordinals.fold((i64::MAX, i64::MIN), |(lo, hi), o| (lo.min(o), hi.max(o)));

        if min > max {
            let (start, end) = if self.date_range.is_inverted() {
                (self.date_range.end, self.date_range.start)
            } else {
                (self.date_range.start, self.date_range.end)
            };
            (MonthKey::of(start).ordinal(), MonthKey::of(end).ordinal())
        } else {
            (min, max)
        }
    }

    /// Y軸の上限（最大値の1割増し）
    pub fn y_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.views))
            .max()
            .unwrap_or(0);
        if max <= 0 {
            1.0
        } else {
            max as f64 * 1.1
        }
    }
}

/// 描画設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub text_color: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            background: "#FFFFFF".to_string(),
            text_color: "#2A3F5F".to_string(),
        }
    }
}

/// グラフ描画エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Chart rendering failed: {0}")]
pub struct ChartError(pub String);

/// `#RRGGBB` を RGB に変換
pub fn parse_hex_color(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
            .unwrap_or(0)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

/// Y軸の目盛り（百万単位）
pub fn format_millions(value: f64) -> String {
    let millions = value / 1_000_000.0;
    if millions == 0.0 {
        "0".to_string()
    } else if millions.abs() >= 10.0 {
        format!("{:.0}M", millions)
    } else {
        format!("{:.1}M", millions)
    }
}

/// 折れ線グラフをSVG文字列として描画
pub fn render_line_chart_svg(data: &ChartData, style: &ChartStyle) -> Result<String, ChartError> {
    use plotters::prelude::*;

    let to_error = |e: &dyn std::fmt::Display| ChartError(e.to_string());

    let (first_month, last_month) = data.month_span();
    // 単月でも線が描けるよう右端に余白を取る
    let x_range = first_month as f64..(last_month as f64 + 1.0).max(first_month as f64 + 1.0);
    let y_range = 0.0..data.y_max();

    let bg = parse_hex_color(&style.background);
    let text = parse_hex_color(&style.text_color);
    let text_color = RGBColor(text.0, text.1, text.2);

    let mut svg_buffer = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg_buffer, (style.width, style.height)).into_drawing_area();
        root.fill(&RGBColor(bg.0, bg.1, bg.2))
            .map_err(|e| to_error(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&data.title, ("sans-serif", 18, &text_color))
            .margin_top(20)
            .margin_right(140)
            .margin_left(10)
            .margin_bottom(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| to_error(&e))?;

        chart
            .configure_mesh()
            .x_desc(data.x_label.as_str())
            .y_desc(data.y_label.as_str())
            .x_labels(8)
            .y_labels(6)
            .axis_style(text_color)
            .label_style(("sans-serif", 12, &text_color))
            .light_line_style(RGBColor(235, 240, 248))
            .x_label_formatter(&|x| MonthKey::from_ordinal(x.round() as i64).to_string())
            .y_label_formatter(&|y| format_millions(*y))
            .draw()
            .map_err(|e| to_error(&e))?;

        for (index, series) in data.series.iter().enumerate() {
            let (r, g, b) = parse_hex_color(series.color(index));
            let color = RGBColor(r, g, b);
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|p| (p.month.ordinal() as f64, p.views as f64))
                .collect();

            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(|e| to_error(&e))?
                .label(series.name.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2)));
        }

        if !data.series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.85))
                .border_style(text_color)
                .label_font(("sans-serif", 12, &text_color))
                .draw()
                .map_err(|e| to_error(&e))?;
        }

        root.present().map_err(|e| to_error(&e))?;
    }

    Ok(make_svg_responsive(svg_buffer, style.width, style.height))
}

/// 固定サイズのSVGをコンテナ幅に追従させる
pub fn make_svg_responsive(svg: String, width: u32, height: u32) -> String {
    let needle = format!("width=\"{width}\" height=\"{height}\"");
    if svg.contains(&needle) {
        svg.replacen(
            &needle,
            &format!(
                "viewBox=\"0 0 {width} {height}\" width=\"100%\" height=\"100%\" preserveAspectRatio=\"xMidYMid meet\""
            ),
            1,
        )
    } else {
        svg
    }
}
