use crate::analytics::{
    PageviewDashboard, PageviewFilter, Platform, DATA_NOT_LOADED_MESSAGE, PAGE_TITLE,
};
use crate::gui::components::{ExportPanel, FilterPanel, PageviewChart, SummaryTable};
use crate::gui::models::DashboardContext;
use crate::gui::styles::theme::CssClasses;
use crate::gui::utils::UiUpdateTimer;
use dioxus::prelude::*;
use std::sync::Arc;

/// 起動時のフィルター
///
/// 指定されたプラットフォームのうちデータに存在するものだけを選択する。
/// 一つも残らなければ全選択に戻す。
pub fn initial_filter(dashboard: &PageviewDashboard, preferred: Option<&[Platform]>) -> PageviewFilter {
    let mut filter = dashboard.default_filter();
    if let Some(preferred) = preferred {
        let available = dashboard.platform_options();
        let chosen: Vec<Platform> = preferred
            .iter()
            .copied()
            .filter(|p| available.contains(p))
            .collect();
        if !chosen.is_empty() {
            filter = PageviewFilter::new(chosen, filter.date_range);
        }
    }
    filter
}

/// ページ全体。データ未読み込みなら警告のみ表示する
#[component]
pub fn PageviewDashboardPage() -> Element {
    let context = use_context::<DashboardContext>();

    let body = match context.dashboard.clone() {
        Some(dashboard) => rsx! {
            DashboardBody {
                dashboard,
                initial_platforms: context.initial_platforms.clone(),
            }
        },
        None => {
            let detail = context.load_error.clone().unwrap_or_default();
            rsx! {
                div { class: CssClasses::WARNING, "{DATA_NOT_LOADED_MESSAGE}" }
                if !detail.is_empty() {
                    p {
                        style: "font-size: 12px; color: #888;",
                        "{context.source_label()}: {detail}"
                    }
                }
            }
        }
    };

    rsx! {
        h1 { class: CssClasses::PAGE_TITLE, "{PAGE_TITLE}" }
        hr {}
        {body}
    }
}

/// 読み込み済みデータセットのダッシュボード本体
#[component]
fn DashboardBody(dashboard: Arc<PageviewDashboard>, initial_platforms: Option<Vec<Platform>>) -> Element {
    let filter = use_signal({
        let dashboard = dashboard.clone();
        move || initial_filter(&dashboard, initial_platforms.as_deref())
    });

    // フィルター変更のたびにチャートとテーブルを再導出
    let view = use_memo({
        let dashboard = dashboard.clone();
        move || {
            let _timer = UiUpdateTimer::new("derive_dashboard_view");
            dashboard.derive(&filter.read())
        }
    });

    let current_view = view();

    rsx! {
        // 1. 導入
        div {
            class: format!("{} {}", CssClasses::SECTION, CssClasses::PAGE_INTRO),
            h2 { class: CssClasses::SECTION_HEADING, "1. Introduction and Project Goal" }
            p {
                b { "Data Description: " }
                "This dataset contains Wikipedia pageviews for eight different social media platforms from 2017 - 2022."
            }
            p {
                b { "Research Question: " }
                "How has engagement with social media companies fluctuated over the years, based on Wiki pageviews in the years 2017 - 2022?"
            }
            p {
                b { "Interaction: " }
                "Use the selection box below to choose which social media platform to display on the line graph below. You can keep all datasets in display or choose to specifically compare certain platforms."
            }
        }
        hr {}

        // フィルター
        FilterPanel {
            filter,
            platforms: dashboard.platform_options().to_vec(),
            slider: *dashboard.slider(),
        }

        // 2. チャート
        div {
            class: CssClasses::SECTION,
            h2 { class: CssClasses::SECTION_HEADING, "2. Monthly Wikipedia Pageviews by Platform (2017–2022)" }
            p { b { "{current_view.range_caption()}" } }
            PageviewChart { data: current_view.chart.clone() }
        }

        // サマリーテーブル
        SummaryTable {
            table: current_view.table.clone(),
            heading: current_view.table_heading(),
        }

        ExportPanel { view: current_view.clone(), filter: filter() }
    }
}
