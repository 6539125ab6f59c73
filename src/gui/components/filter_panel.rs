use crate::analytics::{DateRangeSlider, PageviewFilter, Platform};
use crate::gui::styles::theme::{get_button_class, get_chip_class, CssClasses};
use dioxus::prelude::*;

pub const PLATFORM_SELECT_LABEL: &str = "Select social media platforms to display:";
pub const DATE_RANGE_LABEL: &str = "Select date range of wikipedia pageviews to display:";

/// プラットフォーム選択と日付範囲スライダー
///
/// スライダーは位置（0..=最終位置）で操作し、位置を日付に変換してフィルターへ反映する。
#[component]
pub fn FilterPanel(
    filter: Signal<PageviewFilter>,
    platforms: Vec<Platform>,
    slider: DateRangeSlider,
) -> Element {
    let mut filter = filter;
    let current = filter.read().clone();

    let last_position = slider.last_position();
    let start_position = slider.position_of(current.date_range.start);
    let end_position = slider.position_of(current.date_range.end);
    let all_platforms = platforms.clone();

    rsx! {
        div {
            class: CssClasses::FILTER_PANEL,

            // プラットフォーム選択
            div {
                label {
                    style: "display: block; font-weight: 600; margin-bottom: 8px;",
                    "{PLATFORM_SELECT_LABEL}"
                }
                div {
                    for platform in platforms.iter().copied() {
                        span {
                            key: "{platform.qid()}",
                            class: get_chip_class(current.is_selected(platform)),
                            style: "border-left: 4px solid {platform.chart_color()};",
                            onclick: move |_| {
                                filter.write().toggle_platform(platform);
                                tracing::debug!(platform = %platform, "🔘 Platform toggled");
                            },
                            "{platform}"
                        }
                    }
                }
                div {
                    class: CssClasses::BTN_GROUP,
                    style: "margin-top: 6px;",
                    button {
                        class: get_button_class("secondary", false),
                        onclick: move |_| filter.write().select_all(&all_platforms),
                        "Select all"
                    }
                    button {
                        class: get_button_class("secondary", current.selected_platforms.is_empty()),
                        disabled: current.selected_platforms.is_empty(),
                        onclick: move |_| filter.write().clear(),
                        "Clear"
                    }
                }
            }

            // 日付範囲
            div {
                label {
                    style: "display: block; font-weight: 600; margin-bottom: 8px;",
                    "{DATE_RANGE_LABEL}"
                }
                div {
                    style: "font-size: 13px; color: #555; margin-bottom: 6px;",
                    "{current.date_range.start} to {current.date_range.end}"
                }
                input {
                    class: CssClasses::RANGE_SLIDER,
                    r#type: "range",
                    min: "0",
                    max: "{last_position}",
                    step: "1",
                    value: "{start_position}",
                    oninput: move |event| {
                        if let Ok(position) = event.value().parse::<u32>() {
                            filter.write().date_range.start = slider.date_at(position);
                        }
                    }
                }
                input {
                    class: CssClasses::RANGE_SLIDER,
                    r#type: "range",
                    min: "0",
                    max: "{last_position}",
                    step: "1",
                    value: "{end_position}",
                    oninput: move |event| {
                        if let Ok(position) = event.value().parse::<u32>() {
                            filter.write().date_range.end = slider.date_at(position);
                        }
                    }
                }
            }
        }
    }
}
