use crate::analytics::{render_line_chart_svg, ChartData, ChartStyle};
use crate::gui::styles::theme::CssClasses;
use dioxus::prelude::*;

/// 月次ページビューの折れ線グラフ
#[component]
pub fn PageviewChart(data: ChartData) -> Element {
    let style = ChartStyle::default();

    match render_line_chart_svg(&data, &style) {
        Ok(chart_svg) => rsx! {
            div {
                class: CssClasses::CHART_CONTAINER,
                style: "aspect-ratio: 2 / 1;",
                dangerous_inner_html: "{chart_svg}"
            }
        },
        Err(e) => {
            tracing::warn!(series = data.series.len(), "⚠️ Chart rendering failed: {}", e);
            rsx! {
                div {
                    class: CssClasses::ERROR_MESSAGE,
                    "{e}"
                }
            }
        }
    }
}
