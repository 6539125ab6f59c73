use crate::analytics::{TableSection, NO_PAGEVIEWS_MESSAGE, TOTALS_TABLE_COLUMNS};
use crate::gui::styles::theme::CssClasses;
use dioxus::prelude::*;

/// 桁区切り付きの数値表記
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// プラットフォーム別合計テーブル
#[component]
pub fn SummaryTable(table: TableSection, heading: String) -> Element {
    match table {
        TableSection::NoData => rsx! {
            div {
                class: CssClasses::INFO,
                "{NO_PAGEVIEWS_MESSAGE}"
            }
        },
        TableSection::Totals(totals) => rsx! {
            div {
                class: CssClasses::SECTION,
                h3 { class: CssClasses::SECTION_HEADING, "{heading}" }
                table {
                    class: CssClasses::SUMMARY_TABLE,
                    thead {
                        tr {
                            for column in TOTALS_TABLE_COLUMNS {
                                th { key: "{column}", "{column}" }
                            }
                        }
                    }
                    tbody {
                        for total in totals.iter() {
                            tr {
                                key: "{total.platform.qid()}",
                                td { "{total.platform}" }
                                td { class: "views", "{format_count(total.total_views)}" }
                            }
                        }
                    }
                }
            }
        },
    }
}
