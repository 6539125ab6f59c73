use dioxus::prelude::*;

use crate::gui::{
    components::PageviewDashboardPage,
    styles::theme::{get_embedded_css, CssClasses},
};

/// メインウィンドウコンポーネント
#[component]
pub fn MainWindow() -> Element {
    tracing::debug!("🖥️ MainWindow: Rendering");

    rsx! {
        // CSSスタイルをdocument headに注入
        document::Style {
            {get_embedded_css()}
        }

        div {
            class: CssClasses::MAIN_WINDOW,
            PageviewDashboardPage {}
        }
    }
}
