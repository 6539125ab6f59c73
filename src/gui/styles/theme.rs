//! テーマとスタイルヘルパー

/// CSS クラス名の定数
pub struct CssClasses;

impl CssClasses {
    // ページ
    pub const MAIN_WINDOW: &'static str = "main-window";
    pub const PAGE_TITLE: &'static str = "page-title";
    pub const PAGE_INTRO: &'static str = "page-intro";
    pub const SECTION: &'static str = "section";
    pub const SECTION_HEADING: &'static str = "section-heading";

    // 通知
    pub const WARNING: &'static str = "notice notice-warning";
    pub const INFO: &'static str = "notice notice-info";
    pub const ERROR_MESSAGE: &'static str = "notice notice-error";

    // フィルター
    pub const FILTER_PANEL: &'static str = "filter-panel";
    pub const PLATFORM_CHIP: &'static str = "platform-chip";
    pub const RANGE_SLIDER: &'static str = "range-slider";

    // チャート・テーブル
    pub const CHART_CONTAINER: &'static str = "chart-container";
    pub const SUMMARY_TABLE: &'static str = "summary-table";

    // ボタン
    pub const BTN: &'static str = "btn";
    pub const BTN_PRIMARY: &'static str = "btn-primary";
    pub const BTN_SECONDARY: &'static str = "btn-secondary";
    pub const BTN_GROUP: &'static str = "btn-group";
}

/// プラットフォーム選択チップのCSSクラスを取得
pub fn get_chip_class(selected: bool) -> String {
    if selected {
        format!("{} selected", CssClasses::PLATFORM_CHIP)
    } else {
        CssClasses::PLATFORM_CHIP.to_string()
    }
}

/// ボタンの状態に応じたCSSクラスを取得
pub fn get_button_class(variant: &str, disabled: bool) -> String {
    let variant_class = match variant {
        "secondary" => CssClasses::BTN_SECONDARY,
        _ => CssClasses::BTN_PRIMARY,
    };

    let mut classes = format!("{} {}", CssClasses::BTN, variant_class);
    if disabled {
        classes.push_str(" disabled");
    }
    classes
}

/// CSSの埋め込み用ヘルパー
pub fn get_embedded_css() -> &'static str {
    include_str!("theme.css")
}
