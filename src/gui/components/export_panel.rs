use crate::analytics::{
    DashboardView, ExportConfig, ExportFormat, ExportManager, ExportScope, PageviewFilter,
    ReportData,
};
use crate::gui::models::ExportStatus;
use crate::gui::styles::theme::{get_button_class, CssClasses};
use crate::gui::utils::log_file_operation;
use dioxus::prelude::*;
use std::path::PathBuf;

/// エクスポートパネル
#[component]
pub fn ExportPanel(view: DashboardView, filter: PageviewFilter) -> Element {
    let mut export_scope = use_signal(|| ExportScope::PlatformTotals);
    let mut include_metadata = use_signal(|| true);
    let status = use_signal(ExportStatus::default);

    let busy = status.read().is_busy();
    let status_message = status.read().message();

    let buttons = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Excel]
        .into_iter()
        .map(|format| {
            let view = view.clone();
            let filter = filter.clone();
            let label = format!("💾 {}", format.file_extension().to_uppercase());
            rsx! {
                button {
                    key: "{format.file_extension()}",
                    class: get_button_class("primary", busy),
                    disabled: busy,
                    onclick: move |_| {
                        let config = ExportConfig {
                            format,
                            scope: export_scope(),
                            include_metadata: include_metadata(),
                        };
                        let report = ReportData::from_view(&view, &filter);
                        start_export(config, report, status);
                    },
                    "{label}"
                }
            }
        });

    rsx! {
        div {
            class: CssClasses::SECTION,
            h3 { class: CssClasses::SECTION_HEADING, "Export" }

            div {
                style: "display: flex; gap: 16px; align-items: center; margin-bottom: 10px;",
                label {
                    "Table: "
                    select {
                        onchange: move |event| {
                            let scope = if event.value() == "monthly" {
                                ExportScope::MonthlyViews
                            } else {
                                ExportScope::PlatformTotals
                            };
                            export_scope.set(scope);
                        },
                        option {
                            value: "totals",
                            selected: export_scope() == ExportScope::PlatformTotals,
                            "Platform totals"
                        }
                        option {
                            value: "monthly",
                            selected: export_scope() == ExportScope::MonthlyViews,
                            "Monthly views"
                        }
                    }
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: include_metadata(),
                        onchange: move |event| include_metadata.set(event.checked()),
                    }
                    " Include metadata"
                }
            }

            div {
                class: CssClasses::BTN_GROUP,
                {buttons}
            }

            if let Some(message) = status_message {
                p {
                    style: "font-size: 13px; color: #555; margin-top: 8px;",
                    "{message}"
                }
            }
        }
    }
}

/// 保存先を選んでエクスポートを実行
fn start_export(config: ExportConfig, report: ReportData, mut status: Signal<ExportStatus>) {
    status.set(ExportStatus::InProgress(config.format));

    spawn(async move {
        let Some(path) = open_export_file_dialog(config.format, config.scope).await else {
            status.set(ExportStatus::Cancelled);
            return;
        };

        let manager = ExportManager::new();
        match manager.export_to_file(&report, &config, &path) {
            Ok(size_bytes) => {
                log_file_operation("export", &path.to_string_lossy(), true, Some(size_bytes));
                status.set(ExportStatus::Completed { path, size_bytes });
            }
            Err(e) => {
                log_file_operation("export", &path.to_string_lossy(), false, None);
                status.set(ExportStatus::Failed(e.to_string()));
            }
        }
    });
}

/// 既定のファイル名
pub fn default_export_file_name(format: ExportFormat, scope: ExportScope) -> String {
    let stem = match scope {
        ExportScope::MonthlyViews => "monthly_pageviews",
        ExportScope::PlatformTotals => "platform_totals",
    };
    format!("{}.{}", stem, format.file_extension())
}

/// ファイル保存ダイアログを開く
async fn open_export_file_dialog(format: ExportFormat, scope: ExportScope) -> Option<PathBuf> {
    let filter_name = match format {
        ExportFormat::Csv => "CSV",
        ExportFormat::Json => "JSON",
        ExportFormat::Excel => "Excel",
    };

    match rfd::AsyncFileDialog::new()
        .set_title("Export pageviews")
        .add_filter(filter_name, &[format.file_extension()])
        .set_file_name(default_export_file_name(format, scope))
        .save_file()
        .await
    {
        Some(file_handle) => {
            let path = file_handle.path().to_path_buf();
            tracing::info!("📁 Selected save path: {}", path.display());
            Some(path)
        }
        None => {
            tracing::debug!("📁 File save dialog cancelled");
            None
        }
    }
}
