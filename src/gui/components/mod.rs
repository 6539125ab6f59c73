// Dioxus GUI Components Module

pub mod export_panel;
pub mod filter_panel;
pub mod main_window;
pub mod pageview_chart;
pub mod pageview_dashboard;
pub mod summary_table;

// Re-exports for convenience
pub use export_panel::ExportPanel;
pub use filter_panel::FilterPanel;
pub use main_window::MainWindow;
pub use pageview_chart::PageviewChart;
pub use pageview_dashboard::{initial_filter, PageviewDashboardPage};
pub use summary_table::SummaryTable;
