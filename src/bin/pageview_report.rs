use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use wikiviews::{
    analytics::{
        format_millions, render_line_chart_svg, ChartStyle, DateRange, ExportConfig, ExportFormat,
        ExportManager, ExportScope, ReportData, DATA_NOT_LOADED_MESSAGE, NO_PAGEVIEWS_MESSAGE,
        PAGE_TITLE, TOTALS_TABLE_COLUMNS,
    },
    gui::{components::initial_filter, config_manager, utils},
    DashboardError, PageviewDashboard, Platform, TableSection, WikiviewsResult,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    Excel,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Excel => ExportFormat::Excel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Monthly,
    Totals,
}

impl From<ScopeArg> for ExportScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Monthly => ExportScope::MonthlyViews,
            ScopeArg::Totals => ExportScope::PlatformTotals,
        }
    }
}

/// Print the social media pageview summary without opening a window
#[derive(Parser, Debug)]
#[command(name = "pageview_report", version, about)]
struct Cli {
    /// Dataset file (.csv, .ndjson, .jsonl or .json)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Platforms to include, comma separated (default: all platforms in the data)
    #[arg(short, long, value_delimiter = ',')]
    platforms: Vec<Platform>,

    /// Range start (YYYY-MM-DD), snapped to the 30-day slider grid
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD), snapped to the 30-day slider grid
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Write the line chart as SVG
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Write an export file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export format (default: inferred from the export file extension, else csv)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Table to export
    #[arg(long, value_enum, default_value = "totals")]
    scope: ScopeArg,

    /// Omit metadata from the export
    #[arg(long)]
    no_metadata: bool,

    /// Log level override (trace/debug/info/warn/error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            utils::log_error_with_context(&e, "pageview_report");
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> WikiviewsResult<ExitCode> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => config_manager::ConfigManager::with_path(path.clone())?,
        None => config_manager::ConfigManager::new()?,
    };
    let config = config_manager.load_config()?;

    // CLIはコンソール出力のみ
    let mut log_config = config.log.clone();
    log_config.enable_file_logging = false;
    if let Some(level) = &cli.log_level {
        log_config.log_level = level.clone();
    } else if std::env::var_os("RUST_LOG").is_none() {
        log_config.log_level = "warn".to_string();
    }
    let _log_guard = utils::init_logging(&log_config)?;

    println!("{}", PAGE_TITLE);
    println!();

    let Some(data_path) = cli.data.clone().or_else(|| config.data_file.clone()) else {
        println!("⚠️ {}", DATA_NOT_LOADED_MESSAGE);
        return Ok(ExitCode::from(2));
    };

    let slider = config.dashboard.slider();
    let dashboard = match PageviewDashboard::load(&data_path, slider) {
        Ok(dashboard) => dashboard,
        Err(DashboardError::DatasetNotLoaded) => {
            println!("⚠️ {}", DATA_NOT_LOADED_MESSAGE);
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    // フィルター: CLI指定 > 設定ファイル > 全選択
    let preferred = config.dashboard.default_selection();
    let mut filter = initial_filter(&dashboard, preferred.as_deref());
    if !cli.platforms.is_empty() {
        filter.selected_platforms = cli.platforms.iter().copied().collect();
    }

    let requested = DateRange::new(
        cli.start.unwrap_or(filter.date_range.start),
        cli.end.unwrap_or(filter.date_range.end),
    );
    filter.date_range = dashboard.slider().snap_range(requested);
    if filter.date_range != requested {
        tracing::info!(
            requested_start = %requested.start,
            requested_end = %requested.end,
            start = %filter.date_range.start,
            end = %filter.date_range.end,
            "📐 Date range snapped to slider positions"
        );
    }

    let view = dashboard.derive(&filter);
    println!("{}", view.range_caption());
    println!(
        "Platforms: {}",
        filter
            .selected_platforms
            .iter()
            .map(|p| p.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    match &view.table {
        TableSection::NoData => println!("ℹ️ {}", NO_PAGEVIEWS_MESSAGE),
        TableSection::Totals(totals) => {
            println!("{}", view.table_heading());
            println!(
                "{:<12} {:>16} {:>10}",
                TOTALS_TABLE_COLUMNS[0], TOTALS_TABLE_COLUMNS[1], ""
            );
            for total in totals {
                println!(
                    "{:<12} {:>16} {:>10}",
                    total.platform.display_name(),
                    total.total_views,
                    format_millions(total.total_views as f64)
                );
            }
        }
    }

    if let Some(chart_path) = &cli.chart {
        let svg = render_line_chart_svg(&view.chart, &ChartStyle::default())?;
        std::fs::write(chart_path, &svg)?;
        utils::log_file_operation("chart", &chart_path.to_string_lossy(), true, Some(svg.len()));
        println!();
        println!("✅ Chart written: {}", chart_path.display());
    }

    if let Some(export_path) = &cli.export {
        let format = cli
            .format
            .map(ExportFormat::from)
            .or_else(|| ExportFormat::from_path(export_path))
            .unwrap_or(ExportFormat::Csv);
        let export_config = ExportConfig {
            format,
            scope: cli.scope.into(),
            include_metadata: !cli.no_metadata,
        };

        let report = ReportData::from_view(&view, &filter);
        let size = ExportManager::new().export_to_file(&report, &export_config, export_path)?;
        println!();
        println!(
            "✅ Export written: {} ({} bytes)",
            export_path.display(),
            size
        );
    }

    Ok(ExitCode::SUCCESS)
}
