use chrono::{Datelike, Duration, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use wikiviews::analytics::{slider_max, slider_min};
use wikiviews::Platform;

/// Generate a synthetic daily pageview dataset for the eight platforms
#[derive(Parser, Debug)]
#[command(name = "generate_test_data", version, about)]
struct Cli {
    /// Output file; `.csv` writes CSV, `.ndjson`/`.jsonl` writes NDJSON
    #[arg(short, long, default_value = "tests/data/st03_pageviews.csv")]
    output: PathBuf,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Random seed for reproducible output
    #[arg(long, default_value_t = 3)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct Row {
    qid: &'static str,
    date: String,
    views: i64,
}

/// プラットフォームごとの1日あたりの基準ビュー数
fn base_daily_views(platform: Platform) -> f64 {
    match platform {
        Platform::Instagram => 40_000.0,
        Platform::TikTok => 25_000.0,
        Platform::Facebook => 60_000.0,
        Platform::Snapchat => 12_000.0,
        Platform::Youtube => 55_000.0,
        Platform::Twitch => 15_000.0,
        Platform::Twitter => 45_000.0,
        Platform::WhatsApp => 30_000.0,
    }
}

fn generate_rows(start: NaiveDate, end: NaiveDate, rng: &mut StdRng) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut day = start;
    let total_days = (end - start).num_days().max(1) as f64;

    while day <= end {
        let progress = (day - start).num_days() as f64 / total_days;
        // 週末はやや多め
        let weekend = matches!(day.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun);

        for platform in Platform::ALL {
            let trend = match platform {
                Platform::TikTok => 0.3 + 1.7 * progress,
                Platform::Facebook => 1.2 - 0.4 * progress,
                _ => 1.0,
            };
            let noise: f64 = rng.gen_range(0.8..1.2);
            let weekend_factor = if weekend { 1.1 } else { 1.0 };
            let views = (base_daily_views(platform) * trend * noise * weekend_factor) as i64;

            rows.push(Row {
                qid: platform.qid(),
                date: day.format("%Y-%m-%d").to_string(),
                views,
            });
        }

        day += Duration::days(1);
    }

    rows
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let start = cli.start.unwrap_or_else(slider_min);
    let end = cli.end.unwrap_or_else(slider_max);
    if start > end {
        anyhow::bail!("--start ({}) must not be after --end ({})", start, end);
    }

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let rows = generate_rows(start, end, &mut rng);

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let extension = cli
        .output
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();

    match extension.as_str() {
        "ndjson" | "jsonl" => {
            let mut file = BufWriter::new(File::create(&cli.output)?);
            for row in &rows {
                let json_line = serde_json::to_string(row)?;
                writeln!(file, "{}", json_line)?;
            }
            file.flush()?;
        }
        _ => {
            let mut writer = csv::Writer::from_path(&cli.output)?;
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }

    println!(
        "✅ テストデータファイルを生成しました: {} ({} rows)",
        cli.output.display(),
        rows.len()
    );
    Ok(())
}
