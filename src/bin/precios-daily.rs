//! Daily price analytics runner.
//!
//! Run with: `cargo run --bin precios-daily`

use chrono::{Local, NaiveDate};
use precios::{run_daily, RunConfig};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    // Configuration comes from environment variables with sensible
    // defaults:
    //   INPUT_DIR - where the crawler drops precios_YYYYMMDD*.csv files
    //   DATA_DIR  - historical store and published JSON artifacts
    //   DATE      - run date as YYYY-MM-DD (defaults to today)
    let input_dir = std::env::var("INPUT_DIR").unwrap_or_else(|_| "output_precios".to_string());
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let date = std::env::var("DATE")
        .ok()
        .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive());

    let config = RunConfig {
        input_dir: PathBuf::from(input_dir),
        data_dir: PathBuf::from(data_dir),
        date,
    };

    match run_daily(&config) {
        Ok(summary) => {
            match summary.day_variation {
                Some(pct) => println!(
                    "Variación del día: {}{:.2}%",
                    if pct > 0.0 { "+" } else { "" },
                    pct
                ),
                None => println!("Variación del día: sin datos suficientes"),
            }
            println!("Productos relevados: {}", summary.total_products);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("run failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
