use anyhow::Result;
use clap::{Arg, Command};
use filing_fetcher::fetcher::{default_output_dir, read_tickers, FilingFetcher};
use filing_fetcher::models::{Config, RunSummary};
use std::path::{Path, PathBuf};
use tracing::{trace, Level};
use tracing_subscriber::FmtSubscriber;

fn init_tracing(level: &str) -> Result<()> {
    let level = match level {
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "INFO" => Level::INFO,
        "DEBUG" => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("filing-fetcher")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Downloads the latest S-1 (or 424) filing text for each ticker in a CSV table")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("CSV table with a Symbol column")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Existing directory for <TICKER>.txt files [default: ../data2 next to the executable]"),
        )
        .arg(
            Arg::new("trace")
                .short('t')
                .long("trace")
                .value_name("LEVEL")
                .value_parser(["ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
                .help("Enable diagnostic logging at the given level"),
        )
        .get_matches();

    if let Some(level) = matches.get_one::<String>("trace") {
        init_tracing(level)?;
    }

    let config = match matches.get_one::<String>("config") {
        Some(config_file) if Path::new(config_file).exists() => {
            println!("📋 Loading configuration from: {}", config_file);
            Config::load_from_file(config_file)?
        }
        Some(config_file) => {
            println!("📝 Creating default configuration file: {}", config_file);
            Config::default().save_to_file(config_file)?;
            println!("⚠️  Please review {} (user_agent in particular), then run the program again.", config_file);
            return Ok(());
        }
        None => Config::default(),
    };
    trace!("configuration: {config:?}");

    let output_dir = match matches.get_one::<String>("output-dir") {
        Some(dir) => PathBuf::from(dir),
        None => match &config.output_directory {
            Some(dir) => PathBuf::from(dir),
            None => default_output_dir()?,
        },
    };
    println!("📂 Output directory: {}", output_dir.display());

    // `input` is required, clap rejects the invocation without it
    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .unwrap_or_default();
    let tickers = read_tickers(&input)?;
    println!("📄 {} tickers read from {}", tickers.len(), input.display());

    let mut fetcher = FilingFetcher::new(config, output_dir)?;
    let summary = fetcher.run(&tickers).await;

    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Summary");
    println!("Total companies tried: {}", summary.total_attempted);
    println!("Failed to get filings list: {}", summary.failed_filings);
    println!("Failed to get text file: {}", summary.failed_text);
    println!("Succeeded in getting text file: {}", summary.succeeded);
    println!("Skipped (already downloaded): {}", summary.cached);
    println!(
        "Total failures plus total successes adds up to total tries? {}",
        summary.is_consistent()
    );
    println!("Failed tickers: {:?}", summary.failed_tickers);
}
