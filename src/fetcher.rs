use crate::cleaner::clean_filing;
use crate::error::FetchError;
use crate::models::{Config, RunSummary, TickerOutcome, TickerRecord};
use crate::scraper::{full_text_url, FilingScraper};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Runs the lookup, download and clean steps for each ticker and writes
/// `<TICKER>.txt` into the output directory.
pub struct FilingFetcher {
    scraper: FilingScraper,
    output_dir: PathBuf,
    // file names already present in `output_dir`
    existing: HashSet<String>,
}

impl FilingFetcher {
    pub fn new(config: Config, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        let existing = list_existing_files(&output_dir)?;
        debug!(
            "{} files already present in {}",
            existing.len(),
            output_dir.display()
        );

        Ok(Self {
            scraper: FilingScraper::new(config)?,
            output_dir,
            existing,
        })
    }

    pub async fn run(&mut self, tickers: &[TickerRecord]) -> RunSummary {
        let mut summary = RunSummary::default();

        for record in tickers {
            let ticker = record.symbol.trim();
            if ticker.is_empty() {
                warn!("skipping row with an empty Symbol");
                continue;
            }

            let outcome = self.process_ticker(ticker).await;
            summary.record(ticker, &outcome);
        }

        summary
    }

    /// Handle one ticker end to end. Never fails: every problem is folded
    /// into the returned outcome.
    pub async fn process_ticker(&mut self, ticker: &str) -> TickerOutcome {
        let filename = format!("{ticker}.txt");
        if self.existing.contains(&filename) {
            debug!("{filename} already downloaded");
            return TickerOutcome::Cached;
        }

        println!("🔎 Looking up ticker: {}", ticker);
        let href = match self.scraper.find_filing_href(ticker).await {
            Ok(href) => href,
            Err(err) => {
                error!("filing lookup for {ticker} failed: {err}");
                println!("   ❌ Failed to get filings");
                return TickerOutcome::FilingsNotFound;
            }
        };

        let link = full_text_url(&href);
        println!("   🌐 Trying url: {}", link);

        match self.save_text(&link, &filename).await {
            Ok(path) => {
                println!("   ✅ Saved {}", path.display());
                self.existing.insert(filename);
                TickerOutcome::Saved(path)
            }
            Err(err) => {
                error!("text download for {ticker} failed: {err}");
                println!("   ❌ Failed to get text file");
                TickerOutcome::TextFailed
            }
        }
    }

    async fn save_text(&self, url: &str, filename: &str) -> Result<PathBuf, FetchError> {
        let raw = self.scraper.fetch_document(url).await?;
        let text = clean_filing(&raw);

        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, &text)
            .await
            .map_err(|source| FetchError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

/// Read the ticker table at `file_path`. Only the `Symbol` column is used.
pub fn read_tickers(file_path: &Path) -> Result<Vec<TickerRecord>> {
    let mut reader = csv::Reader::from_path(file_path)
        .with_context(|| format!("Failed to open ticker table: {}", file_path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: TickerRecord = row
            .with_context(|| format!("Malformed row in ticker table: {}", file_path.display()))?;
        records.push(record);
    }

    Ok(records)
}

/// `data2`, one level above the directory containing the executable.
pub fn default_output_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let root = exe
        .parent()
        .and_then(Path::parent)
        .ok_or_else(|| anyhow::anyhow!("Executable path has no parent: {}", exe.display()))?;

    Ok(root.join("data2"))
}

fn list_existing_files(output_dir: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(output_dir)
        .with_context(|| format!("Failed to read output directory: {}", output_dir.display()))?
    {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}
