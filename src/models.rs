use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const S1_SEARCH_URL: &str =
    "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK={ticker}&count=100&type=S-1&output=xml";

const PROSPECTUS_SEARCH_URL: &str =
    "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK={ticker}&count=100&type=424&output=xml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `<TICKER>.txt` files are written. Defaults to `data2` next to
    /// the directory holding the executable.
    pub output_directory: Option<String>,
    // Index query templates; `{ticker}` is substituted per request
    pub s1_search_url: String,
    pub prospectus_search_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: None,
            s1_search_url: S1_SEARCH_URL.to_string(),
            prospectus_search_url: PROSPECTUS_SEARCH_URL.to_string(),
            user_agent: format!("filing-fetcher/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    /// Index query URL for `ticker` and the given filing type.
    pub fn search_url(&self, filing_type: FilingType, ticker: &str) -> String {
        let template = match filing_type {
            FilingType::S1 => &self.s1_search_url,
            FilingType::Prospectus => &self.prospectus_search_url,
        };
        template.replace("{ticker}", ticker)
    }
}

/// One row of the input table.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilingType {
    /// Registration statement filed ahead of an IPO.
    S1,
    /// 424 prospectus, used when no S-1 is listed.
    Prospectus,
}

impl FilingType {
    pub fn code(&self) -> &'static str {
        match self {
            FilingType::S1 => "S-1",
            FilingType::Prospectus => "424",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerOutcome {
    /// `<TICKER>.txt` was already present; nothing was requested.
    Cached,
    Saved(PathBuf),
    FilingsNotFound,
    TextFailed,
}

/// Tallies for one run. Cached tickers are counted separately and never
/// take part in `total_attempted`.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total_attempted: usize,
    pub failed_filings: usize,
    pub failed_text: usize,
    pub succeeded: usize,
    pub cached: usize,
    pub failed_tickers: Vec<String>,
}

impl RunSummary {
    pub fn record(&mut self, ticker: &str, outcome: &TickerOutcome) {
        match outcome {
            TickerOutcome::Cached => {
                self.cached += 1;
                return;
            }
            TickerOutcome::Saved(_) => self.succeeded += 1,
            TickerOutcome::FilingsNotFound => {
                self.failed_filings += 1;
                self.failed_tickers.push(ticker.to_string());
            }
            TickerOutcome::TextFailed => {
                self.failed_text += 1;
                self.failed_tickers.push(ticker.to_string());
            }
        }
        self.total_attempted += 1;
    }

    /// Whether the three outcome counts add up to the attempted total.
    pub fn is_consistent(&self) -> bool {
        self.total_attempted == self.failed_filings + self.failed_text + self.succeeded
    }
}
