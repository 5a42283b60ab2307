use crate::error::FetchError;
use crate::models::{Config, FilingType};
use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Talks to the filing index and downloads filing documents.
pub struct FilingScraper {
    client: reqwest::Client,
    config: Config,
}

impl FilingScraper {
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Index page link of the most recent S-1 for `ticker`, falling back
    /// once to the 424 prospectus listing.
    pub async fn find_filing_href(&self, ticker: &str) -> Result<String, FetchError> {
        match self.lookup_filing_href(ticker, FilingType::S1).await {
            Ok(href) => Ok(href),
            Err(err) => {
                warn!("S-1 lookup for {ticker} failed, trying 424: {err}");
                self.lookup_filing_href(ticker, FilingType::Prospectus).await
            }
        }
    }

    pub async fn lookup_filing_href(
        &self,
        ticker: &str,
        filing_type: FilingType,
    ) -> Result<String, FetchError> {
        let url = self.config.search_url(filing_type, ticker);
        debug!("querying {} filings for {ticker}: {url}", filing_type.code());

        let body = self.get(&url).await?;
        let body = String::from_utf8_lossy(&body);

        parse_filing_index(&body).ok_or(FetchError::FilingsNotFound { url })
    }

    /// Download the raw filing document.
    pub async fn fetch_document(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let body = self.get(url).await?;
        debug!("downloaded {} bytes from {url}", body.len());
        Ok(body)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?;

        let body = response.bytes().await.map_err(request_error)?;
        Ok(body.to_vec())
    }
}

/// Pull the `filingHREF` of the last `filing` entry under the first
/// `results` section. The last entry is taken as the most recent one.
pub fn parse_filing_index(content: &str) -> Option<String> {
    // the HTML parser lower-cases element names
    let document = Html::parse_document(content);

    let results = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "results")?;

    let filing = child_elements(results, "filing").last()?;
    // self-closing tags are not honoured by the HTML parser, so an empty
    // element ahead of `filingHREF` ends up as its parent
    let href = filing
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "filinghref")?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    trace!("latest filing href: {href:?}");
    if href.is_empty() {
        None
    } else {
        Some(href)
    }
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

/// Turn an index page link into the link of the complete text submission:
/// everything from `-index` on is replaced by `.txt`.
pub fn full_text_url(index_href: &str) -> String {
    let stem = match index_href.find("-index") {
        Some(pos) => &index_href[..pos],
        None => index_href,
    };
    format!("{stem}.txt")
}
