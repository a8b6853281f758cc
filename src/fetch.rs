//! Price sources.
//!
//! A [`PriceSource`] turns a symbol into its latest price. `0.0` (or any
//! non-positive value) means "no data" and is never an error: the refresh
//! loop simply skips that symbol for the cycle.

use crate::error::{Result, TickerError};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Yahoo Finance chart endpoint.
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const PRICE_KEY: &str = "\"regularMarketPrice\":";

/// Something that can quote a symbol.
///
/// Calls may block. Returning `<= 0.0` means no price is available.
pub trait PriceSource: Send + Sync {
    /// Latest price for `symbol`.
    fn fetch_price(&self, symbol: &str) -> f64;
}

impl<F> PriceSource for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn fetch_price(&self, symbol: &str) -> f64 {
        self(symbol)
    }
}

/// Blocking quote fetcher for the Yahoo Finance chart API.
///
/// Requests are serialised: at most one is in flight at a time.
#[derive(Debug)]
pub struct YahooChartSource {
    client: Client,
    base: Url,
    in_flight: Mutex<()>,
}

impl YahooChartSource {
    /// Client for the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(YAHOO_CHART_URL)
    }

    /// Client for a different chart endpoint (mirrors, local test servers).
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URL or the HTTP client
    /// cannot be built.
    pub fn with_base_url(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| TickerError::Config(format!("invalid chart url `{base}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(TickerError::Config(format!("chart url `{base}` cannot take a path")));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(20))
            .build()?;

        Ok(Self {
            client,
            base,
            in_flight: Mutex::new(()),
        })
    }

    fn url_for(&self, symbol: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(symbol);
        }
        url.query_pairs_mut().append_pair("interval", "1d");
        url
    }

    fn request(&self, symbol: &str) -> std::result::Result<String, reqwest::Error> {
        let _serial = self
            .in_flight
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.client
            .get(self.url_for(symbol))
            .send()?
            .error_for_status()?
            .text()
    }
}

impl PriceSource for YahooChartSource {
    fn fetch_price(&self, symbol: &str) -> f64 {
        let body = match self.request(symbol) {
            Ok(body) => body,
            Err(e) => {
                warn!(symbol, error = %e, "quote request failed");
                return 0.0;
            }
        };

        if body.is_empty() {
            debug!(symbol, "empty quote response");
            return 0.0;
        }

        match parse_price(&body) {
            Some(price) => price,
            None => {
                let preview: String = body.chars().take(200).collect();
                debug!(symbol, %preview, "no price in quote response");
                0.0
            }
        }
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

/// Extract `chart.result[0].meta.regularMarketPrice` from a chart response.
///
/// Falls back to scanning for the first `"regularMarketPrice":` key when the
/// document does not have the expected shape.
pub fn parse_price(body: &str) -> Option<f64> {
    let structured = serde_json::from_str::<ChartResponse>(body)
        .ok()
        .and_then(|r| r.chart.result)
        .and_then(|results| results.into_iter().next())
        .and_then(|first| first.meta.regular_market_price);

    structured
        .or_else(|| scan_price(body))
        .filter(|p| p.is_finite() && *p > 0.0)
}

fn scan_price(body: &str) -> Option<f64> {
    let start = body.find(PRICE_KEY)? + PRICE_KEY.len();
    let rest = &body[start..];
    let end = rest.find([',', '}'])?;
    rest[..end].trim().parse().ok()
}
