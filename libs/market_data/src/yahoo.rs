//! Yahoo Finance chart API client
//!
//! One endpoint serves both daily history and intraday charts:
//!
//! ```text
//! GET {base_url}/{symbol}?period1={unix}&period2={unix}&interval={5m|15m|60m|1d}
//! ```
//!
//! The response carries parallel arrays (`timestamp`, `open`, `high`, ...) in
//! which individual entries may be `null`. Those become `f64::NAN` so a bar's
//! position in the series never shifts.

use crate::config::ProviderConfig;
use crate::error::{DataError, Result};
use crate::provider::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use pulse_types::{Bar, BarSeries, Interval};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl QuoteColumns {
    fn bar_at(&self, i: usize, timestamp: DateTime<Utc>) -> Bar {
        let field = |column: &[Option<f64>]| column.get(i).copied().flatten().unwrap_or(f64::NAN);
        Bar::new(
            timestamp,
            field(&self.open),
            field(&self.high),
            field(&self.low),
            field(&self.close),
            field(&self.volume),
        )
    }
}

/// Decode a chart API body into a series.
///
/// API-level errors map to [`DataError::Api`]; a result without timestamps
/// maps to [`DataError::NoData`].
pub fn parse_chart(symbol: &str, interval: Interval, body: &str) -> Result<BarSeries> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(err) = response.chart.error {
        return Err(DataError::Api {
            code: err.code,
            description: err.description,
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(DataError::no_data(symbol));
    };

    let quotes = data.indicators.quote.into_iter().next().unwrap_or_default();
    let bars: Vec<Bar> = data
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| DateTime::from_timestamp(ts, 0).map(|t| quotes.bar_at(i, t)))
        .collect();

    if bars.is_empty() {
        return Err(DataError::no_data(symbol));
    }

    Ok(BarSeries::new(symbol, interval, bars))
}

/// [`MarketDataProvider`] backed by the Yahoo Finance chart API
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl YahooChartProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(config.max_concurrent_requests)
            .tcp_nodelay(true)
            .build()?;

        let base_url = reqwest::Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| DataError::invalid_url(&config.base_url, e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::invalid_url(&config.base_url, "not a hierarchical URL"));
        }

        Ok(Self { client, base_url })
    }

    /// Chart URL for `symbol`, which is always a single percent-encoded path segment
    pub fn chart_url(&self, symbol: &str) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DataError::invalid_url(self.base_url.as_str(), "not a hierarchical URL"))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        period1: i64,
        period2: i64,
        interval: Interval,
    ) -> Result<BarSeries> {
        let url = self.chart_url(symbol)?;
        let period1 = period1.to_string();
        let period2 = period2.to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", interval.as_str()),
                ("includePrePost", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let series = match parse_chart(symbol, interval, &body) {
            Err(DataError::Decode(_)) if !status.is_success() => {
                return Err(DataError::Api {
                    code: status.as_u16().to_string(),
                    description: status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string(),
                })
            }
            other => other?,
        };

        debug!(
            "Fetched {} {} bars for {} from {}",
            series.len(),
            interval,
            symbol,
            self.name()
        );
        Ok(series)
    }
}

fn start_of_day(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).timestamp()
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn daily_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BarSeries> {
        // period2 is exclusive
        let end = to.succ_opt().unwrap_or(to);
        self.fetch_chart(symbol, start_of_day(from), start_of_day(end), Interval::Day1)
            .await
    }

    async fn intraday_chart(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: Interval,
    ) -> Result<BarSeries> {
        self.fetch_chart(symbol, from.timestamp(), to.timestamp(), interval)
            .await
    }
}
