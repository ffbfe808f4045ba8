use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::QuoteProvider;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
const PROVIDER_NAME: &str = "Yahoo Chart";

/// Yahoo Finance chart endpoint provider, called directly over HTTP.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities (`2330.TW`, `QQQ`, `VWRA.L`), crypto pairs
///   (`BTC-USD`) and FX pairs (`USDTWD=X`).
/// - **Endpoint**: `/v8/finance/chart/{symbol}?interval=1d&range=1d`, reading
///   `chart.result[0].meta.regularMarketPrice`.
///
/// When a proxy URL is configured the request goes to
/// `{proxy}?url=<encoded chart url>` instead, and the chart document is read
/// from the proxy's `contents` string field.
pub struct YahooChartProvider {
    client: Client,
    proxy_url: Option<String>,
}

impl YahooChartProvider {
    pub fn new(proxy_url: Option<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            proxy_url,
        }
    }

    /// A provider that talks to Yahoo without a proxy.
    pub fn direct() -> Self {
        Self::new(None, 30)
    }

    /// The chart URL for a symbol, before any proxy wrapping.
    pub fn chart_url(symbol: &str) -> Result<Url, CoreError> {
        let mut url = Url::parse(CHART_BASE_URL).map_err(|e| api_error(format!("Bad base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| api_error("Base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        Ok(url)
    }

    /// The URL actually requested for a symbol.
    pub fn request_url(&self, symbol: &str) -> Result<Url, CoreError> {
        let target = Self::chart_url(symbol)?;
        match &self.proxy_url {
            Some(proxy) => Url::parse_with_params(proxy, &[("url", target.as_str())])
                .map_err(|e| api_error(format!("Bad proxy URL '{proxy}': {e}"))),
            None => Ok(target),
        }
    }
}

// ── Yahoo chart response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

/// Extract the chart document from a proxy response body.
pub fn unwrap_proxy_contents(body: &str) -> Result<String, CoreError> {
    let envelope: ProxyEnvelope = serde_json::from_str(body)
        .map_err(|e| api_error(format!("Failed to parse proxy response: {e}")))?;
    envelope
        .contents
        .ok_or_else(|| api_error("Proxy response has no contents".to_string()))
}

/// Read `chart.result[0].meta.regularMarketPrice` from a chart document.
pub fn parse_chart_price(symbol: &str, body: &str) -> Result<f64, CoreError> {
    let resp: ChartResponse = serde_json::from_str(body)
        .map_err(|e| api_error(format!("Failed to parse chart for {symbol}: {e}")))?;

    if let Some(err) = resp.chart.error {
        return Err(api_error(format!(
            "Chart error for {symbol}: {} {}",
            err.code.unwrap_or_default(),
            err.description.unwrap_or_default()
        )));
    }

    resp.chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|r| r.meta.regular_market_price)
        .ok_or_else(|| CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
        })
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for YahooChartProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let url = self.request_url(symbol)?;
        log::debug!("Fetching chart quote for {symbol}");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let chart = if self.proxy_url.is_some() {
            unwrap_proxy_contents(&body)?
        } else {
            body
        };

        parse_chart_price(symbol, &chart)
    }
}
