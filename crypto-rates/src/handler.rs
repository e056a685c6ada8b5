//! The rate proxy function: one event in, one response out.

use tracing::{debug, error, warn};

use crate::api::{CoinGeckoProvider, PriceProvider};
use crate::config::UpstreamConfig;
use crate::error::FetchError;
use crate::event::{HttpEvent, HttpResponse, CACHE_CONTROL};
use crate::rates::{build_rates, coin_ids, RateRecord, RatesBody};

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const API_UNAVAILABLE: &str = "API unavailable";
pub const INTERNAL_ERROR: &str = "Internal error";

/// Client-side cache hint on successful rate responses.
pub const RATES_CACHE_CONTROL: &str = "max-age=60";

pub struct RateProxyHandler {
    provider: Box<dyn PriceProvider>,
}

impl RateProxyHandler {
    pub fn new(provider: Box<dyn PriceProvider>) -> Self {
        Self { provider }
    }

    /// Handler backed by CoinGecko with the given upstream settings.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, FetchError> {
        Ok(Self::new(Box::new(CoinGeckoProvider::new(config)?)))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Answer one invocation. Never fails: every outcome becomes a response.
    pub fn handle(&self, event: &HttpEvent) -> HttpResponse {
        debug!(method = %event.http_method, "invocation");

        match event.http_method.as_str() {
            "OPTIONS" => HttpResponse::preflight(),
            "GET" => self.get_rates(),
            _ => HttpResponse::error(405, METHOD_NOT_ALLOWED, None),
        }
    }

    /// Fetch quotes once and turn them into the public rate list.
    pub fn fetch_rates(&self) -> Result<Vec<RateRecord>, FetchError> {
        let prices = self.provider.fetch_simple_prices(&coin_ids())?;
        build_rates(&prices)
    }

    fn get_rates(&self) -> HttpResponse {
        match self.fetch_rates() {
            Ok(rates) => {
                debug!(count = rates.len(), "rates ready");
                HttpResponse::json(200, &RatesBody { rates })
                    .with_header(CACHE_CONTROL, RATES_CACHE_CONTROL)
            }
            Err(FetchError::Transport(details)) => {
                warn!(provider = self.provider_name(), %details, "upstream unavailable");
                HttpResponse::error(503, API_UNAVAILABLE, Some(details))
            }
            Err(FetchError::Other(details)) => {
                error!(provider = self.provider_name(), %details, "rate request failed");
                HttpResponse::error(500, INTERNAL_ERROR, Some(details))
            }
        }
    }
}
