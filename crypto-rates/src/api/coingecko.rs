use reqwest::header::USER_AGENT;
use tracing::debug;

use super::provider::{PriceProvider, SimplePrices};
use crate::config::UpstreamConfig;
use crate::error::FetchError;

/// CoinGecko `/simple/price` provider
pub struct CoinGeckoProvider {
    base_url: String,
    user_agent: String,
    client: reqwest::blocking::Client,
}

impl CoinGeckoProvider {
    /// Create a provider with a client bound to the configured timeout.
    ///
    /// API reference: https://docs.coingecko.com/reference/simple-price
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            client,
        })
    }

    /// USD price, 24h change and market cap for `coin_ids` in one call.
    ///
    /// The ids are joined with a literal comma, which CoinGecko accepts unescaped.
    pub fn simple_price_url(&self, coin_ids: &[&str]) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true&include_market_cap=true",
            self.base_url,
            coin_ids.join(",")
        )
    }
}

impl PriceProvider for CoinGeckoProvider {
    fn fetch_simple_prices(&self, coin_ids: &[&'static str]) -> Result<SimplePrices, FetchError> {
        let url = self.simple_price_url(coin_ids);
        debug!(%url, "fetching simple prices");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()?
            .error_for_status()?;

        let body = response.bytes()?;
        let prices: SimplePrices = serde_json::from_slice(&body)?;
        debug!(coins = prices.len(), "upstream answered");

        Ok(prices)
    }

    fn provider_name(&self) -> &str {
        "CoinGecko"
    }
}
