// src/api/mod.rs
// Upstream price provider and the local function gateway.

pub mod coingecko;
pub mod provider;
pub mod server;

pub use coingecko::CoinGeckoProvider;
pub use provider::{CoinQuote, PriceProvider, SimplePrices};
pub use server::ApiServer;
