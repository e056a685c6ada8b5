//! Rate records and the transformation from upstream quotes.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::api::{CoinQuote, SimplePrices};
use crate::error::FetchError;

/// Ticker symbol -> CoinGecko coin id, in output order.
pub const SYMBOL_TABLE: [(&str, &str); 6] = [
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
];

/// Placeholder ruble quote, not fetched.
pub const RUB_SYMBOL: &str = "RUB";
pub const RUB_PRICE: f64 = 0.0104;
pub const RUB_CHANGE_24H: f64 = 0.1;

/// One entry of the `rates` list returned to callers.
///
/// `price` and `marketCap` are `null` when the upstream sent `null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    pub symbol: String,
    pub price: Option<Number>,
    pub change_24h: Number,
    pub market_cap: Option<Number>,
}

/// Success body: `{"rates": [...]}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RatesBody {
    pub rates: Vec<RateRecord>,
}

/// Coin ids requested upstream, in table order.
pub fn coin_ids() -> Vec<&'static str> {
    SYMBOL_TABLE.iter().map(|(_, id)| *id).collect()
}

impl RateRecord {
    /// Build a record from an upstream quote.
    ///
    /// Absent fields become integer zero; a `null` change cannot be rounded and
    /// fails the whole request.
    pub fn from_quote(symbol: &str, quote: &CoinQuote) -> Result<Self, FetchError> {
        let change = match &quote.usd_24h_change {
            None => zero(),
            Some(Some(n)) => round_2dp(n),
            Some(None) => {
                return Err(FetchError::Other(format!(
                    "cannot round null usd_24h_change for {}",
                    symbol
                )))
            }
        };

        Ok(Self {
            symbol: symbol.to_string(),
            price: quote.usd.clone().unwrap_or_else(|| Some(zero())),
            change_24h: change,
            market_cap: quote.usd_market_cap.clone().unwrap_or_else(|| Some(zero())),
        })
    }

    /// The fixed RUB entry appended to every successful response.
    pub fn synthetic_rub() -> Self {
        Self {
            symbol: RUB_SYMBOL.to_string(),
            price: Some(float(RUB_PRICE)),
            change_24h: float(RUB_CHANGE_24H),
            market_cap: Some(zero()),
        }
    }
}

/// Records for every configured symbol present in `prices`, followed by RUB.
///
/// Symbols the upstream left out are skipped; keys outside the table are never read.
pub fn build_rates(prices: &SimplePrices) -> Result<Vec<RateRecord>, FetchError> {
    let mut rates = Vec::with_capacity(SYMBOL_TABLE.len() + 1);
    for (symbol, id) in SYMBOL_TABLE.iter() {
        if let Some(value) = prices.get(*id) {
            let quote = CoinQuote::from_value(id, value)?;
            rates.push(RateRecord::from_quote(symbol, &quote)?);
        }
    }
    rates.push(RateRecord::synthetic_rub());
    Ok(rates)
}

/// Round to 2 decimal places, half-to-even on the exact binary value.
///
/// Integers are returned unchanged.
pub fn round_2dp(n: &Number) -> Number {
    if !n.is_f64() {
        return n.clone();
    }
    n.as_f64()
        .and_then(|v| format!("{:.2}", v).parse::<f64>().ok())
        .and_then(Number::from_f64)
        .unwrap_or_else(|| n.clone())
}

fn zero() -> Number {
    Number::from(0)
}

fn float(v: f64) -> Number {
    Number::from_f64(v).unwrap_or_else(zero)
}
