use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::error::FetchError;

/// Coin id -> raw entry, as returned by the upstream.
///
/// Entries are decoded into [`CoinQuote`] only for the ids that are read.
pub type SimplePrices = HashMap<String, Value>;

/// One coin entry of a `/simple/price` answer.
///
/// Outer `None`: field absent. `Some(None)`: field present as `null`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CoinQuote {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub usd: Option<Option<Number>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub usd_24h_change: Option<Option<Number>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub usd_market_cap: Option<Option<Number>>,
}

// Only called for fields that exist in the input, so `null` stays distinguishable.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<Number>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer).map(Some)
}

impl CoinQuote {
    /// Decode the entry for `coin_id`. Anything but a JSON object is rejected.
    pub fn from_value(coin_id: &str, value: &Value) -> Result<Self, FetchError> {
        if !value.is_object() {
            return Err(FetchError::Other(format!(
                "unexpected entry for {}: expected an object, got {}",
                coin_id, value
            )));
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

pub trait PriceProvider: Send + Sync {
    /// Fetch USD quotes for the given coin ids in a single request.
    fn fetch_simple_prices(&self, coin_ids: &[&'static str]) -> Result<SimplePrices, FetchError>;
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_null_are_distinct() {
        let quote = CoinQuote::from_value("bitcoin", &json!({"usd": null, "usd_24h_change": 1.5})).unwrap();
        assert_eq!(quote.usd, Some(None));
        assert_eq!(quote.usd_24h_change, Some(Number::from_f64(1.5)));
        assert_eq!(quote.usd_market_cap, None);
    }

    #[test]
    fn test_non_object_entry_is_other() {
        for value in [json!([1, 2, 3]), json!(42), json!(null), json!("bitcoin")] {
            let err = CoinQuote::from_value("bitcoin", &value).unwrap_err();
            assert!(!err.is_transport(), "value {}", value);
        }
    }

    #[test]
    fn test_wrong_field_type_is_other() {
        let err = CoinQuote::from_value("bitcoin", &json!({"usd": "abc"})).unwrap_err();
        assert!(matches!(err, FetchError::Other(_)));
    }
}
