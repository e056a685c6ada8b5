//! Serverless function that proxies CoinGecko spot prices to HTTP callers.
//!
//! The entry point is [`RateProxyHandler::handle`], which maps one platform
//! [`HttpEvent`] to one [`HttpResponse`].

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod rates;

pub use config::UpstreamConfig;
pub use error::FetchError;
pub use event::{HttpEvent, HttpResponse};
pub use handler::RateProxyHandler;
pub use rates::{RateRecord, SYMBOL_TABLE};
