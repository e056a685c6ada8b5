use clap::{Parser, Subcommand};
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crypto_rates::api::ApiServer;
use crypto_rates::config::{COINGECKO_API_URL, DEFAULT_TIMEOUT_SECS};
use crypto_rates::{HttpEvent, RateProxyHandler, UpstreamConfig};

#[derive(Parser, Debug)]
#[command(name = "crypto-rates")]
#[command(about = "Crypto rates proxy function over the CoinGecko API")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Upstream API root
    #[arg(long, global = true, env = "CRYPTO_RATES_UPSTREAM_URL", default_value = COINGECKO_API_URL)]
    upstream_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, global = true, env = "CRYPTO_RATES_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the function over HTTP, one invocation per request
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Run a single invocation from a platform event (JSON) and print the response
    Invoke {
        /// Event file, or "-" for stdin
        #[arg(default_value = "-")]
        event: String,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crypto_rates=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = UpstreamConfig::new(args.upstream_url, Duration::from_secs(args.timeout_secs));
    let handler = match RateProxyHandler::from_config(&config) {
        Ok(handler) => handler,
        Err(e) => {
            error!(error = %e, "failed to build upstream client");
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Serve { port } => {
            info!(upstream = %config.base_url, timeout = ?config.timeout, "starting gateway");
            let addr = format!("0.0.0.0:{}", port);
            match ApiServer::start(&addr, Arc::new(handler)) {
                Ok(server) => server.wait(),
                Err(e) => {
                    error!(%addr, error = %e, "failed to bind");
                    std::process::exit(1);
                }
            }
        }
        Command::Invoke { event } => {
            let event = match read_event(&event) {
                Ok(event) => event,
                Err(e) => {
                    error!(error = %e, "failed to read event");
                    std::process::exit(1);
                }
            };

            let resp = handler.handle(&event);
            match serde_json::to_string_pretty(&resp) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!(error = %e, "failed to encode response");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Load an event from `path`, or stdin for "-".
fn read_event(path: &str) -> Result<HttpEvent, Box<dyn std::error::Error>> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_event(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("crypto-rates-{}-{}.json", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_event_from_file() {
        let path = write_event(
            "options",
            r#"{"httpMethod":"OPTIONS","queryStringParameters":{"a":"1"},"headers":{},"body":"","isBase64Encoded":false}"#,
        );

        let event = read_event(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(event.http_method, "OPTIONS");
        assert_eq!(
            event.query_string_parameters.unwrap().get("a").map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_read_event_rejects_malformed_json() {
        let path = write_event("malformed", "{\"httpMethod\": ");

        let result = read_event(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn test_read_event_missing_file() {
        let path = std::env::temp_dir()
            .join(format!("crypto-rates-{}-absent.json", std::process::id()));
        assert!(read_event(path.to_str().unwrap()).is_err());
    }
}
