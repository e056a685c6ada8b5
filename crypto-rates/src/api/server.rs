//! Local HTTP gateway standing in for the function's hosting platform.
//!
//! Every request, on any path, becomes one `HttpEvent` for the handler and the
//! resulting `HttpResponse` is written back as plain HTTP.

use std::collections::BTreeMap;
use std::error::Error;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};

use crate::event::{HttpEvent, HttpResponse};
use crate::handler::RateProxyHandler;

/// API Server handle
pub struct ApiServer {
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl ApiServer {
    /// Bind `addr` (e.g. "0.0.0.0:8080") and start serving invocations.
    pub fn start(
        addr: &str,
        handler: Arc<RateProxyHandler>,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let server = Server::http(addr)?;
        let local_addr = server
            .server_addr()
            .to_ip()
            .ok_or("gateway must listen on a TCP address")?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let thread_handle = thread::spawn(move || {
            info!(%local_addr, provider = handler.provider_name(), "gateway listening");

            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(100)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(error = %e, "failed to receive request");
                        continue;
                    }
                };

                // One worker per invocation; the handler is shared read-only.
                let handler = Arc::clone(&handler);
                thread::spawn(move || serve(request, &handler));
            }

            info!(%local_addr, "gateway stopped");
        });

        Ok(Self {
            local_addr,
            shutdown,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Block until the accept loop exits.
    pub fn wait(mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve(request: Request, handler: &RateProxyHandler) {
    let event = to_event(&request);
    let resp = handler.handle(&event);
    debug!(
        method = %event.http_method,
        url = request.url(),
        status = resp.status_code,
        "invocation finished"
    );

    if let Err(e) = request.respond(to_http(resp)) {
        error!(error = %e, "failed to write response");
    }
}

/// Platform event for an incoming HTTP request.
pub fn to_event(request: &Request) -> HttpEvent {
    HttpEvent {
        http_method: request.method().as_str().to_string(),
        query_string_parameters: query_parameters(request.url()),
    }
}

/// Query string of a request target as a map; `None` when there is none.
pub fn query_parameters(target: &str) -> Option<BTreeMap<String, String>> {
    let (_, query) = target.split_once('?')?;
    if query.is_empty() {
        return None;
    }

    let url = reqwest::Url::parse(&format!("http://gateway/?{}", query)).ok()?;
    Some(url.query_pairs().into_owned().collect())
}

fn to_http(resp: HttpResponse) -> Response<Cursor<Vec<u8>>> {
    let headers: Vec<Header> = resp
        .headers
        .iter()
        .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
        .collect();
    let body = resp.body.into_bytes();
    let len = body.len();

    Response::new(StatusCode(resp.status_code), headers, Cursor::new(body), Some(len), None)
}
