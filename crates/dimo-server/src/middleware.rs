//! Request ids and the per-client request budget for the store routes.

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Expired budgets are swept once this many clients are tracked.
const SWEEP_THRESHOLD: usize = 4096;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Requests a client has made in its current window.
#[derive(Debug, Clone, Copy)]
struct ClientBudget {
    started_at: Instant,
    used: usize,
}

/// Fixed-window limiter with one window per client address.
///
/// Requests with no known address are charged to a shared `None` budget.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<Option<IpAddr>, ClientBudget>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Charges one request to `client`. Returns `false` when its budget for
    /// the current window is spent.
    async fn admit(&self, client: Option<IpAddr>) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.lock().await;

        if clients.len() >= SWEEP_THRESHOLD {
            clients.retain(|_, budget| now.duration_since(budget.started_at) < self.window);
        }

        let budget = clients.entry(client).or_insert(ClientBudget {
            started_at: now,
            used: 0,
        });
        if now.duration_since(budget.started_at) >= self.window {
            *budget = ClientBudget {
                started_at: now,
                used: 0,
            };
        }

        if budget.used >= self.max_requests {
            return false;
        }
        budget.used += 1;
        true
    }
}

fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let acceptable = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| value.to_string())
}

/// Peer address from the connection, else the first `x-forwarded-for` hop.
fn client_addr(req: &Request) -> Option<IpAddr> {
    if let Some(ConnectInfo(peer)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Some(peer.ip());
    }
    req.headers()
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Attaches a [`RequestId`] to the request, echoes it in the response
/// header, and runs the rest of the stack inside a span carrying it.
///
/// A client-supplied `x-request-id` is kept when it is short printable
/// ASCII; otherwise a `UUIDv4` is generated.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "http_request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Rejects a request with 429 once its client has used up the window.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_addr(&req);
    if rate_limit.admit(client).await {
        return next.run(req).await;
    }

    tracing::warn!(client = ?client, path = %req.uri().path(), "rate limit exceeded");
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();
    ApiError::new(request_id, "rate_limited", "rate limit exceeded").into_response()
}
