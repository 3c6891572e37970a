//! In-process stand-in for the tender-search API.
//!
//! Besides the real platforms (`ted`, `sam`, `bonfire`) a few synthetic ones exercise failure
//! paths: `broken` always answers 500, `slow` adds latency and `limited` answers 429 once its
//! quota is spent. Anything else is a 404.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

pub const SLOW_DELAY: Duration = Duration::from_millis(200);
pub const LIMITED_QUOTA: u32 = 3;

struct MockState {
    limiter: DefaultDirectRateLimiter,
}

type Shared = Arc<MockState>;
type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub organization: Option<String>,
    pub keywords: Option<String>,
    pub limit: Option<u32>,
    pub posted_from: Option<String>,
    pub posted_to: Option<String>,
}

pub fn app() -> Router {
    let state = Arc::new(MockState {
        limiter: rate_limiter(LIMITED_QUOTA),
    });

    Router::new()
        .route("/health", get(health))
        .route("/platforms", get(platforms))
        .route("/search/:platform", post(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app()).await?;
    Ok(())
}

/// Serve on an ephemeral localhost port in the background.
pub async fn spawn() -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app()).await {
            error!("Mock service stopped: {err}");
        }
    });

    Ok(addr)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "tender-api-mock" }))
}

async fn platforms() -> Json<Value> {
    Json(json!({
        "platforms": [
            { "name": "ted", "display_name": "TED Europe", "status": "active" },
            { "name": "sam", "display_name": "SAM.gov", "status": "active" },
            { "name": "bonfire", "display_name": "Bonfire", "status": "active" },
        ]
    }))
}

#[debug_handler]
async fn search(
    State(state): State<Shared>,
    Path(platform): Path<String>,
    Json(request): Json<SearchRequest>,
) -> ApiResult {
    debug!("Search on {platform}: {request:?}");

    match platform.as_str() {
        "ted" | "bonfire" => Ok(tenders(&platform, &request)),
        "sam" => {
            if request.posted_from.is_none() || request.posted_to.is_none() {
                return Err(detail(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "posted_from and posted_to are required",
                ));
            }
            Ok(tenders(&platform, &request))
        }
        "slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            Ok(tenders(&platform, &request))
        }
        "limited" => match state.limiter.check() {
            Ok(_) => Ok(tenders(&platform, &request)),
            Err(_) => Err(detail(StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded")),
        },
        "broken" => Err(detail(StatusCode::INTERNAL_SERVER_ERROR, "upstream failure")),
        _ => Err(detail(StatusCode::NOT_FOUND, "Unknown platform")),
    }
}

fn tenders(platform: &str, request: &SearchRequest) -> Json<Value> {
    let limit = request.limit.unwrap_or(10).min(50);
    let results: Vec<Value> = (1..=limit)
        .map(|n| {
            json!({
                "id": format!("{platform}-{n}"),
                "title": format!("Tender {n}"),
                "organization": request.organization.as_deref().unwrap_or("Example Agency"),
                "keywords": request.keywords,
            })
        })
        .collect();

    Json(json!({ "platform": platform, "total": results.len(), "results": results }))
}

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

/** Utils **/

/// Allows `per_minute` requests in a burst, refilling over a minute.
pub fn rate_limiter(per_minute: u32) -> DefaultDirectRateLimiter {
    let quota = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_minute(quota))
}
