//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::cache::{
    CacheError, CacheKey, CacheMeta, DurableStore, Fetched, RedisStore, Resolved, TieredCache,
    TtlTier,
};
use crate::config::{self, CacheConfig};
use crate::indicators::PivotClusterAnalyzer;
use crate::metrics::Metrics;
use crate::services::market_data::{
    CandleResponse, HttpCandleProvider, MarketDataError, MarketDataProvider,
};

const DEFAULT_INTERVAL: &str = "1d";
const DEFAULT_CANDLE_LIMIT: usize = 250;
const MAX_CANDLE_LIMIT: usize = 1000;
const LAYER_HEADER_ROLE: &str = "superadmin";
/// Applied to candle series of every interval.
const CANDLE_TTL: TtlTier = TtlTier::Short;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub cache: Arc<TieredCache>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub analyzer: Arc<PivotClusterAnalyzer>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "levelcache"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct CandleQuery {
    interval: Option<String>,
    limit: Option<usize>,
}

impl CandleQuery {
    fn interval(&self) -> String {
        self.interval
            .clone()
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INTERVAL.to_string())
    }

    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_CANDLE_LIMIT)
            .clamp(1, MAX_CANDLE_LIMIT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LevelsResponse {
    pub symbol: String,
    pub interval: String,
    pub candle_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolve a candle series through the cache. Transient provider failures come
/// back as an `error` body that is never cached.
async fn cached_candles(
    state: &AppState,
    symbol: &str,
    query: &CandleQuery,
) -> Result<Resolved<CandleResponse>, CacheError<MarketDataError>> {
    let interval = query.interval();
    let limit = query.limit();
    let limit_part = limit.to_string();
    let key = CacheKey::compose("candles", &interval, [symbol, limit_part.as_str()]);
    let ttl = CANDLE_TTL.as_secs();

    let provider = state.provider.clone();
    let symbol = symbol.to_string();
    state
        .cache
        .resolve(&key, ttl, || async move {
            match provider.get_candles(&symbol, &interval, limit).await {
                Ok(candles) => Ok(Fetched::ok(CandleResponse::ok(&symbol, &interval, candles))),
                Err(e) if e.is_transient() => {
                    let reason = e.to_string();
                    Ok(Fetched::transient(
                        CandleResponse::error(&symbol, &interval, reason.clone()),
                        reason,
                    ))
                }
                Err(e) => Err(e),
            }
        })
        .await
}

async fn get_candles(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<CandleQuery>,
    headers: HeaderMap,
) -> Response {
    match cached_candles(&state, &symbol, &query).await {
        Ok(Resolved { payload, meta }) => {
            with_debug_headers(Json(payload).into_response(), &meta, &headers)
        }
        Err(e) => cache_error_response(&symbol, e),
    }
}

async fn get_levels(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<CandleQuery>,
    headers: HeaderMap,
) -> Response {
    let Resolved { payload, meta } = match cached_candles(&state, &symbol, &query).await {
        Ok(resolved) => resolved,
        Err(e) => return cache_error_response(&symbol, e),
    };

    let levels = state.analyzer.compute_levels(&payload.candles);
    let body = LevelsResponse {
        symbol: payload.symbol,
        interval: payload.interval,
        candle_count: payload.candles.len(),
        current_price: payload.candles.last().map(|c| c.close),
        supports: levels.supports,
        resistances: levels.resistances,
        error: payload.error,
    };

    with_debug_headers(Json(body).into_response(), &meta, &headers)
}

fn with_debug_headers(mut response: Response, meta: &CacheMeta, request: &HeaderMap) -> Response {
    let expose_layer = request
        .get("x-user-role")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role.eq_ignore_ascii_case(LAYER_HEADER_ROLE));

    for (name, value) in meta.debug_headers(expose_layer) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}

fn cache_error_response(symbol: &str, e: CacheError<MarketDataError>) -> Response {
    let status = match &e {
        CacheError::Origin(_) => StatusCode::BAD_GATEWAY,
        CacheError::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(symbol = %symbol, error = %e, "Candle resolution failed");
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/candles/{symbol}", get(get_candles))
        .route("/api/levels/{symbol}", get(get_levels))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);

    let mut cache = TieredCache::new(&CacheConfig::from_env()).with_metrics(metrics.clone());

    // Redis is optional: without it the cache runs memory-only
    match RedisStore::connect(&config::get_redis_url()).await {
        Ok(store) => {
            let store: Arc<dyn DurableStore> = Arc::new(store);
            cache = cache.with_durable(store);
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable - durable cache layer disabled");
        }
    }

    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(HttpCandleProvider::new(config::get_market_data_url()));

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        cache: Arc::new(cache),
        provider,
        analyzer: Arc::new(PivotClusterAnalyzer::default()),
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
