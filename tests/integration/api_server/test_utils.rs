use std::sync::Arc;
use std::time::Instant;

use axum_test::TestServer;
use levelcache::cache::{InMemoryStore, TieredCache};
use levelcache::config::CacheConfig;
use levelcache::core::http::{create_router, AppState, HealthStatus};
use levelcache::indicators::PivotClusterAnalyzer;
use levelcache::metrics::Metrics;
use levelcache::models::indicators::Candle;
use levelcache::services::market_data::{HttpCandleProvider, MarketDataProvider};
use tokio::sync::RwLock;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// HTTP server wired to a mocked candle provider and an in-memory durable store.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub store: Arc<InMemoryStore>,
    pub provider: MockServer,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let provider = MockServer::start().await;
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let store = Arc::new(InMemoryStore::new());

        let cache = TieredCache::new(&CacheConfig::default())
            .with_durable(store.clone())
            .with_metrics(metrics.clone());
        let candle_provider: Arc<dyn MarketDataProvider> =
            Arc::new(HttpCandleProvider::new(provider.uri()));

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            cache: Arc::new(cache),
            provider: candle_provider,
            analyzer: Arc::new(PivotClusterAnalyzer::default()),
        };

        let server = TestServer::new(create_router(state)).expect("start test server");

        Self {
            server,
            metrics,
            store,
            provider,
        }
    }

    /// Serve `candles` for `symbol`, expecting exactly `calls` upstream requests.
    pub async fn mock_candles(&self, symbol: &str, candles: &[Candle], calls: u64) {
        Mock::given(method("GET"))
            .and(path("/candles"))
            .and(query_param("symbol", symbol))
            .respond_with(ResponseTemplate::new(200).set_body_json(candles))
            .expect(calls)
            .mount(&self.provider)
            .await;
    }

    pub async fn mock_status(&self, symbol: &str, status: u16, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/candles"))
            .and(query_param("symbol", symbol))
            .respond_with(ResponseTemplate::new(status))
            .expect(calls)
            .mount(&self.provider)
            .await;
    }
}
