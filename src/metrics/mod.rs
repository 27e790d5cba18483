//! Prometheus metrics for the cache and HTTP surface

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    /// Labels: layer (memory/durable/origin), result (hit/miss/expired/fetched).
    pub cache_lookups_total: IntCounterVec,
    pub cache_transient_skips_total: IntCounter,
    /// Labels: op (read/write/remove).
    pub cache_store_errors_total: IntCounterVec,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cache_lookups_total = IntCounterVec::new(
            Opts::new("cache_lookups_total", "Cache lookups by layer and result"),
            &["layer", "result"],
        )?;
        let cache_transient_skips_total = IntCounter::new(
            "cache_transient_skips_total",
            "Origin results returned without being cached",
        )?;
        let cache_store_errors_total = IntCounterVec::new(
            Opts::new("cache_store_errors_total", "Durable store failures by operation"),
            &["op"],
        )?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let http_request_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;

        registry.register(Box::new(cache_lookups_total.clone()))?;
        registry.register(Box::new(cache_transient_skips_total.clone()))?;
        registry.register(Box::new(cache_store_errors_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            cache_lookups_total,
            cache_transient_skips_total,
            cache_store_errors_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    pub fn record_lookup(&self, layer: &str, result: &str) {
        self.cache_lookups_total
            .with_label_values(&[layer, result])
            .inc();
    }

    pub fn record_store_error(&self, op: &str) {
        self.cache_store_errors_total.with_label_values(&[op]).inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
