//! Caching GET requests through a middleware chain.
//!
//! The chain logs every round trip, injects a `User-Agent` header, then
//! consults an in-memory cache before reaching the network.
//!
//! Run:
//!   cargo run -p tripcache-demos --example simple_get
//!
//! Set `RUST_LOG=tripcache=debug` to see hits, misses and stores.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tripcache::middleware::{HeaderLayer, TraceLayer};
use tripcache::{Body, CacheConfig, CacheLayer, CacheSettings, Chain, Transport, is_cached_response};
use tripcache_moka::MokaBackend;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tripcache=debug")),
        )
        .init();

    let settings: CacheSettings = serde_saphyr::from_str(
        r#"
        ttl: 60s
        compression: true
        "#,
    )
    .expect("valid cache settings");
    let config = CacheConfig::try_from(settings)?;
    let backend = Arc::new(MokaBackend::builder().max_entries(1_000).build());

    let mut chain = Chain::default();
    chain
        .with(TraceLayer)
        .with(HeaderLayer::new(
            http::header::USER_AGENT,
            http::HeaderValue::from_static("tripcache-demo/0.1"),
        ))
        .with(CacheLayer::with_config(backend, config));

    let url = "http://httpbin.org/get";
    for attempt in 1..=2 {
        let request = http::Request::get(url).body(Body::empty())?;
        let response = chain.round_trip(request).await?;
        let cached = is_cached_response(&response);
        let status = response.status();
        let body = response.into_body().collect().await?;
        println!(
            "request {attempt}: status {status}, {} bytes, cached: {cached}",
            body.len()
        );
    }
    Ok(())
}
