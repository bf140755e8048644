//! Two-tier storage: a local Moka cache in front of a shared Redis.
//!
//! Prerequisites:
//!   Redis server running on localhost:6379
//!
//! Run:
//!   cargo run -p tripcache-demos --example composition

use std::sync::Arc;
use std::time::Duration;

use tripcache::{Body, CacheConfig, CacheTransport, Transport};
use tripcache_backend::Compose;
use tripcache_moka::MokaBackend;
use tripcache_redis::RedisBackend;
use tripcache_reqwest::ReqwestTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter("info,tripcache=trace")
        .init();

    let local = MokaBackend::builder().max_entries(10_000).name("local").build();
    let shared = RedisBackend::builder()
        .server("redis://127.0.0.1:6379/")
        .name("shared")
        .build()?;
    // Local copies live at most 10 seconds; Redis keeps the full TTL.
    let backend = Arc::new(local.compose(shared, Duration::from_secs(10)));

    let transport = CacheTransport::with_config(
        ReqwestTransport::default(),
        backend,
        CacheConfig::builder()
            .ttl(Duration::from_secs(300))
            .compression(true)
            .build(),
    );

    for attempt in 1..=3 {
        let request = http::Request::get("http://httpbin.org/uuid").body(Body::empty())?;
        let response = transport.round_trip(request).await?;
        println!(
            "request {attempt}: {:?}",
            response.headers().get(tripcache::CACHE_STATUS_HEADER)
        );
    }
    Ok(())
}
