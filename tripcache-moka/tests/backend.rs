use std::time::Duration;

use bytes::Bytes;
use tripcache_backend::{Backend, DeleteStatus};
use tripcache_moka::{MokaBackend, MokaBackendBuilder};

#[tokio::test]
async fn set_get_delete() {
    let backend = MokaBackend::builder().max_entries(100).build();

    assert_eq!(backend.get("httpcache:GET:a").await.unwrap(), None);

    backend
        .set("httpcache:GET:a", Bytes::from_static(b"dump"), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(
        backend.get("httpcache:GET:a").await.unwrap(),
        Some(Bytes::from_static(b"dump"))
    );

    assert_eq!(
        backend.delete("httpcache:GET:a").await.unwrap(),
        DeleteStatus::Deleted(1)
    );
    assert_eq!(
        backend.delete("httpcache:GET:a").await.unwrap(),
        DeleteStatus::Missing
    );
    assert_eq!(backend.get("httpcache:GET:a").await.unwrap(), None);
    assert_eq!(backend.name(), "moka");
}

#[tokio::test]
async fn entries_expire_after_their_ttl() {
    let backend = MokaBackend::builder().max_entries(100).build();
    backend
        .set("short", Bytes::from_static(b"x"), Duration::from_millis(50))
        .await
        .unwrap();
    backend
        .set("long", Bytes::from_static(b"y"), Duration::from_secs(60))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(backend.get("short").await.unwrap(), None);
    assert!(backend.get("long").await.unwrap().is_some());
}

#[tokio::test]
async fn overwrite_uses_new_ttl() {
    let backend = MokaBackend::builder().max_entries(100).build();
    backend
        .set("key", Bytes::from_static(b"old"), Duration::from_millis(50))
        .await
        .unwrap();
    backend
        .set("key", Bytes::from_static(b"new"), Duration::from_secs(60))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(
        backend.get("key").await.unwrap(),
        Some(Bytes::from_static(b"new"))
    );
    let entry = backend.cache().get("key").await.unwrap();
    assert_eq!(entry.ttl(), Duration::from_secs(60));
}

#[tokio::test]
async fn byte_budget_evicts() {
    let backend = MokaBackendBuilder::default()
        .max_bytes(3 * (1024 + 120))
        .name("bounded")
        .build();

    for i in 0..10 {
        backend
            .set(
                &format!("k{i}"),
                Bytes::from(vec![0u8; 1024]),
                Duration::from_secs(60),
            )
            .await
            .unwrap();
    }
    backend.cache().run_pending_tasks().await;

    assert!(backend.cache().weighted_size() <= 3 * (1024 + 120));
    assert!(backend.cache().entry_count() <= 3);
    assert_eq!(backend.name(), "bounded");
}
