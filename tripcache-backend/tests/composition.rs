mod common;

use std::time::Duration;

use bytes::Bytes;
use common::test_backend::{ErrorBackend, TestBackend};
use tripcache_backend::{Backend, Compose, CompositionBackend, DeleteStatus};

const L1_TTL: Duration = Duration::from_secs(10);

#[tokio::test]
async fn write_goes_to_both_layers_with_capped_l1_ttl() {
    let (l1, l2) = (TestBackend::new(), TestBackend::new());
    let backend = l1.clone().compose(l2.clone(), L1_TTL);

    backend
        .set("k", Bytes::from_static(b"v"), Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(l1.ttl("k"), Some(L1_TTL));
    assert_eq!(l2.ttl("k"), Some(Duration::from_secs(60)));
}

#[tokio::test]
async fn l2_hit_refills_l1() {
    let (l1, l2) = (TestBackend::new(), TestBackend::new());
    l2.set("k", Bytes::from_static(b"v"), Duration::from_secs(60))
        .await
        .unwrap();
    let backend = CompositionBackend::new(l1.clone(), l2, L1_TTL);

    assert_eq!(backend.get("k").await.unwrap().unwrap(), "v");
    assert!(l1.has("k"));
    assert_eq!(l1.ttl("k"), Some(L1_TTL));
}

#[tokio::test]
async fn miss_in_both_layers() {
    let backend = TestBackend::new().compose(TestBackend::new(), L1_TTL);
    assert!(backend.get("k").await.unwrap().is_none());
    assert_eq!(backend.delete("k").await.unwrap(), DeleteStatus::Missing);
}

#[tokio::test]
async fn failing_l1_falls_back_to_l2() {
    let l2 = TestBackend::new();
    l2.set("k", Bytes::from_static(b"v"), Duration::from_secs(60))
        .await
        .unwrap();
    let backend = ErrorBackend.compose(l2.clone(), L1_TTL);

    assert_eq!(backend.get("k").await.unwrap().unwrap(), "v");
    backend
        .set("other", Bytes::from_static(b"x"), Duration::from_secs(5))
        .await
        .unwrap();
    assert!(l2.has("other"));
}

#[tokio::test]
async fn both_layers_failing_is_an_error() {
    let backend = ErrorBackend.compose(ErrorBackend, L1_TTL);
    assert!(backend.get("k").await.is_err());
    assert!(
        backend
            .set("k", Bytes::new(), Duration::from_secs(1))
            .await
            .is_err()
    );
    assert!(backend.delete("k").await.is_err());
}

#[tokio::test]
async fn delete_counts_both_layers() {
    let (l1, l2) = (TestBackend::new(), TestBackend::new());
    let backend = l1.clone().compose(l2.clone(), L1_TTL);
    backend
        .set("k", Bytes::from_static(b"v"), Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(backend.delete("k").await.unwrap(), DeleteStatus::Deleted(2));
    assert!(!l1.has("k"));
    assert!(!l2.has("k"));
}

#[tokio::test]
async fn refill_lives_for_the_l1_ttl_even_past_the_l2_entry() {
    let (l1, l2) = (TestBackend::new(), TestBackend::new());
    l2.set("k", Bytes::from_static(b"v"), Duration::from_secs(2))
        .await
        .unwrap();
    let backend = CompositionBackend::new(l1.clone(), l2, L1_TTL);

    backend.get("k").await.unwrap();

    assert_eq!(l1.ttl("k"), Some(L1_TTL));
}
