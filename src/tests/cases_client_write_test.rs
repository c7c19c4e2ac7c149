// Integration tests for broadcast writes, remove sweeps and TTL walks.

use std::time::Duration;

use bytes::Bytes;

use crate::error::CacheError;
use crate::provider::{Provider, ProviderExt};
use crate::support::{assert_equal, assert_ok, client_over, Call, Op, ScriptedProvider};

#[tokio::test]
async fn test_broadcast_write_reaches_every_provider() {
    let a = ScriptedProvider::new("a").shared();
    let b = ScriptedProvider::new("b")
        .with_latency(Duration::from_millis(15))
        .shared();
    let c = ScriptedProvider::new("c").shared();
    let client = client_over(&[a.clone(), b.clone(), c.clone()]);

    assert_ok(client.set("k", Bytes::from_static(b"\"v\"")).await);

    for provider in [&a, &b, &c] {
        assert!(provider.holds("k"), "{} missed the write", provider.name());
        assert_equal(vec![Op::Set], provider.ops());
    }
}

/// A failed branch is reported only after every other branch has finished.
#[tokio::test]
async fn test_broadcast_write_error_after_all_branches() {
    let broken = ScriptedProvider::new("broken").failing().shared();
    let slow = ScriptedProvider::new("slow")
        .with_latency(Duration::from_millis(30))
        .shared();
    let client = client_over(&[broken.clone(), slow.clone()]);

    let err = client.store("k", "v").await.unwrap_err();
    assert!(matches!(err, CacheError::Backend { .. }));

    assert!(!broken.holds("k"));
    assert!(slow.holds("k"));
}

/// With several failing branches the error that arrives first is returned,
/// whatever the registration order.
#[tokio::test]
async fn test_broadcast_write_returns_first_error_to_arrive() {
    let late = ScriptedProvider::new("late-broken")
        .with_latency(Duration::from_millis(60))
        .failing()
        .shared();
    let early = ScriptedProvider::new("early-broken")
        .with_latency(Duration::from_millis(5))
        .failing()
        .shared();
    let client = client_over(&[late.clone(), early.clone()]);

    match client.store("k", "v").await.unwrap_err() {
        CacheError::Backend { provider, .. } => assert_equal("early-broken".to_string(), provider),
        other => panic!("unexpected error: {other}"),
    }
    assert_equal(vec![Op::Set], late.ops());
    assert_equal(vec![Op::Set], early.ops());
}

/// A caller that gives up on a broadcast does not cancel writes in flight.
#[tokio::test]
async fn test_abandoned_write_still_reaches_slow_provider() {
    let fast = ScriptedProvider::new("fast").shared();
    let slow = ScriptedProvider::new("slow")
        .with_latency(Duration::from_millis(50))
        .shared();
    let client = client_over(&[fast.clone(), slow.clone()]);

    let abandoned = tokio::time::timeout(Duration::from_millis(10), client.store("k", "v")).await;
    assert!(abandoned.is_err());

    assert!(!slow.holds("k"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(fast.holds("k"));
    assert!(slow.holds("k"));
}

/// A caller that gives up on a race read does not cancel the lookups.
#[tokio::test]
async fn test_abandoned_read_branches_run_to_completion() {
    let slow = ScriptedProvider::new("slow")
        .with_latency(Duration::from_millis(50))
        .with_value("k", "v")
        .shared();
    let client = client_over(&[slow.clone()]);

    let abandoned = tokio::time::timeout(Duration::from_millis(10), async {
        let got: Result<String, CacheError> = client.fetch("k").await;
        got
    })
    .await;
    assert!(abandoned.is_err());

    assert_equal(0, slow.answered());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_equal(1, slow.answered());
}

#[tokio::test]
async fn test_broadcast_write_clears_previous_ttl() {
    let a = ScriptedProvider::new("a").with_value("k", "old").shared();
    let client = client_over(&[a.clone()]);

    assert_ok(client.set_ttl("k", 30).await);
    assert_equal(Some(30), a.ttl("k"));

    assert_ok(client.store("k", "new").await);
    assert_equal(None, a.ttl("k"));
}

/// NotFound from some providers is swallowed while another one removes the key.
#[tokio::test]
async fn test_remove_swallows_not_found() {
    let empty = ScriptedProvider::new("empty").shared();
    let holder = ScriptedProvider::new("holder").with_value("k", "v").shared();
    let client = client_over(&[empty.clone(), holder.clone()]);

    assert_ok(client.remove("k").await);

    assert!(!holder.holds("k"));
    assert_equal(
        vec![Call {
            op: Op::Remove,
            key: "k".to_string(),
        }],
        empty.calls(),
    );
    assert_equal(vec![Op::Remove], holder.ops());
}

#[tokio::test]
async fn test_remove_everywhere_missing_is_not_found() {
    let client = client_over(&[
        ScriptedProvider::new("a").shared(),
        ScriptedProvider::new("b").shared(),
    ]);

    let err = client.remove("k").await.unwrap_err();
    assert!(err.is_not_found());
}

/// Any error other than NotFound stops the sweep.
#[tokio::test]
async fn test_remove_stops_on_backend_error() {
    let broken = ScriptedProvider::new("broken").failing().shared();
    let holder = ScriptedProvider::new("holder").with_value("k", "v").shared();
    let client = client_over(&[broken, holder.clone()]);

    let err = client.remove("k").await.unwrap_err();
    assert!(matches!(err, CacheError::Backend { .. }));

    assert!(holder.holds("k"));
    assert!(holder.calls().is_empty());
}

#[tokio::test]
async fn test_set_ttl_applies_in_order() {
    let a = ScriptedProvider::new("a").with_value("k", "v").shared();
    let b = ScriptedProvider::new("b").with_value("k", "v").shared();
    let client = client_over(&[a.clone(), b.clone()]);

    assert_ok(client.set_ttl("k", 60).await);

    assert_equal(Some(60), a.ttl("k"));
    assert_equal(Some(60), b.ttl("k"));
}

/// The walk aborts at the first provider that misses the key.
#[tokio::test]
async fn test_set_ttl_aborts_on_first_error() {
    let first = ScriptedProvider::new("first").with_value("k", "v").shared();
    let missing = ScriptedProvider::new("missing").shared();
    let last = ScriptedProvider::new("last").with_value("k", "v").shared();
    let client = client_over(&[first.clone(), missing.clone(), last.clone()]);

    let err = client.set_ttl("k", 5).await.unwrap_err();
    assert!(err.is_not_found());

    assert_equal(Some(5), first.ttl("k"));
    assert_equal(vec![Op::SetTtl(5)], missing.ops());
    assert!(last.calls().is_empty());
    assert_equal(None, last.ttl("k"));
}

/// A provider that recovers is written to again on the next broadcast.
#[tokio::test]
async fn test_failing_provider_recovers() {
    let flaky = ScriptedProvider::new("flaky").failing().shared();
    let client = client_over(&[flaky.clone()]);

    assert!(client.store("k", "v1").await.is_err());
    flaky.set_failing(false);
    assert_ok(client.store("k", "v2").await);

    let got: String = assert_ok(client.fetch("k").await);
    assert_equal("v2".to_string(), got);
}
