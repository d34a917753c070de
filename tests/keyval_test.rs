//! Key-value zone operations against the fake API.

use nginx_plus_client::keyval::pairs;
use nginx_plus_client::NginxError;

mod common;
use common::FakeNginx;

#[tokio::test]
async fn test_http_key_val_lifecycle() {
    let nginx = FakeNginx::start().await;
    let client = nginx.client().await;

    client.add_key_val_pair("zone_one", "key1", "val1").await.unwrap();
    client.add_key_val_pair("zone_one", "key2", "val2").await.unwrap();
    assert_eq!(
        client.get_key_val_pairs("zone_one").await.unwrap(),
        pairs([("key1", "val1"), ("key2", "val2")])
    );

    client.modify_key_val_pair("zone_one", "key1", "changed").await.unwrap();
    client.delete_key_val_pair("zone_one", "key2").await.unwrap();
    assert_eq!(
        client.get_key_val_pairs("zone_one").await.unwrap(),
        pairs([("key1", "changed")])
    );

    let all = client.get_all_key_val_pairs().await.unwrap();
    assert_eq!(all["zone_one"], pairs([("key1", "changed")]));

    client.delete_key_val_pairs("zone_one").await.unwrap();
    assert!(client.get_key_val_pairs("zone_one").await.unwrap().is_empty());

    let methods: Vec<String> = nginx.writes().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["POST", "POST", "PATCH", "PATCH", "DELETE"]);
}

#[tokio::test]
async fn test_add_existing_key_is_rejected_by_nginx() {
    let nginx = FakeNginx::start().await;
    let client = nginx.client().await;

    client.add_key_val_pair("zone_one", "key1", "val1").await.unwrap();
    let err = client.add_key_val_pair("zone_one", "key1", "other").await.unwrap_err();
    assert!(matches!(err, NginxError::Api { expected: 201, actual: 409, .. }));
    assert_eq!(err.api_code(), Some("KeyvalKeyExists"));
}

#[tokio::test]
async fn test_modify_missing_key_is_rejected_by_nginx() {
    let nginx = FakeNginx::start().await;
    let client = nginx.client().await;

    let err = client.modify_key_val_pair("zone_one", "nope", "v").await.unwrap_err();
    assert!(matches!(err, NginxError::Api { expected: 204, actual: 404, .. }));
    assert_eq!(err.api_code(), Some("KeyvalKeyNotFound"));
}

#[tokio::test]
async fn test_stream_key_vals_are_separate() {
    let nginx = FakeNginx::start().await;
    let client = nginx.client().await;

    client.add_stream_key_val_pair("zone_stream", "key1", "val1").await.unwrap();
    client.modify_stream_key_val_pair("zone_stream", "key1", "val2").await.unwrap();
    assert_eq!(
        client.get_stream_key_val_pairs("zone_stream").await.unwrap(),
        pairs([("key1", "val2")])
    );
    assert!(client.get_key_val_pairs("zone_one").await.unwrap().is_empty());

    let all = client.get_all_stream_key_val_pairs().await.unwrap();
    assert_eq!(all.len(), 1);

    client.delete_stream_key_val_pair("zone_stream", "key1").await.unwrap();
    client.delete_stream_key_val_pairs("zone_stream").await.unwrap();
    assert!(client.get_stream_key_val_pairs("zone_stream").await.unwrap().is_empty());

    assert!(nginx
        .writes()
        .iter()
        .all(|r| r.path == "/api/9/stream/keyvals/zone_stream"));
}

#[tokio::test]
async fn test_unknown_zone() {
    let nginx = FakeNginx::start().await;
    let client = nginx.client().await;

    let err = client.get_key_val_pairs("missing").await.unwrap_err();
    assert_eq!(err.api_code(), Some("KeyvalZoneNotFound"));
}

#[tokio::test]
async fn test_empty_key_never_reaches_nginx() {
    let nginx = FakeNginx::start().await;
    let client = nginx.client().await;

    let err = client.add_key_val_pair("zone_one", "", "v").await.unwrap_err();
    assert!(matches!(err, NginxError::InvalidArgument(_)));
    assert!(nginx.requests().is_empty());
}
