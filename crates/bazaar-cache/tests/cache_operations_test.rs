//! Integration tests for RedisCacheService value operations.
//!
//! These tests run against a real Redis server using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use bazaar_cache::{CacheErrorKind, CacheExt, CacheService, KeyTtl};
use common::TestRedis;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

#[tokio::test]
async fn test_scalar_round_trips() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    let cases = [
        ("string", json!("hello marketplace")),
        ("int", json!(42)),
        ("negative", json!(-17)),
        ("float", json!(19.99)),
        ("bool", json!(true)),
        ("null", Value::Null),
        ("map", json!({"seller": {"id": 7, "verified": true}, "tags": ["design", "logo"]})),
        ("list", json!([1, "two", 3.5, false])),
    ];

    for (key, value) in &cases {
        cache.set(key, value, None).await.expect("set failed");
        let read = cache.get(key).await.expect("get failed");
        assert_eq!(read.as_ref(), Some(value), "round trip of {key}");
    }
}

#[tokio::test]
async fn test_integer_does_not_come_back_as_float() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.set("qty", &json!(3), None).await.unwrap();
    let read = cache.get("qty").await.unwrap().unwrap();
    assert!(read.is_i64());
    assert_eq!(read.as_i64(), Some(3));
}

#[tokio::test]
async fn test_missing_key_is_none() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    assert_eq!(cache.get("nope").await.unwrap(), None);
    assert_eq!(cache.hget("nope", "field").await.unwrap(), None);
    assert!(!cache.exists("nope").await.unwrap());
    assert_eq!(cache.ttl("nope").await.unwrap(), KeyTtl::Missing);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.set("gone", &json!("soon"), None).await.unwrap();
    cache.delete("gone").await.unwrap();
    cache.delete("gone").await.unwrap();
    assert!(!cache.exists("gone").await.unwrap());
}

#[tokio::test]
async fn test_short_ttl_expires() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache
        .set("flash", &json!("sale"), Some(Duration::from_secs(1)))
        .await
        .unwrap();
    assert!(cache.exists("flash").await.unwrap());
    assert!(matches!(
        cache.ttl("flash").await.unwrap(),
        KeyTtl::Expires(d) if d <= Duration::from_secs(1)
    ));

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!cache.exists("flash").await.unwrap());
    assert_eq!(cache.get("flash").await.unwrap(), None);
}

#[tokio::test]
async fn test_default_ttl_applied() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.set("defaulted", &json!(1), None).await.unwrap();
    let remaining = cache.ttl("defaulted").await.unwrap().remaining().unwrap();
    assert!(remaining > Duration::from_secs(50) && remaining <= Duration::from_secs(60));
}

#[tokio::test]
async fn test_zero_default_ttl_means_persistent() {
    let redis = TestRedis::new().await;
    let mut config = redis.config("it:");
    config.default_ttl_secs = 0;
    let cache = redis.cache_with(config).await;

    cache.set("forever", &json!("x"), None).await.unwrap();
    assert_eq!(cache.ttl("forever").await.unwrap(), KeyTtl::Persistent);
}

#[tokio::test]
async fn test_expire_resets_lifetime() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.set("lease", &json!("x"), Some(Duration::from_secs(5))).await.unwrap();
    cache.expire("lease", Duration::from_secs(120)).await.unwrap();

    let remaining = cache.ttl("lease").await.unwrap().remaining().unwrap();
    assert!(remaining > Duration::from_secs(100));
}

#[tokio::test]
async fn test_concurrent_increments_are_atomic() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.increment("views", 1).await })
        })
        .collect();

    for task in futures::future::join_all(tasks).await {
        task.expect("task panicked").expect("increment failed");
    }

    assert_eq!(cache.get("views").await.unwrap(), Some(json!(50)));
    assert_eq!(cache.increment("views", -10).await.unwrap(), 40);
}

#[tokio::test]
async fn test_increment_non_integer_is_error() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.set("title", &json!("logo design"), None).await.unwrap();

    let err = cache.increment("title", 1).await.unwrap_err();
    assert_eq!(err.kind(), CacheErrorKind::Command);
    assert!(!err.is_connectivity());
    assert!(cache.is_connected());
}

#[tokio::test]
async fn test_wrong_type_is_command_error() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.hset("cart", "svc_logo", &json!(1)).await.unwrap();

    let err = cache.lrange("cart", 0, -1).await.unwrap_err();
    assert!(err.is_command(), "unexpected error: {err}");
    assert!(!err.is_connectivity());
}

#[tokio::test]
async fn test_list_keeps_argument_order() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    let v1 = json!({"service": "svc-1"});
    let v2 = json!("svc-2");
    cache.lpush("recent", &[v1.clone(), v2.clone()]).await.unwrap();

    assert_eq!(cache.lrange("recent", 0, -1).await.unwrap(), vec![v1.clone(), v2.clone()]);
    assert_eq!(cache.lrange("recent", -1, -1).await.unwrap(), vec![v2]);

    cache.lpush("recent", &[json!(3)]).await.unwrap();
    assert_eq!(cache.lrange("recent", 0, 0).await.unwrap(), vec![json!(3)]);
    assert!(cache.lrange("empty", 0, -1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_hash_operations() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.hset("profile", "name", &json!("Amina")).await.unwrap();
    cache.hset("profile", "rating", &json!(4.8)).await.unwrap();
    cache.hset("profile", "skills", &json!(["seo", "copy"])).await.unwrap();
    cache.hset("profile", "orders", &json!(17)).await.unwrap();
    cache.hset("profile", "verified", &json!(true)).await.unwrap();
    cache.hset("profile", "links", &json!({"site": "amina.dev"})).await.unwrap();

    assert_eq!(cache.hget("profile", "name").await.unwrap(), Some(json!("Amina")));
    assert_eq!(cache.hget("profile", "rating").await.unwrap(), Some(json!(4.8)));
    assert_eq!(cache.hget("profile", "orders").await.unwrap(), Some(json!(17)));
    assert_eq!(cache.hget("profile", "verified").await.unwrap(), Some(json!(true)));
    assert_eq!(
        cache.hget("profile", "links").await.unwrap(),
        Some(json!({"site": "amina.dev"}))
    );
    assert_eq!(cache.hget("profile", "missing").await.unwrap(), None);

    let all = cache.hget_all("profile").await.unwrap();
    let expected: HashMap<String, Value> = [
        ("name".to_string(), json!("Amina")),
        ("rating".to_string(), json!(4.8)),
        ("skills".to_string(), json!(["seo", "copy"])),
        ("orders".to_string(), json!(17)),
        ("verified".to_string(), json!(true)),
        ("links".to_string(), json!({"site": "amina.dev"})),
    ]
    .into_iter()
    .collect();
    assert_eq!(all, expected);

    cache
        .hdel("profile", &["name".to_string(), "skills".to_string()])
        .await
        .unwrap();
    cache.hdel("profile", &[]).await.unwrap();
    assert_eq!(cache.hget_all("profile").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_hash_quantities_round_trip_exactly() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.hset("cart:u-7", "item-a", &json!(2)).await.unwrap();
    cache.hset("cart:u-7", "item-b", &json!(5)).await.unwrap();

    let expected: HashMap<String, Value> =
        [("item-a".to_string(), json!(2)), ("item-b".to_string(), json!(5))]
            .into_iter()
            .collect();
    assert_eq!(cache.hget_all("cart:u-7").await.unwrap(), expected);
    assert_eq!(cache.hget("cart:u-7", "item-b").await.unwrap().and_then(|v| v.as_i64()), Some(5));
}

#[tokio::test]
async fn test_hget_all_fails_on_foreign_payload() {
    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    cache.hset("mixed", "ok", &json!(1)).await.unwrap();

    let client = redis::Client::open(redis.url()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: i64 = redis::cmd("HSET")
        .arg("it:mixed")
        .arg("bad")
        .arg("not json")
        .query_async(&mut conn)
        .await
        .unwrap();

    let err = cache.hget_all("mixed").await.unwrap_err();
    assert!(err.is_serialization());
    assert!(!err.is_connectivity());
}

#[tokio::test]
async fn test_typed_helpers() {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Listing {
        id: String,
        price_cents: u64,
    }

    let redis = TestRedis::new().await;
    let cache = redis.cache("it:").await;

    let listing = Listing {
        id: "svc_1".to_string(),
        price_cents: 2500,
    };
    cache.set_as("service:svc_1", &listing, None).await.unwrap();
    let read: Option<Listing> = cache.get_as("service:svc_1").await.unwrap();
    assert_eq!(read, Some(listing));

    let computed: Result<u64, String> = cache
        .get_or_set("service:count", None, || async { Ok(12) })
        .await;
    assert_eq!(computed.unwrap(), 12);
    assert_eq!(cache.get("service:count").await.unwrap(), Some(json!(12)));
}
