mod common;

use common::{START, payload, store_with_clock};
use ps_core::{ChannelQuery, StoreError, StoreLimits, SubscriberSink};

#[tokio::test]
async fn given_activity_when_summarized_then_counters_match() {
    let (store, clock) = store_with_clock(StoreLimits {
        max_messages_stored_per_channel: 1,
        ..StoreLimits::default()
    });
    store.publish("news", payload("a"), None).await.unwrap();
    store.publish("news", payload("b"), None).await.unwrap();
    store.publish("sports", payload("c"), None).await.unwrap();
    let channel = store.find("news").await.unwrap();
    let (sink, _rx) = SubscriberSink::channel(4);
    store.attach_subscriber(&channel, sink, None).await.unwrap();
    clock.advance(30);

    let summary = store.stats_summary().await;

    assert_eq!(summary.channels, 2);
    assert_eq!(summary.stored_messages, 2);
    assert_eq!(summary.published_messages, 3);
    assert_eq!(summary.subscribers, 1);
    assert_eq!(summary.time, START + 30);
    assert_eq!(summary.uptime_secs, 30);
}

#[tokio::test]
async fn given_channels_when_detail_all_then_sorted_by_name() {
    let (store, _clock) = store_with_clock(StoreLimits::default());
    for name in ["sports", "news", "weather"] {
        store.publish(name, payload("x"), None).await.unwrap();
    }

    let stats = store.stats_detail(&ChannelQuery::All).await.unwrap();

    let names: Vec<&str> = stats.iter().map(|s| s.channel.as_str()).collect();
    assert_eq!(names, vec!["news", "sports", "weather"]);
    assert!(stats.iter().all(|s| s.published_messages == 1));
}

#[tokio::test]
async fn given_prefix_query_when_detailed_then_only_matching_channels() {
    let (store, _clock) = store_with_clock(StoreLimits::default());
    for name in ["sport/football", "sport/tennis", "news"] {
        store.publish(name, payload("x"), None).await.unwrap();
    }

    let stats = store
        .stats_detail(&ChannelQuery::Prefix("sport".into()))
        .await
        .unwrap();

    let names: Vec<&str> = stats.iter().map(|s| s.channel.as_str()).collect();
    assert_eq!(names, vec!["sport/football", "sport/tennis"]);
}

#[tokio::test]
async fn given_unknown_channel_when_exact_detail_then_not_found() {
    let (store, _clock) = store_with_clock(StoreLimits::default());

    let result = store
        .stats_detail(&ChannelQuery::Exact("missing".into()))
        .await;

    assert!(matches!(result, Err(StoreError::ChannelNotFound { .. })));
}

#[tokio::test]
async fn given_known_channel_when_exact_detail_then_single_entry() {
    let (store, clock) = store_with_clock(StoreLimits::default());
    store.publish("news", payload("a"), None).await.unwrap();
    clock.advance(7);
    store.publish("news", payload("b"), None).await.unwrap();

    let stats = store
        .stats_detail(&ChannelQuery::Exact("news".into()))
        .await
        .unwrap();

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].published_messages, 2);
    assert_eq!(stats[0].stored_messages, 2);
    assert_eq!(stats[0].created_at, START);
    assert_eq!(stats[0].last_activity_at, START + 7);
}
