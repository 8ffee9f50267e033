mod common;

use common::{START, payload, store_with_clock};
use ps_core::{
    ChannelStore, Clock, ReplayCursor, SinkEvent, StoreError, StoreLimits, SubscriberSink,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use bytes::Bytes;

/// Ticks one second per read; once armed, the next read blocks before returning
#[derive(Debug)]
struct StallingClock {
    next: AtomicI64,
    armed: AtomicBool,
}

impl StallingClock {
    fn new(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            armed: AtomicBool::new(false),
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl Clock for StallingClock {
    fn now(&self) -> i64 {
        let now = self.next.fetch_add(1, Ordering::SeqCst);
        if self.armed.swap(false, Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(300));
        }
        now
    }
}

#[tokio::test]
async fn given_empty_store_when_find_then_none() {
    let store = ChannelStore::default();

    assert!(store.find("news").await.is_none());
    assert_eq!(store.channel_count().await, 0);
}

#[tokio::test]
async fn given_new_name_when_get_or_create_then_channel_created_once() {
    let store = ChannelStore::default();

    let first = store.get_or_create("news").await.unwrap();
    let second = store.get_or_create("news").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.channel_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_creators_when_get_or_create_then_single_channel() {
    let store = ChannelStore::default();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.get_or_create("race").await.unwrap() })
        })
        .collect();

    let mut channels = Vec::new();
    for handle in handles {
        channels.push(handle.await.unwrap());
    }

    assert_eq!(store.channel_count().await, 1);
    assert!(
        channels
            .iter()
            .all(|c| Arc::ptr_eq(c, &channels[0]))
    );
}

#[tokio::test]
async fn given_channel_limit_when_exceeded_then_capacity_error_and_count_unchanged() {
    let store = ChannelStore::new(StoreLimits {
        max_channels: 2,
        ..StoreLimits::default()
    });
    store.get_or_create("a").await.unwrap();
    store.get_or_create("b").await.unwrap();

    let result = store.get_or_create("c").await;

    assert!(matches!(
        result,
        Err(StoreError::ChannelCapacityExceeded { current: 2, max: 2, .. })
    ));
    assert_eq!(store.channel_count().await, 2);
    assert!(store.get_or_create("a").await.is_ok());
}

#[tokio::test]
async fn given_publishes_when_admitted_then_ids_start_at_one_and_increase() {
    let store = ChannelStore::default();

    let ids: Vec<u64> = {
        let mut ids = Vec::new();
        for text in ["a", "b", "c"] {
            ids.push(store.publish("news", payload(text), None).await.unwrap().id);
        }
        ids
    };

    assert_eq!(ids, vec![1, 2, 3]);
    let other = store.publish("sports", payload("x"), None).await.unwrap();
    assert_eq!(other.id, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_publishers_when_admitted_then_ids_are_contiguous() {
    let store = ChannelStore::default();

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .publish("busy", payload(&format!("m{i}")), None)
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();

    assert_eq!(ids, (1..=100).collect::<Vec<u64>>());
    let channel = store.find("busy").await.unwrap();
    let stored: Vec<u64> = channel.messages().await.iter().map(|m| m.id).collect();
    assert_eq!(stored, (1..=100).collect::<Vec<u64>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_slow_clock_read_when_publishers_race_then_time_follows_id_order() {
    let clock = Arc::new(StallingClock::new(START));
    let store = ChannelStore::with_clock(StoreLimits::default(), clock.clone());
    store.get_or_create("race").await.unwrap();

    clock.arm();
    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.publish("race", payload("a"), None).await.unwrap() })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.publish("race", payload("b"), None).await.unwrap() })
    };
    first.await.unwrap();
    second.await.unwrap();

    let channel = store.find("race").await.unwrap();
    let backlog = channel.messages().await;
    assert_eq!(backlog.len(), 2);
    assert!(
        backlog
            .windows(2)
            .all(|pair| (pair[0].time, pair[0].tag) < (pair[1].time, pair[1].tag)),
        "backlog positions out of id order: {:?}",
        backlog
            .iter()
            .map(|m| (m.id, m.time, m.tag))
            .collect::<Vec<_>>()
    );

    let (sink, _rx) = SubscriberSink::channel(8);
    let resume = ReplayCursor::Since {
        time: backlog[0].time,
        tag: backlog[0].tag,
    };
    let replay = store
        .attach_subscriber(&channel, sink, Some(resume))
        .await
        .unwrap();
    let replayed: Vec<u64> = replay.iter().map(|m| m.id).collect();
    assert_eq!(replayed, vec![backlog[1].id]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_subscriber_when_message_delivered_then_store_total_already_counts_it() {
    let store = ChannelStore::default();
    let channel = store.get_or_create("news").await.unwrap();
    let (sink, mut rx) = SubscriberSink::channel(8);
    store.attach_subscriber(&channel, sink, None).await.unwrap();

    let publisher = {
        let store = store.clone();
        tokio::spawn(async move { store.publish("news", payload("a"), None).await.unwrap() })
    };

    let Some(SinkEvent::Message(message)) = rx.recv().await else {
        panic!("expected a message");
    };
    assert_eq!(message.id, 1);
    assert_eq!(store.published_messages_total(), 1);
    assert_eq!(channel.published_count().await, 1);

    publisher.await.unwrap();
    assert_eq!(store.stats_summary().await.published_messages, 1);
}

#[tokio::test]
async fn given_same_second_when_published_then_tags_increment() {
    let (store, clock) = store_with_clock(StoreLimits::default());

    let a = store.publish("news", payload("a"), None).await.unwrap();
    let b = store.publish("news", payload("b"), None).await.unwrap();
    let c = store.publish("news", payload("c"), None).await.unwrap();
    clock.advance(1);
    let d = store.publish("news", payload("d"), None).await.unwrap();

    assert_eq!((a.time, a.tag), (START, 0));
    assert_eq!((b.time, b.tag), (START, 1));
    assert_eq!((c.time, c.tag), (START, 2));
    assert_eq!((d.time, d.tag), (START + 1, 0));
}

#[tokio::test]
async fn given_max_two_when_three_published_then_oldest_evicted() {
    let store = ChannelStore::new(StoreLimits {
        max_messages_stored_per_channel: 2,
        ..StoreLimits::default()
    });

    for text in ["a", "b", "c"] {
        store.publish("news", payload(text), None).await.unwrap();
    }

    let channel = store.find("news").await.unwrap();
    let stored = channel.messages().await;
    let texts: Vec<String> = stored.iter().map(|m| m.text()).collect();
    let ids: Vec<u64> = stored.iter().map(|m| m.id).collect();
    assert_eq!(texts, vec!["b", "c"]);
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(channel.published_count().await, 3);
    assert_eq!(store.published_messages_total(), 3);
}

#[tokio::test]
async fn given_channel_when_deleted_then_gone_and_recreated_on_publish() {
    let store = ChannelStore::default();
    store.publish("news", payload("a"), None).await.unwrap();
    store.publish("news", payload("b"), None).await.unwrap();

    assert!(store.delete("news").await);
    assert!(store.find("news").await.is_none());
    assert!(!store.delete("news").await);

    let fresh = store.publish("news", payload("c"), None).await.unwrap();
    assert_eq!(fresh.id, 1);
}

#[tokio::test]
async fn given_reserved_name_when_published_then_forbidden_and_nothing_created() {
    let store = ChannelStore::default();

    for name in ["ALL", "news*", "*"] {
        let result = store.publish(name, payload("x"), None).await;
        assert!(matches!(
            result,
            Err(StoreError::ForbiddenChannelName { .. })
        ));
    }
    assert_eq!(store.channel_count().await, 0);
}

#[tokio::test]
async fn given_ttl_when_published_then_expiry_set() {
    let (store, _clock) = store_with_clock(StoreLimits {
        message_ttl_secs: 60,
        ..StoreLimits::default()
    });

    let message = store.publish("news", payload("a"), None).await.unwrap();

    assert_eq!(message.expires, Some(START + 60));
}

#[tokio::test]
async fn given_store_disabled_when_published_then_nothing_stored_and_no_tag_or_expiry() {
    let store = ChannelStore::new(StoreLimits {
        store_messages: false,
        message_ttl_secs: 60,
        ..StoreLimits::default()
    });

    let first = store.publish("news", payload("a"), None).await.unwrap();
    let second = store.publish("news", payload("b"), None).await.unwrap();

    assert_eq!((first.id, second.id), (1, 2));
    assert_eq!(second.tag, 0);
    assert!(second.expires.is_none());
    let channel = store.find("news").await.unwrap();
    assert_eq!(channel.stored_count().await, 0);
    assert_eq!(channel.published_count().await, 2);
}

#[tokio::test]
async fn given_memory_budget_when_exhausted_then_allocation_failure_consumes_no_id() {
    let store = ChannelStore::new(StoreLimits {
        shared_memory_size: 4096,
        ..StoreLimits::default()
    });
    store.publish("news", payload("small"), None).await.unwrap();

    let big = Bytes::from(vec![b'x'; 8192]);
    let result = store.publish("news", big, None).await;

    assert!(matches!(result, Err(StoreError::AllocationFailure { .. })));
    let channel = store.find("news").await.unwrap();
    assert_eq!(channel.last_message_id().await, 1);
    assert_eq!(channel.published_count().await, 1);

    let next = store.publish("news", payload("again"), None).await.unwrap();
    assert_eq!(next.id, 2);
}

#[tokio::test]
async fn given_deleted_channel_when_memory_checked_then_released() {
    let store = ChannelStore::new(StoreLimits {
        shared_memory_size: 1 << 20,
        ..StoreLimits::default()
    });
    store.publish("news", payload("a"), None).await.unwrap();
    assert!(store.memory_used() > 0);

    store.delete("news").await;

    assert_eq!(store.memory_used(), 0);
}

#[tokio::test]
async fn given_event_name_when_published_then_kept_on_message() {
    let store = ChannelStore::default();

    let message = store
        .publish("news", payload("a"), Some("update".to_string()))
        .await
        .unwrap();

    assert_eq!(message.event.as_deref(), Some("update"));
}
