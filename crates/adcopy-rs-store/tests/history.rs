//! Ordering, paging, and filtering of the SQLite generation log.

use adcopy_rs_store::{GenerationRecord, HistoryQuery, RecordStore, SqliteRecordStore};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

async fn seeded_store(count: usize) -> SqliteRecordStore {
    let store = SqliteRecordStore::open_in_memory().expect("store");
    for index in 0..count {
        store
            .insert(&format!("Product {index}"), "friendly", &format!("Ad {index}"))
            .await
            .expect("insert");
    }
    store
}

fn assert_newest_first(records: &[GenerationRecord]) {
    for pair in records.windows(2) {
        let (newer, older) = (&pair[0], &pair[1]);
        assert!(
            (newer.created_at, newer.id) > (older.created_at, older.id),
            "records out of order: {} then {}",
            newer.id,
            older.id
        );
    }
}

#[tokio::test]
async fn list_never_exceeds_limit_and_is_newest_first() {
    let store = seeded_store(12).await;
    let page = store.list(&HistoryQuery::first(5)).await.expect("list");
    assert_eq!(page.len(), 5);
    assert_newest_first(&page);
    assert_eq!(page[0].id, 12);
}

#[tokio::test]
async fn consecutive_pages_partition_the_log() {
    let store = seeded_store(23).await;
    let everything = store.list(&HistoryQuery::first(1_000)).await.expect("all");
    assert_eq!(everything.len(), 23);

    for limit in [1, 4, 7, 23, 30] {
        for start in [0, 3, 10] {
            let first = HistoryQuery::first(limit).offset(start);
            let second = first.next_page();
            let a = store.list(&first).await.expect("first page");
            let b = store.list(&second).await.expect("second page");

            let expected: Vec<i64> = everything
                .iter()
                .skip(start as usize)
                .take((2 * limit) as usize)
                .map(|record| record.id)
                .collect();
            let actual: Vec<i64> = a.iter().chain(b.iter()).map(|record| record.id).collect();
            assert_eq!(actual, expected, "limit={limit} offset={start}");
        }
    }
}

#[tokio::test]
async fn offset_past_end_returns_empty_page() {
    let store = seeded_store(3).await;
    let page = store
        .list(&HistoryQuery::first(10).offset(50))
        .await
        .expect("list");
    assert!(page.is_empty());
}

#[tokio::test]
async fn product_filter_is_case_insensitive_substring() {
    let store = SqliteRecordStore::open_in_memory().expect("store");
    store.insert("ProconAI", "confident", "one").await.expect("insert");
    store.insert("Acme Roofing", "warm", "two").await.expect("insert");
    store.insert("PROCON Kitchens", "bold", "three").await.expect("insert");
    store.insert("Ärzte Zentrum", "calm", "four").await.expect("insert");

    let hits = store
        .list(&HistoryQuery::first(10).product("procon"))
        .await
        .expect("list");
    let products: Vec<&str> = hits.iter().map(|record| record.product.as_str()).collect();
    assert_eq!(products, vec!["PROCON Kitchens", "ProconAI"]);

    let hits = store
        .list(&HistoryQuery::first(10).product("äRZTE"))
        .await
        .expect("list");
    assert_eq!(hits.len(), 1);

    let misses = store
        .list(&HistoryQuery::first(10).product("plumbing"))
        .await
        .expect("list");
    assert!(misses.is_empty());
}

#[tokio::test]
async fn non_positive_limit_is_invalid() {
    let store = seeded_store(1).await;
    let err = store.list(&HistoryQuery::first(0)).await.unwrap_err();
    assert!(format!("{err}").contains("limit"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_get_unique_ids_and_stay_ordered() {
    let store = Arc::new(SqliteRecordStore::open_in_memory().expect("store"));
    let mut handles = Vec::new();
    for index in 0..40 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert(&format!("Concurrent {index}"), "friendly", "text")
                .await
                .expect("insert")
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        let record = handle.await.expect("join");
        assert!(ids.insert(record.id), "duplicate id {}", record.id);
    }

    let all = store.list(&HistoryQuery::first(100)).await.expect("list");
    assert_eq!(all.len(), 40);
    assert_newest_first(&all);
    let listed: HashSet<i64> = all.iter().map(|record| record.id).collect();
    assert_eq!(listed, ids);
}
