//! PostgreSQL document store against a real database.
//!
//! Needs Docker. Run with: cargo test --test postgres_store_tests -- --ignored

mod common;

use std::sync::Arc;

use common::{sample_job, unique_collection, yearly_job, PostgresHarness};
use serde_json::json;
use test_context::test_context;
use walk_in_core::domains::jobs::{JobQuery, JobStatus, JobsDatabase, SingaporeRegion};
use walk_in_core::kernel::{BaseDocumentStore, DocumentQuery, SortDirection, StoreError};

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn insert_refuses_an_existing_id(ctx: &PostgresHarness) {
    let collection = unique_collection("insert");

    let first = ctx.store.insert(&collection, "a", json!({"n": 1})).await.unwrap();
    let second = ctx.store.insert(&collection, "a", json!({"n": 2})).await;

    assert_eq!(first.version, 1);
    assert!(matches!(second, Err(StoreError::Conflict { .. })));
    let stored = ctx.store.get(&collection, "a").await.unwrap().unwrap();
    assert_eq!(stored.data, json!({"n": 1}));
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn compare_and_swap_needs_the_current_version(ctx: &PostgresHarness) {
    let collection = unique_collection("cas");
    ctx.store.insert(&collection, "a", json!({"n": 1})).await.unwrap();

    let swapped = ctx
        .store
        .compare_and_swap(&collection, "a", 1, json!({"n": 2}))
        .await
        .unwrap();
    let stale = ctx
        .store
        .compare_and_swap(&collection, "a", 1, json!({"n": 3}))
        .await;
    let missing = ctx
        .store
        .compare_and_swap(&collection, "ghost", 1, json!({"n": 3}))
        .await;

    assert_eq!(swapped.version, 2);
    assert!(matches!(stale, Err(StoreError::Conflict { .. })));
    assert!(matches!(missing, Err(StoreError::Conflict { .. })));
    assert!(ctx.store.get(&collection, "ghost").await.unwrap().is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn query_filters_by_type_and_orders_by_path(ctx: &PostgresHarness) {
    let collection = unique_collection("query");
    for (id, data) in [
        ("a", json!({"pay": {"max": 300}, "region": "EAST"})),
        ("b", json!({"pay": {"max": 100}, "region": "EAST"})),
        ("c", json!({"pay": {"max": 200}, "region": "WEST"})),
        ("d", json!({"pay": {"max": "200"}, "region": "EAST"})),
        ("e", json!({"pay": {"max": 900}, "region": "EAST"})),
    ] {
        ctx.store.insert(&collection, id, data).await.unwrap();
    }

    let query = DocumentQuery::new()
        .where_greater_than_or_equal_to("pay.max", 100_i64)
        .where_less_than_or_equal_to("pay.max", 500_i64)
        .where_equal_to("region", "EAST")
        .order_by("pay.max", SortDirection::Descending);
    let ids: Vec<String> = ctx
        .store
        .query(&collection, &query)
        .await
        .unwrap()
        .into_iter()
        .map(|doc| doc.id)
        .collect();

    assert_eq!(ids, vec!["a", "b"]);
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn ping_succeeds(ctx: &PostgresHarness) {
    ctx.store.ping().await.unwrap();
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn jobs_database_lifecycle(ctx: &PostgresHarness) {
    let database = JobsDatabase::new(Arc::new(ctx.store.clone()));

    let added = database
        .add_job(sample_job("Barista", 12, SingaporeRegion::East))
        .unwrap();
    let job_id = added.job_id.clone();
    added.write.await.unwrap();

    let fetched = database.fetch_job(&job_id).await.unwrap().unwrap();
    assert_eq!(fetched.job_id, job_id);

    database.mark_job_post_as_deleted(&job_id).await.unwrap();
    let deleted = database.fetch_job(&job_id).await.unwrap().unwrap();
    assert_eq!(deleted.job_status, JobStatus::Deleted);

    let page = database.fetch_job_page(&JobQuery::default()).await.unwrap();
    assert!(page.job_list.iter().all(|job| job.job_id != job_id));
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn salary_listing_stays_within_bounds(ctx: &PostgresHarness) {
    let database = JobsDatabase::new(Arc::new(ctx.store.clone()));
    for (title, salary) in [("Low", 10_000), ("Mid", 60_000), ("High", 400_000)] {
        let added = database.add_job(yearly_job(title, salary)).unwrap();
        added.write.await.unwrap();
    }

    let query = JobQuery {
        max_limit: 100_000,
        ..JobQuery::default()
    };
    let page = database.fetch_job_page(&query).await.unwrap();

    let salaries: Vec<i64> = page.job_list.iter().map(|job| job.job_pay.annual_max).collect();
    assert!(salaries.iter().all(|salary| (0..=100_000).contains(salary)));
    assert!(salaries.windows(2).all(|pair| pair[0] <= pair[1]));
}
