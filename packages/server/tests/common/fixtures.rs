//! Test fixtures: sample job posts and an instrumented document store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use walk_in_core::domains::jobs::{
    Job, JobLocation, JobPayment, Location, PaymentFrequency, SingaporeRegion,
};
use walk_in_core::kernel::{
    BaseDocumentStore, Document, DocumentQuery, MemoryDocumentStore, StoreError, WriteResult,
};

/// Hourly job post in the given region; its annual max is `hourly_max * 2080`
pub fn sample_job(title: &str, hourly_max: i64, region: SingaporeRegion) -> Job {
    Job::builder()
        .job_title(title)
        .job_description(format!("{} wanted, walk in anytime", title))
        .job_location(JobLocation::new(
            Location::new("1 Raffles Place", 1.25, 103.75),
            "048616",
            region,
        ))
        .job_pay(JobPayment::new(
            hourly_max / 2,
            hourly_max,
            PaymentFrequency::Hourly,
        ))
        .post_expiry(Utc.with_ymd_and_hms(2030, 6, 30, 0, 0, 0).unwrap())
        .build()
}

/// Yearly job post paying `annual_max` in the central region
pub fn yearly_job(title: &str, annual_max: i64) -> Job {
    Job::builder()
        .job_title(title)
        .job_location(JobLocation::new(
            Location::new("10 Anson Road", 1.25, 103.75),
            "079903",
            SingaporeRegion::Central,
        ))
        .job_pay(JobPayment::new(0, annual_max, PaymentFrequency::Yearly))
        .post_expiry(Utc.with_ymd_and_hms(2030, 6, 30, 0, 0, 0).unwrap())
        .build()
}

/// Write applied by another client between a read and the following swap
struct InterleavedWrite {
    collection: String,
    id: String,
    data: Value,
}

/// In-memory store that counts the calls it receives and can be slowed down.
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: MemoryDocumentStore,
    writes: Arc<AtomicUsize>,
    queries: Arc<AtomicUsize>,
    delay: Option<Duration>,
    interleaved: Arc<Mutex<Option<InterleavedWrite>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before reaching the store
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }

    /// Overwrite `collection/id` with `data` right before the next
    /// `compare_and_swap`, as a concurrent writer would
    pub fn interleave_before_next_swap(&self, collection: &str, id: &str, data: Value) {
        *self.interleaved.lock().unwrap() = Some(InterleavedWrite {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        });
    }

    /// Number of insert/compare-and-swap calls
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl BaseDocumentStore for RecordingStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.pause().await;
        self.inner.get(collection, id).await
    }

    async fn insert(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<WriteResult, StoreError> {
        self.pause().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(collection, id, data).await
    }

    async fn compare_and_swap(
        &self,
        collection: &str,
        id: &str,
        expected_version: i64,
        data: Value,
    ) -> Result<WriteResult, StoreError> {
        self.pause().await;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let interleaved = self.interleaved.lock().unwrap().take();
        if let Some(write) = interleaved {
            self.inner
                .set(&write.collection, &write.id, write.data)
                .await;
        }

        self.inner
            .compare_and_swap(collection, id, expected_version, data)
            .await
    }

    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, StoreError> {
        self.pause().await;
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(collection, query).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.pause().await;
        self.inner.ping().await
    }
}
