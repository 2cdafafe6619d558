//! Persistence and retrieval of job posts.
//!
//! Edits and deletes are check-then-write sequences: the current document is
//! read, then written back with `compare_and_swap` against the version that
//! was read, so a post deleted or changed in between is never overwritten.
//! A lost race fails the call; nothing is retried.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::try_join_all;
use futures::FutureExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, Instrument};

use super::errors::JobsError;
use super::models::{Applicant, Filter, Job, JobPage, JobQuery, JobStatus, SingaporeRegion};
use crate::kernel::{BaseDocumentStore, Document, DocumentQuery, WriteResult};

pub const JOB_COLLECTION: &str = "Jobs";
pub const APPLICANT_COLLECTION: &str = "Applicants";

pub const SALARY_FIELD: &str = "jobPay.annualMax";
pub const REGION_FIELD: &str = "jobLocation.region";
pub const JOB_STATUS_FIELD: &str = "jobStatus";

/// Write spawned by `add_job`. Awaiting it yields the write acknowledgment;
/// dropping it does not cancel the write.
pub struct PendingWrite(JoinHandle<Result<WriteResult, JobsError>>);

impl Future for PendingWrite {
    type Output = Result<WriteResult, JobsError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.0.poll_unpin(cx).map(|joined| {
            joined.unwrap_or_else(|e| Err(JobsError::Internal(format!("write task failed: {}", e))))
        })
    }
}

/// Id generated for a new post, with its in-flight write
pub struct AddJobResult {
    pub job_id: String,
    pub write: PendingWrite,
}

/// Helps persist and retrieve job posts.
#[derive(Clone)]
pub struct JobsDatabase {
    store: Arc<dyn BaseDocumentStore>,
}

impl JobsDatabase {
    pub fn new(store: Arc<dyn BaseDocumentStore>) -> Self {
        Self { store }
    }

    /// Adds a newly created job post.
    ///
    /// The id is generated and stamped on the post before the write starts,
    /// so it is available immediately. Must be called inside a tokio runtime.
    #[instrument(skip(self, new_job), fields(job_title = %new_job.job_title))]
    pub fn add_job(&self, new_job: Job) -> Result<AddJobResult, JobsError> {
        let job_id = self.store.new_document_id();
        let job = new_job.with_job_id(job_id.clone());
        let data = serde_json::to_value(&job)?;

        let store = Arc::clone(&self.store);
        let id = job_id.clone();
        let handle = tokio::spawn(
            async move {
                let result = store.insert(JOB_COLLECTION, &id, data).await?;
                info!(job_id = %id, "job post created");
                Ok::<_, JobsError>(result)
            }
            .in_current_span(),
        );

        Ok(AddJobResult {
            job_id,
            write: PendingWrite(handle),
        })
    }

    /// Replaces an existing job post wholesale. The stored id is always `job_id`.
    #[instrument(skip(self, updated_job))]
    pub async fn set_job(&self, job_id: &str, updated_job: Job) -> Result<WriteResult, JobsError> {
        ensure_non_empty(job_id, "Job Id")?;

        let job = updated_job.with_job_id(job_id);
        let data = serde_json::to_value(&job)?;

        // TODO: verify the business account owns this post once log-in is wired up
        let current = self.existing_job_document(job_id).await?;

        let result = self
            .store
            .compare_and_swap(JOB_COLLECTION, job_id, current.version, data)
            .await?;

        info!(version = result.version, "job post updated");
        Ok(result)
    }

    /// Marks a job post as DELETED. Only the status field is rewritten.
    #[instrument(skip(self))]
    pub async fn mark_job_post_as_deleted(&self, job_id: &str) -> Result<WriteResult, JobsError> {
        ensure_non_empty(job_id, "Job Id")?;

        let current = self.existing_job_document(job_id).await?;
        let version = current.version;
        let mut data = current.data;

        let fields = data
            .as_object_mut()
            .ok_or_else(|| JobsError::Internal(format!("job post {} is not an object", job_id)))?;
        fields.insert(
            JOB_STATUS_FIELD.to_string(),
            Value::String(JobStatus::Deleted.as_str().to_string()),
        );

        let result = self
            .store
            .compare_and_swap(JOB_COLLECTION, job_id, version, data)
            .await?;

        info!(version = result.version, "job post marked as deleted");
        Ok(result)
    }

    /// Fetches one job post, `None` if no post has this id.
    #[instrument(skip(self))]
    pub async fn fetch_job(&self, job_id: &str) -> Result<Option<Job>, JobsError> {
        ensure_non_empty(job_id, "Job Id")?;

        let document = self.store.get(JOB_COLLECTION, job_id).await?;
        Ok(document.map(|doc| doc.to_object::<Job>()).transpose()?)
    }

    /// Gets the active job posts matching the query.
    ///
    /// Only sorting/filtering by salary is supported; other filters fail
    /// before anything is sent to the store.
    #[instrument(skip(self))]
    pub async fn fetch_job_page(&self, job_query: &JobQuery) -> Result<JobPage, JobsError> {
        if job_query.sort_by != Filter::Salary {
            return Err(JobsError::UnsupportedOperation(
                "currently this app only supports sorting/filtering by salary".to_string(),
            ));
        }

        let mut query = DocumentQuery::new()
            .where_greater_than_or_equal_to(SALARY_FIELD, job_query.min_limit)
            .where_less_than_or_equal_to(SALARY_FIELD, job_query.max_limit)
            .where_equal_to(JOB_STATUS_FIELD, JobStatus::Active.as_str())
            .order_by(SALARY_FIELD, job_query.order.direction());

        if job_query.region != SingaporeRegion::Entire {
            query = query.where_equal_to(REGION_FIELD, job_query.region.as_str());
        }

        let documents = self.store.query(JOB_COLLECTION, &query).await?;
        let jobs = documents
            .iter()
            .map(Document::to_object::<Job>)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(matched = jobs.len(), "job page fetched");
        Ok(JobPage::from_jobs(jobs))
    }

    /// Adds a job to, or removes it from, the applicant's interested list.
    ///
    /// `interested` is the applicant's current state: `true` means they are
    /// already interested and want the job removed, `false` adds it.
    #[instrument(skip(self))]
    pub async fn update_interested_jobs_list(
        &self,
        applicant_id: &str,
        job_id: &str,
        interested: bool,
    ) -> Result<Applicant, JobsError> {
        ensure_non_empty(applicant_id, "Applicant Id")?;
        ensure_non_empty(job_id, "Job Id")?;

        self.existing_job_document(job_id).await?;

        let Some(document) = self.store.get(APPLICANT_COLLECTION, applicant_id).await? else {
            let mut applicant = Applicant::new(applicant_id);
            if interested {
                // Nothing to remove from a list that does not exist yet
                return Ok(applicant);
            }
            applicant.add_interested_job(job_id);
            self.store
                .insert(APPLICANT_COLLECTION, applicant_id, serde_json::to_value(&applicant)?)
                .await?;
            info!("interested list created");
            return Ok(applicant);
        };

        let mut applicant: Applicant = document.to_object()?;
        let changed = if interested {
            applicant.remove_interested_job(job_id)
        } else {
            applicant.add_interested_job(job_id)
        };

        if changed {
            self.store
                .compare_and_swap(
                    APPLICANT_COLLECTION,
                    applicant_id,
                    document.version,
                    serde_json::to_value(&applicant)?,
                )
                .await?;
            info!(count = applicant.interested_jobs.len(), "interested list updated");
        }

        Ok(applicant)
    }

    /// The applicant's interested job posts that still exist and are not deleted.
    #[instrument(skip(self))]
    pub async fn fetch_interested_job_page(&self, applicant_id: &str) -> Result<JobPage, JobsError> {
        ensure_non_empty(applicant_id, "Applicant Id")?;

        let Some(document) = self.store.get(APPLICANT_COLLECTION, applicant_id).await? else {
            return Ok(JobPage::from_jobs(Vec::new()));
        };
        let applicant: Applicant = document.to_object()?;

        let jobs = try_join_all(applicant.interested_jobs.iter().map(|id| self.fetch_job(id)))
            .await?
            .into_iter()
            .flatten()
            .filter(|job| job.job_status != JobStatus::Deleted)
            .collect();

        Ok(JobPage::from_jobs(jobs))
    }

    /// Reads a job document, failing with `InvalidArgument` if it does not exist
    async fn existing_job_document(&self, job_id: &str) -> Result<Document, JobsError> {
        self.store
            .get(JOB_COLLECTION, job_id)
            .await?
            .ok_or_else(|| JobsError::invalid_argument("Invalid jobId"))
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<(), JobsError> {
    if value.is_empty() {
        return Err(JobsError::invalid_argument(format!(
            "{} should be a non-empty string",
            name
        )));
    }
    Ok(())
}
