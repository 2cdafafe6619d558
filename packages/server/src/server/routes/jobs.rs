//! Job post routes: create, edit, fetch, list and delete.

use axum::{
    extract::{rejection::FormRejection, Extension, Form, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use super::response::{json_response, run_bounded, BadRequest};
use crate::common::{from_json, RequestParams};
use crate::domains::jobs::{Filter, Job, JobQuery, JobsError, Order, SingaporeRegion};
use crate::server::app::AxumAppState;

pub const JOB_ID_PARAM: &str = "jobId";
pub const REGION_PARAM: &str = "region";
pub const SORT_BY_PARAM: &str = "sortBy";
pub const MIN_LIMIT_PARAM: &str = "minLimit";
pub const MAX_LIMIT_PARAM: &str = "maxLimit";
pub const ORDER_PARAM: &str = "order";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewJobResponse {
    job_id: String,
}

/// POST /jobs - JSON job post in the body, answers with the generated id
#[instrument(skip_all)]
pub async fn new_job_handler(
    Extension(state): Extension<AxumAppState>,
    body: String,
) -> Result<Response, BadRequest> {
    let job = parse_job(&body)?;

    let added = state.jobs_database.add_job(job)?;
    run_bounded(state.request_timeout, added.write).await?;

    json_response(&NewJobResponse {
        job_id: added.job_id,
    })
}

/// PATCH /jobs - replaces the post named by the body's `jobId`
#[instrument(skip_all)]
pub async fn update_job_handler(
    Extension(state): Extension<AxumAppState>,
    body: String,
) -> Result<StatusCode, BadRequest> {
    let job = parse_job(&body)?;
    let job_id = job.job_id.clone();

    let jobs_database = state.jobs_database.clone();
    run_bounded(state.request_timeout, async move {
        jobs_database.set_job(&job_id, job).await
    })
    .await?;

    Ok(StatusCode::OK)
}

/// GET /jobs?jobId= - 404 when no post has the id
#[instrument(skip_all)]
pub async fn get_job_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<RequestParams>,
) -> Result<Response, BadRequest> {
    let job_id = parse_job_id(&params)?;

    let jobs_database = state.jobs_database.clone();
    let job = run_bounded(state.request_timeout, async move {
        jobs_database.fetch_job(&job_id).await
    })
    .await?;

    match job {
        Some(job) => json_response(&job),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// GET /jobs/listings - active posts filtered and sorted by salary
#[instrument(skip_all)]
pub async fn job_listings_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<RequestParams>,
) -> Result<Response, BadRequest> {
    let job_query = parse_job_query(&params)?;

    let jobs_database = state.jobs_database.clone();
    let page = run_bounded(state.request_timeout, async move {
        jobs_database.fetch_job_page(&job_query).await
    })
    .await?;

    json_response(&page)
}

/// POST /jobs/delete - form field `jobId`
#[instrument(skip_all)]
pub async fn delete_job_handler(
    Extension(state): Extension<AxumAppState>,
    form: Result<Form<RequestParams>, FormRejection>,
) -> Result<StatusCode, BadRequest> {
    let Form(params) = form.map_err(|e| JobsError::invalid_argument(e.body_text()))?;
    let job_id = parse_job_id(&params)?;

    let jobs_database = state.jobs_database.clone();
    run_bounded(state.request_timeout, async move {
        jobs_database.mark_job_post_as_deleted(&job_id).await
    })
    .await?;

    Ok(StatusCode::OK)
}

fn parse_job(body: &str) -> Result<Job, JobsError> {
    from_json(body).map_err(|e| JobsError::invalid_argument(format!("Malformed job post: {}", e)))
}

/// The non-empty `jobId` parameter
pub fn parse_job_id(params: &RequestParams) -> Result<String, JobsError> {
    let job_id = params.get_string(JOB_ID_PARAM, "");
    if job_id.is_empty() {
        return Err(JobsError::invalid_argument("Job Id should be a non-empty string"));
    }
    Ok(job_id)
}

/// Listing parameters. Limits fall back to their defaults when unparseable;
/// an unknown region, sort field or order is rejected.
pub fn parse_job_query(params: &RequestParams) -> Result<JobQuery, JobsError> {
    let region = params
        .get_string(REGION_PARAM, SingaporeRegion::Entire.as_str())
        .parse::<SingaporeRegion>()
        .map_err(JobsError::InvalidArgument)?;
    let sort_by = params
        .get_string(SORT_BY_PARAM, "SALARY")
        .parse::<Filter>()
        .map_err(JobsError::InvalidArgument)?;
    let order = params
        .get_string(ORDER_PARAM, "ASCENDING")
        .parse::<Order>()
        .map_err(JobsError::InvalidArgument)?;

    Ok(JobQuery::new(
        params.get_int(MIN_LIMIT_PARAM, JobQuery::DEFAULT_MIN_LIMIT),
        params.get_int(MAX_LIMIT_PARAM, JobQuery::DEFAULT_MAX_LIMIT),
        sort_by,
        order,
        region,
    ))
}
