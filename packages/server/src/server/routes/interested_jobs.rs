//! The applicant's list of job posts they are interested in.

use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::StatusCode,
    response::Response,
};
use tracing::instrument;

use super::jobs::parse_job_id;
use super::response::{json_response, run_bounded, BadRequest};
use crate::common::RequestParams;
use crate::domains::jobs::JobsError;
use crate::server::app::AxumAppState;

pub const INTERESTED_PARAM: &str = "interested";

// TODO: resolve the applicant from the session once applicant log-in exists
pub const ANONYMOUS_APPLICANT_ID: &str = "anonymous";

/// POST /my-interested-list - form fields `jobId` and `interested`
///
/// `interested` is the applicant's current state for the job: `true` removes
/// the job from their list, `false` adds it.
#[instrument(skip_all)]
pub async fn update_interested_list_handler(
    Extension(state): Extension<AxumAppState>,
    form: Result<Form<RequestParams>, FormRejection>,
) -> Result<StatusCode, BadRequest> {
    let Form(params) = form.map_err(|e| JobsError::invalid_argument(e.body_text()))?;
    let job_id = parse_job_id(&params)?;
    let interested = parse_interested(&params)?;

    let jobs_database = state.jobs_database.clone();
    run_bounded(state.request_timeout, async move {
        jobs_database
            .update_interested_jobs_list(ANONYMOUS_APPLICANT_ID, &job_id, interested)
            .await
    })
    .await?;

    Ok(StatusCode::OK)
}

/// GET /my-interested-list - the applicant's interested posts, deleted ones left out
#[instrument(skip_all)]
pub async fn interested_jobs_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Response, BadRequest> {
    let jobs_database = state.jobs_database.clone();
    let page = run_bounded(state.request_timeout, async move {
        jobs_database
            .fetch_interested_job_page(ANONYMOUS_APPLICANT_ID)
            .await
    })
    .await?;

    json_response(&page)
}

/// The `interested` parameter: `true` or `false`, any letter case
pub fn parse_interested(params: &RequestParams) -> Result<bool, JobsError> {
    let raw = params.get_string(INTERESTED_PARAM, "");
    if raw.is_empty() {
        return Err(JobsError::invalid_argument(
            "interested should be a non-empty string",
        ));
    }

    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(JobsError::invalid_argument(format!(
            "interested should be true or false, got {}",
            raw
        )))
    }
}
