//! Shared plumbing for the job handlers: bounded waits on database calls and
//! the mapping of failures to HTTP responses.

use std::future::Future;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{warn, Instrument};

use crate::common::to_json;
use crate::domains::jobs::JobsError;

/// Run a database call as its own task and wait at most `timeout` for it.
///
/// Giving up on the wait does not cancel the task; a write that was already
/// sent may still land after the handler has answered.
pub async fn run_bounded<T, F>(timeout: Duration, operation: F) -> Result<T, JobsError>
where
    F: Future<Output = Result<T, JobsError>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(operation.in_current_span());

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(JobsError::Internal(format!(
            "database task failed: {}",
            join_error
        ))),
        Err(_) => Err(JobsError::Timeout(timeout)),
    }
}

/// Any failed request. The client only ever sees 400 with an empty body.
#[derive(Debug)]
pub struct BadRequest(pub JobsError);

impl From<JobsError> for BadRequest {
    fn from(error: JobsError) -> Self {
        BadRequest(error)
    }
}

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        warn!(kind = self.0.kind(), error = %self.0, "request failed");
        StatusCode::BAD_REQUEST.into_response()
    }
}

/// 200 response carrying `value` as a JSON body
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> Result<Response, BadRequest> {
    let body = to_json(value).map_err(JobsError::from)?;
    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}
