use serde::{Deserialize, Serialize};

use super::job::Job;

/// Closed range of listing positions shown on a page.
///
/// Bounds are stored ordered, whichever order they were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub minimum: u64,
    pub maximum: u64,
}

impl PageRange {
    pub fn between(a: u64, b: u64) -> Self {
        Self {
            minimum: a.min(b),
            maximum: a.max(b),
        }
    }
}

/// Result envelope of a listing query.
///
/// `range` is `between(1, total_count)`; it does not describe real pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub job_list: Vec<Job>,
    pub total_count: u64,
    pub range: PageRange,
}

impl JobPage {
    pub fn new(job_list: Vec<Job>, total_count: u64, range: PageRange) -> Self {
        Self {
            job_list,
            total_count,
            range,
        }
    }

    /// Page holding every matched job
    pub fn from_jobs(job_list: Vec<Job>) -> Self {
        let total_count = job_list.len() as u64;
        Self::new(job_list, total_count, PageRange::between(1, total_count))
    }
}
