use serde::{Deserialize, Serialize};

/// Applicant record in the `Applicants` collection.
///
/// Holds the ids of the job posts the applicant marked as interesting, in
/// the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub applicant_id: String,
    #[serde(default)]
    pub interested_jobs: Vec<String>,
}

impl Applicant {
    pub fn new(applicant_id: impl Into<String>) -> Self {
        Self {
            applicant_id: applicant_id.into(),
            interested_jobs: Vec::new(),
        }
    }

    /// Add a job, keeping the list free of duplicates. Returns whether it changed.
    pub fn add_interested_job(&mut self, job_id: &str) -> bool {
        if self.is_interested_in(job_id) {
            return false;
        }
        self.interested_jobs.push(job_id.to_string());
        true
    }

    /// Remove a job. Returns whether it was present.
    pub fn remove_interested_job(&mut self, job_id: &str) -> bool {
        let before = self.interested_jobs.len();
        self.interested_jobs.retain(|id| id != job_id);
        self.interested_jobs.len() != before
    }

    pub fn is_interested_in(&self, job_id: &str) -> bool {
        self.interested_jobs.iter().any(|id| id == job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_twice_keeps_one_entry() {
        let mut applicant = Applicant::new("a1");

        assert!(applicant.add_interested_job("j1"));
        assert!(!applicant.add_interested_job("j1"));
        assert_eq!(applicant.interested_jobs, vec!["j1"]);
    }

    #[test]
    fn removing_unknown_job_is_a_no_op() {
        let mut applicant = Applicant::new("a1");
        applicant.add_interested_job("j1");

        assert!(!applicant.remove_interested_job("j2"));
        assert!(applicant.remove_interested_job("j1"));
        assert!(applicant.interested_jobs.is_empty());
    }
}
