pub mod applicant;
pub mod job;
pub mod job_page;
pub mod job_query;
pub mod location;

pub use applicant::Applicant;
pub use job::{
    Job, JobDuration, JobLocation, JobPayment, JobStatus, PaymentFrequency, SingaporeRegion,
};
pub use job_page::{JobPage, PageRange};
pub use job_query::{Filter, JobQuery, Order};
pub use location::Location;
