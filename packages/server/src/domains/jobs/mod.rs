pub mod errors;
pub mod jobs_database;
pub mod models;

pub use errors::JobsError;
pub use jobs_database::{AddJobResult, JobsDatabase, PendingWrite};
pub use models::*;
