// HTTP routes
pub mod health;
pub mod interested_jobs;
pub mod jobs;
pub mod response;

pub use health::*;
pub use interested_jobs::*;
pub use jobs::*;
pub use response::*;
