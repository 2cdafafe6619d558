// Walk-in Interview - API Core
//
// Backend for the job-posting web application: HTTP handlers validate input,
// then persist and query job posts through a transactional document store.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
