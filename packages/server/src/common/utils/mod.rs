pub mod json;
pub mod params;

pub use json::*;
pub use params::*;
