pub mod client;
pub mod error;
pub mod types;

pub use client::CentersClient;
pub use error::ClientError;
pub use types::{CenterQuery, ProblemReport};
