//! Data models for the analysis workflow
//!
//! `submission` holds what the user provides, `analysis` holds what the remote
//! analysis service returns.

mod analysis;
mod submission;

pub use analysis::*;
pub use submission::*;
