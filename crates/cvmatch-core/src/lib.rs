//! cvmatch core library
//!
//! Domain models, error types, configuration, the analysis workflow controller
//! and the presentation state derived from it. The HTTP implementation of
//! [`AnalysisService`] lives in `cvmatch-api-client`.

pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod service;
pub mod view;
pub mod workflow;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigOverrides};
pub use error::{
    ErrorKind, LogLevel, Phase, ServiceError, UserFacing, ValidationError, WorkflowError,
};
pub use i18n::{Locale, Message};
pub use service::AnalysisService;
pub use view::{FitBand, ResultPanel, ResultView, SkillsView, View};
pub use workflow::{Failure, WorkflowController, WorkflowSettings, WorkflowState};
