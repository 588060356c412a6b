pub mod auditor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod loader;
pub mod report;
pub mod reporter;
pub mod snapshot;
pub mod util;

pub use auditor::Auditor;
pub use catalog::Catalog;
pub use config::Config;
pub use error::{AnalysisError, FetchError};
pub use llm::{Analyst, ChatBackend, LLMClient};
pub use loader::PageLoader;
pub use report::{Finding, Report, Scale, Tier};
pub use reporter::Reporter;
pub use snapshot::PageSnapshot;

pub type Result<T> = anyhow::Result<T>;
