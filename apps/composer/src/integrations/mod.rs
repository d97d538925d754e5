//! Integrations: PDF import through the parsing service and résumé analysis through the
//! analysis service. Neither owns state: import hands back a merged document for the
//! caller to commit, analysis returns the report untouched.

pub mod analysis;
pub mod handlers;
pub mod parser;

use thiserror::Error;

use crate::backend_client::ServiceError;

pub use analysis::{AnalysisReport, HttpResumeAnalyzer, ResumeAnalyzer};
pub use parser::{HttpResumeParser, ResumeParser};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("Only PDF files can be imported (got '{0}')")]
    NotPdf(String),

    #[error("PDF is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Please enter a job role")]
    BlankJobRole,

    #[error(transparent)]
    Service(#[from] ServiceError),
}
