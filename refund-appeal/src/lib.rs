//! Refund appeal analysis: one PDF of evidence in, one validated appeal package out.
//!
//! The heavy lifting is done by a hosted model in a single request. This crate owns the
//! contract around that request: intake of the evidence, the fixed instructions, strict
//! validation of the JSON that comes back, and rendering of the result.
//!
//! ```no_run
//! use refund_appeal::{AnalysisClient, AuditReport, EvidenceDocument, render_report, verify};
//!
//! # async fn run() -> refund_appeal::Result<()> {
//! let client = AnalysisClient::from_env();
//! let document = EvidenceDocument::from_path("booking.pdf").await?;
//! let result = client.analyze(&document).await?;
//! let audit: AuditReport = verify(&result);
//! println!("{}", render_report(&result, &audit));
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod intake;
pub mod model;
pub mod prompt;
pub mod render;
pub mod response;

// Re-export commonly used types
pub use audit::{AuditReport, verify};
pub use backend::{CompletionBackend, OpenRouterBackend};
pub use client::AnalysisClient;
pub use config::AnalysisConfig;
pub use error::{AppealError, ConfigError, FormatError, Result, ValidationError};
pub use intake::{EncodedPayload, EvidenceDocument, PDF_MEDIA_TYPE, encode};
pub use model::{
    AnalysisResult, AppealPackage, Audit, Citation, Claim, ExecutionStep, MissingInformation,
    NormalizedFields,
};
pub use prompt::{ANALYSIS_INSTRUCTIONS, AnalysisRequest};
pub use render::render_report;
pub use response::parse_analysis;
