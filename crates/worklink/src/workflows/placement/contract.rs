//! Contract document building and artifact storage boundaries.
//!
//! Generation is idempotent by location: the artifact for an application is
//! always written to `contracts/{application_id}.pdf`, so regenerating
//! replaces the prior document without changing its URL.

use std::fmt::Write as _;

use super::domain::ApplicationRecord;
use crate::workflows::ids::ApplicationId;

/// Relative directory artifacts are stored under.
pub const CONTRACT_DIR: &str = "contracts";

/// Storage-relative path of the contract artifact for an application.
pub fn artifact_path(application_id: &ApplicationId) -> String {
    format!("{CONTRACT_DIR}/{}.pdf", application_id.0)
}

/// Publicly resolvable URL for the contract artifact.
pub fn public_url(base_url: &str, application_id: &ApplicationId) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        artifact_path(application_id)
    )
}

/// Duty codes are stored as `underscore_separated` tokens; contracts show
/// them with spaces.
fn duty_label(duty: &str) -> String {
    duty.replace('_', " ")
}

/// Build the HTML contract body from the application's denormalized job,
/// employer, and employee data.
pub fn render_contract_html(application: &ApplicationRecord) -> String {
    let job = &application.job;
    let mut duties = String::new();
    for duty in &job.duties {
        let _ = write!(duties, "<li>{}</li>", duty_label(duty));
    }
    if let Some(extra) = &job.additional_duties {
        let _ = write!(duties, "<li>{extra}</li>");
    }

    format!(
        "<html>\
         <head><style>body{{font-family:Arial,Helvetica,sans-serif;padding:20px;}}</style></head>\
         <body>\
         <h1>Employment Contract</h1>\
         <p><strong>Employer:</strong> {employer}</p>\
         <p><strong>Employee:</strong> {employee}</p>\
         <p><strong>Job Title:</strong> {title}</p>\
         <p><strong>Salary:</strong> {salary} {currency}</p>\
         <p><strong>Duties:</strong></p>\
         <ul>{duties}</ul>\
         </body>\
         </html>",
        employer = job.employer.full_name(),
        employee = application.employee.full_name(),
        title = job.title,
        salary = job.salary,
        currency = job.salary_currency,
    )
}

/// Boundary to the external HTML-to-document rendering service.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Boundary to artifact storage, addressed by storage-relative path.
pub trait ContractStore: Send + Sync {
    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("document rendering failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("artifact missing at {0}")]
    Missing(String),
    #[error("artifact storage io failure: {0}")]
    Io(String),
}
