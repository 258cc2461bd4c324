use super::domain::{ApplicationRecord, Contract, FlightTicket, SubmitApplication};
use crate::workflows::ids::{ApplicationId, ContractId, JobId};

/// Storage abstraction over the placement aggregate.
///
/// Implementations back two invariants that must hold under concurrent
/// callers, so both are expressed as single conditioned writes rather than
/// read-then-write sequences:
///
/// * `shortlist` must atomically reject the transition when a different
///   application for the same job already holds `SHORTLISTED`.
/// * All mutations return the post-write record so callers never re-read
///   stale state.
pub trait PlacementRepository: Send + Sync {
    fn insert_application(
        &self,
        id: ApplicationId,
        submission: SubmitApplication,
    ) -> Result<ApplicationRecord, RepositoryError>;

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;

    /// Mark `application_id` as the shortlisted candidate for `job_id`.
    ///
    /// Fails with [`RepositoryError::Conflict`] when another application for
    /// the job is already shortlisted; re-shortlisting the same application
    /// succeeds. The check and the status write happen under one lock or
    /// conditioned update.
    fn shortlist(
        &self,
        job_id: &JobId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, RepositoryError>;

    /// Advance the application to `CONTRACT_SENT` and record the public URL
    /// of the dispatched artifact.
    fn record_contract_sent(
        &self,
        id: &ApplicationId,
        contract_url: &str,
    ) -> Result<ApplicationRecord, RepositoryError>;

    fn insert_contract(&self, contract: Contract) -> Result<Contract, RepositoryError>;

    fn fetch_contract(&self, id: &ContractId) -> Result<Option<Contract>, RepositoryError>;

    fn insert_ticket(&self, ticket: FlightTicket) -> Result<FlightTicket, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists or conflicts with a concurrent write")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
