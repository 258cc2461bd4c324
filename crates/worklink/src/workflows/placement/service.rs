use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use super::contract::{
    artifact_path, public_url, render_contract_html, ContractStore, DocumentRenderer, RenderError,
    StorageError,
};
use super::domain::{
    ApplicationRecord, Contract, FlightTicket, FlightTicketRequest, SubmitApplication,
};
use super::email::{EmailError, EmailGateway, EmailMessage};
use super::repository::{PlacementRepository, RepositoryError};
use crate::workflows::ids::{ApplicationId, ContractId, JobId, TicketId};
use crate::workflows::notify::{Notification, NotificationKind, NotificationSink};

/// Service composing the placement repository, document pipeline, outbound
/// email, and the notification side channel.
///
/// Notification pushes are best-effort: they run after the primary write and
/// their failures are logged, never propagated, and never rolled back into
/// the primary state.
pub struct PlacementService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    renderer: Box<dyn DocumentRenderer>,
    store: Box<dyn ContractStore>,
    mailer: Box<dyn EmailGateway>,
    base_url: String,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CONTRACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TICKET_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_contract_id() -> ContractId {
    let id = CONTRACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContractId(format!("ct-{id:06}"))
}

fn next_ticket_id() -> TicketId {
    let id = TICKET_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TicketId(format!("tkt-{id:06}"))
}

/// Result of a successful dispatch: the issued contract and the advanced
/// application.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub contract: Contract,
    pub application: ApplicationRecord,
}

impl<R, N> PlacementService<R, N>
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifications: Arc<N>,
        renderer: Box<dyn DocumentRenderer>,
        store: Box<dyn ContractStore>,
        mailer: Box<dyn EmailGateway>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            notifications,
            renderer,
            store,
            mailer,
            base_url: base_url.into(),
        }
    }

    /// Record a worker's candidacy for a job.
    pub fn submit(
        &self,
        submission: SubmitApplication,
    ) -> Result<ApplicationRecord, PlacementError> {
        if submission.employee.email.trim().is_empty()
            || submission.job.employer.email.trim().is_empty()
        {
            return Err(PlacementError::Validation(
                "employee and employer email addresses are required".to_string(),
            ));
        }

        let record = self
            .repository
            .insert_application(next_application_id(), submission)?;
        Ok(record)
    }

    /// Mark exactly one application per job as the selected candidate.
    ///
    /// The at-most-one invariant is enforced by the repository inside a
    /// single conditioned write; a concurrent shortlist of a different
    /// application surfaces here as [`PlacementError::Conflict`].
    pub fn shortlist(
        &self,
        job_id: &JobId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, PlacementError> {
        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(PlacementError::NotFound("application"))?;
        if application.job.id != *job_id {
            return Err(PlacementError::Validation(
                "application does not belong to the given job".to_string(),
            ));
        }

        let updated = self.repository.shortlist(job_id, application_id)?;

        // Status change has committed; the notification is a side channel.
        let notification = Notification {
            user_id: updated.employee.id.clone(),
            kind: NotificationKind::Shortlisted,
            title: "Application Update".to_string(),
            message: format!(
                "You have been shortlisted for the position: {}",
                updated.job.title
            ),
            link: Some("/portals/worker/jobs".to_string()),
            metadata: None,
            created_at: Utc::now(),
        };
        if let Err(err) = self.notifications.push(notification) {
            warn!(application = %application_id.0, error = %err, "shortlist notification dropped");
        }

        Ok(updated)
    }

    /// Render the contract document for an application and persist it at its
    /// well-known path, returning the public URL.
    ///
    /// Regenerating overwrites the prior artifact at the same location.
    pub fn generate_contract(
        &self,
        application_id: &ApplicationId,
    ) -> Result<String, PlacementError> {
        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(PlacementError::NotFound("application"))?;

        let html = render_contract_html(&application);
        let document = self.renderer.render(&html)?;
        self.store.write(&artifact_path(application_id), &document)?;

        Ok(public_url(&self.base_url, application_id))
    }

    /// Email the previously generated contract to both parties, then advance
    /// the application to `CONTRACT_SENT` and issue the contract record.
    ///
    /// Dispatch never generates the document; a missing artifact is an error
    /// so the generate step stays an explicit precondition. If either send
    /// fails the status is left untouched (an already-delivered first email
    /// is not compensated).
    pub fn dispatch_contract(
        &self,
        application_id: &ApplicationId,
    ) -> Result<DispatchOutcome, PlacementError> {
        let application = self
            .repository
            .fetch_application(application_id)?
            .ok_or(PlacementError::NotFound("application"))?;

        let document = self.store.read(&artifact_path(application_id))?;

        let subject = format!("Contract for {}", application.job.title);
        let body = format!(
            "Dear {},\n\nPlease find attached the contract for the position {}.",
            application.employee.first_name, application.job.title
        );
        let attachment_name = format!("{}.pdf", application_id.0);

        for recipient in [
            application.job.employer.email.as_str(),
            application.employee.email.as_str(),
        ] {
            self.mailer.send(EmailMessage {
                to: recipient.to_string(),
                subject: subject.clone(),
                body: body.clone(),
                attachment_name: attachment_name.clone(),
                attachment: document.clone(),
            })?;
        }

        let url = public_url(&self.base_url, application_id);
        let updated = self.repository.record_contract_sent(application_id, &url)?;

        let contract_id = next_contract_id();
        let contract = Contract {
            contract_number: Contract::number_from_id(&contract_id),
            id: contract_id,
            employer_id: application.job.employer.id.clone(),
            employee_id: application.employee.id.clone(),
            application_id: application_id.clone(),
            created_at: Utc::now(),
        };
        let contract = self.repository.insert_contract(contract)?;

        Ok(DispatchOutcome {
            contract,
            application: updated,
        })
    }

    /// Attach travel-ticket metadata to a contract and notify the owning
    /// employer.
    pub fn record_flight_ticket(
        &self,
        request: FlightTicketRequest,
    ) -> Result<FlightTicket, PlacementError> {
        if request.contract_id.0.trim().is_empty() {
            return Err(PlacementError::Validation(
                "contract id is required".to_string(),
            ));
        }
        if request.file_url.trim().is_empty() {
            return Err(PlacementError::Validation(
                "file url is required".to_string(),
            ));
        }

        let contract = self
            .repository
            .fetch_contract(&request.contract_id)?
            .ok_or(PlacementError::NotFound("contract"))?;

        let ticket = FlightTicket {
            id: next_ticket_id(),
            contract_id: request.contract_id,
            file_url: request.file_url,
            airline: request.airline,
            flight_number: request.flight_number,
            departure_date: request.departure_date,
            arrival_date: request.arrival_date,
            price: request.price,
            created_at: Utc::now(),
        };
        let ticket = self.repository.insert_ticket(ticket)?;

        self.notify_employer_of_ticket(&contract, &ticket);

        Ok(ticket)
    }

    /// Resolve the contract's owning employer (contract → application → job
    /// → employer) and push the upload notification. Best-effort only.
    fn notify_employer_of_ticket(&self, contract: &Contract, ticket: &FlightTicket) {
        let application = match self.repository.fetch_application(&contract.application_id) {
            Ok(Some(application)) => application,
            Ok(None) => {
                warn!(contract = %contract.id.0, "ticket notification skipped: application missing");
                return;
            }
            Err(err) => {
                warn!(contract = %contract.id.0, error = %err, "ticket notification skipped");
                return;
            }
        };

        let notification = Notification {
            user_id: application.job.employer.id.clone(),
            kind: NotificationKind::FlightTicketUploaded,
            title: "Flight Ticket Uploaded".to_string(),
            message: format!(
                "A flight ticket has been uploaded for contract #{}",
                contract.contract_number
            ),
            link: Some(format!("/portals/employer/contracts/{}", contract.id.0)),
            metadata: Some(json!({
                "contractId": contract.id.0,
                "ticketId": ticket.id.0,
            })),
            created_at: Utc::now(),
        };
        if let Err(err) = self.notifications.push(notification) {
            warn!(contract = %contract.id.0, error = %err, "ticket notification dropped");
        }
    }
}

/// Error raised by the placement service. Each variant maps to a stable
/// wire code via [`PlacementError::code`].
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("a candidate has already been shortlisted for this job")]
    Conflict,
    #[error(transparent)]
    Dispatch(#[from] EmailError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("placement storage unavailable: {0}")]
    Unavailable(String),
}

impl PlacementError {
    pub fn code(&self) -> &'static str {
        match self {
            PlacementError::Validation(_) => "VALIDATION_ERROR",
            PlacementError::NotFound(_) => "NOT_FOUND",
            PlacementError::Conflict => "CONFLICT",
            PlacementError::Dispatch(_) => "DISPATCH_ERROR",
            PlacementError::Render(_) | PlacementError::Storage(_) => "IO_ERROR",
            PlacementError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl From<RepositoryError> for PlacementError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => PlacementError::Conflict,
            RepositoryError::NotFound => PlacementError::NotFound("record"),
            RepositoryError::Unavailable(reason) => PlacementError::Unavailable(reason),
        }
    }
}
