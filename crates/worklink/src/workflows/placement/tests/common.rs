use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::ids::{ApplicationId, ContractId, JobId, UserId};
use crate::workflows::notify::{Notification, NotificationError, NotificationSink};
use crate::workflows::placement::contract::{
    ContractStore, DocumentRenderer, RenderError, StorageError,
};
use crate::workflows::placement::domain::{
    ApplicationRecord, ApplicationStatus, Contract, FlightTicket, JobSnapshot, PartySnapshot,
    SubmitApplication,
};
use crate::workflows::placement::email::{EmailError, EmailGateway, EmailMessage};
use crate::workflows::placement::repository::{PlacementRepository, RepositoryError};
use crate::workflows::placement::service::PlacementService;

pub(super) const BASE_URL: &str = "http://localhost:3000";

pub(super) fn employer() -> PartySnapshot {
    PartySnapshot {
        id: UserId("emp-1".to_string()),
        first_name: "Salim".to_string(),
        last_name: "Al Habsi".to_string(),
        email: "salim@worklink.test".to_string(),
    }
}

pub(super) fn employee() -> PartySnapshot {
    PartySnapshot {
        id: UserId("wrk-1".to_string()),
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
        email: "maria@worklink.test".to_string(),
    }
}

pub(super) fn job() -> JobSnapshot {
    JobSnapshot {
        id: JobId("job-1".to_string()),
        title: "Household Nurse".to_string(),
        salary: 450.0,
        salary_currency: "OMR".to_string(),
        duties: vec!["cooking_meals".to_string(), "child_care".to_string()],
        additional_duties: Some("Weekend errands".to_string()),
        employer: employer(),
    }
}

pub(super) fn submission() -> SubmitApplication {
    SubmitApplication {
        job: job(),
        employee: employee(),
    }
}

pub(super) fn second_employee() -> PartySnapshot {
    PartySnapshot {
        id: UserId("wrk-2".to_string()),
        first_name: "Rosa".to_string(),
        last_name: "Delgado".to_string(),
        email: "rosa@worklink.test".to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryPlacement {
    applications: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    contracts: Mutex<HashMap<ContractId, Contract>>,
    tickets: Mutex<Vec<FlightTicket>>,
}

impl MemoryPlacement {
    pub(super) fn tickets(&self) -> Vec<FlightTicket> {
        self.tickets.lock().expect("ticket mutex poisoned").clone()
    }

    pub(super) fn contract_count(&self) -> usize {
        self.contracts.lock().expect("contract mutex poisoned").len()
    }
}

impl PlacementRepository for MemoryPlacement {
    fn insert_application(
        &self,
        id: ApplicationId,
        submission: SubmitApplication,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        let record = ApplicationRecord {
            id: id.clone(),
            job: submission.job,
            employee: submission.employee,
            status: ApplicationStatus::Submitted,
            contract_url: None,
            applied_at: Utc::now(),
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn shortlist(
        &self,
        job_id: &JobId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let taken = guard.values().any(|record| {
            record.job.id == *job_id
                && record.status == ApplicationStatus::Shortlisted
                && record.id != *application_id
        });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        let record = guard
            .get_mut(application_id)
            .ok_or(RepositoryError::NotFound)?;
        record.status = ApplicationStatus::Shortlisted;
        Ok(record.clone())
    }

    fn record_contract_sent(
        &self,
        id: &ApplicationId,
        contract_url: &str,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.status = ApplicationStatus::ContractSent;
        record.contract_url = Some(contract_url.to_string());
        Ok(record.clone())
    }

    fn insert_contract(&self, contract: Contract) -> Result<Contract, RepositoryError> {
        let mut guard = self.contracts.lock().expect("contract mutex poisoned");
        if guard.contains_key(&contract.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(contract.id.clone(), contract.clone());
        Ok(contract)
    }

    fn fetch_contract(&self, id: &ContractId) -> Result<Option<Contract>, RepositoryError> {
        let guard = self.contracts.lock().expect("contract mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_ticket(&self, ticket: FlightTicket) -> Result<FlightTicket, RepositoryError> {
        let mut guard = self.tickets.lock().expect("ticket mutex poisoned");
        guard.push(ticket.clone());
        Ok(ticket)
    }
}

#[derive(Default)]
pub(super) struct MemorySink {
    notifications: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub(super) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationSink for MemorySink {
    fn push(&self, notification: Notification) -> Result<(), NotificationError> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingSink;

impl NotificationSink for FailingSink {
    fn push(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable("sink offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    artifacts: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub(super) fn paths(&self) -> Vec<String> {
        let guard = self.artifacts.lock().expect("artifact mutex poisoned");
        let mut paths: Vec<String> = guard.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub(super) fn artifact(&self, path: &str) -> Option<Vec<u8>> {
        let guard = self.artifacts.lock().expect("artifact mutex poisoned");
        guard.get(path).cloned()
    }
}

impl ContractStore for MemoryStore {
    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut guard = self.artifacts.lock().expect("artifact mutex poisoned");
        guard.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let guard = self.artifacts.lock().expect("artifact mutex poisoned");
        guard
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::Missing(path.to_string()))
    }
}

/// Renderer that passes the HTML through as the artifact bytes.
pub(super) struct EchoRenderer;

impl DocumentRenderer for EchoRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(html.as_bytes().to_vec())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    reject: Arc<Mutex<Option<String>>>,
}

impl RecordingMailer {
    pub(super) fn rejecting(recipient: &str) -> Self {
        let mailer = Self::default();
        *mailer.reject.lock().expect("mailer mutex poisoned") = Some(recipient.to_string());
        mailer
    }

    pub(super) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailGateway for RecordingMailer {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let reject = self.reject.lock().expect("mailer mutex poisoned").clone();
        if reject.as_deref() == Some(message.to.as_str()) {
            return Err(EmailError::Transport(format!(
                "mailbox {} rejected the message",
                message.to
            )));
        }
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(())
    }
}

pub(super) struct Harness {
    pub(super) service: Arc<PlacementService<MemoryPlacement, MemorySink>>,
    pub(super) repository: Arc<MemoryPlacement>,
    pub(super) sink: Arc<MemorySink>,
    pub(super) store: MemoryStore,
    pub(super) mailer: RecordingMailer,
}

pub(super) fn harness() -> Harness {
    harness_with_mailer(RecordingMailer::default())
}

pub(super) fn harness_with_mailer(mailer: RecordingMailer) -> Harness {
    let repository = Arc::new(MemoryPlacement::default());
    let sink = Arc::new(MemorySink::default());
    let store = MemoryStore::default();
    let service = Arc::new(PlacementService::new(
        repository.clone(),
        sink.clone(),
        Box::new(EchoRenderer),
        Box::new(store.clone()),
        Box::new(mailer.clone()),
        BASE_URL,
    ));
    Harness {
        service,
        repository,
        sink,
        store,
        mailer,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
