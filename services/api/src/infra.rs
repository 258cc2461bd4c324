use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;
use worklink::workflows::ids::{ApplicationId, ContractId, JobId, UserId};
use worklink::workflows::notify::{Notification, NotificationError, NotificationSink};
use worklink::workflows::placement::repository::RepositoryError as PlacementRepositoryError;
use worklink::workflows::placement::{
    ApplicationRecord, ApplicationStatus, Contract, ContractStore, DocumentRenderer, EmailError,
    EmailGateway, EmailMessage, FlightTicket, JobSnapshot, PartySnapshot, PlacementRepository,
    RenderError, StorageError, SubmitApplication,
};
use worklink::workflows::wallet::repository::RepositoryError as WalletRepositoryError;
use worklink::workflows::wallet::{Wallet, WalletRepository};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded placement store. The shortlist check-and-set runs under one
/// lock so the at-most-one invariant holds across concurrent requests.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPlacementRepository {
    applications: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
    contracts: Arc<Mutex<HashMap<ContractId, Contract>>>,
    tickets: Arc<Mutex<Vec<FlightTicket>>>,
}

impl PlacementRepository for InMemoryPlacementRepository {
    fn insert_application(
        &self,
        id: ApplicationId,
        submission: SubmitApplication,
    ) -> Result<ApplicationRecord, PlacementRepositoryError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        if guard.contains_key(&id) {
            return Err(PlacementRepositoryError::Conflict);
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
    ) -> Result<Option<ApplicationRecord>, PlacementRepositoryError> {
        let guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn shortlist(
        &self,
        job_id: &JobId,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, PlacementRepositoryError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        let taken = guard.values().any(|record| {
            record.job.id == *job_id
                && record.status == ApplicationStatus::Shortlisted
                && record.id != *application_id
        });
        if taken {
            return Err(PlacementRepositoryError::Conflict);
        }
        let record = guard
            .get_mut(application_id)
            .ok_or(PlacementRepositoryError::NotFound)?;
        record.status = ApplicationStatus::Shortlisted;
        Ok(record.clone())
    }

    fn record_contract_sent(
        &self,
        id: &ApplicationId,
        contract_url: &str,
    ) -> Result<ApplicationRecord, PlacementRepositoryError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        let record = guard
            .get_mut(id)
            .ok_or(PlacementRepositoryError::NotFound)?;
        record.status = ApplicationStatus::ContractSent;
        record.contract_url = Some(contract_url.to_string());
        Ok(record.clone())
    }

    fn insert_contract(&self, contract: Contract) -> Result<Contract, PlacementRepositoryError> {
        let mut guard = self.contracts.lock().expect("contract mutex poisoned");
        if guard.contains_key(&contract.id) {
            return Err(PlacementRepositoryError::Conflict);
        }
        guard.insert(contract.id.clone(), contract.clone());
        Ok(contract)
    }

    fn fetch_contract(
        &self,
        id: &ContractId,
    ) -> Result<Option<Contract>, PlacementRepositoryError> {
        let guard = self.contracts.lock().expect("contract mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_ticket(&self, ticket: FlightTicket) -> Result<FlightTicket, PlacementRepositoryError> {
        let mut guard = self.tickets.lock().expect("ticket mutex poisoned");
        guard.push(ticket.clone());
        Ok(ticket)
    }
}

/// Mutex-guarded wallet store; `swap_balance` is the conditioned write the
/// ledger retries on.
#[derive(Default, Clone)]
pub(crate) struct InMemoryWalletRepository {
    wallets: Arc<Mutex<HashMap<UserId, Wallet>>>,
}

impl WalletRepository for InMemoryWalletRepository {
    fn fetch(&self, user_id: &UserId) -> Result<Option<Wallet>, WalletRepositoryError> {
        let guard = self.wallets.lock().expect("wallet mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn insert(&self, wallet: Wallet) -> Result<Wallet, WalletRepositoryError> {
        let mut guard = self.wallets.lock().expect("wallet mutex poisoned");
        if guard.contains_key(&wallet.user_id) {
            return Err(WalletRepositoryError::Conflict);
        }
        guard.insert(wallet.user_id.clone(), wallet.clone());
        Ok(wallet)
    }

    fn swap_balance(
        &self,
        user_id: &UserId,
        expected: i64,
        new: i64,
    ) -> Result<Wallet, WalletRepositoryError> {
        let mut guard = self.wallets.lock().expect("wallet mutex poisoned");
        let wallet = guard
            .get_mut(user_id)
            .ok_or(WalletRepositoryError::NotFound)?;
        if wallet.balance != expected {
            return Err(WalletRepositoryError::Conflict);
        }
        wallet.balance = new;
        Ok(wallet.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn push(&self, notification: Notification) -> Result<(), NotificationError> {
        info!(
            user = %notification.user_id.0,
            kind = notification.kind.label(),
            "notification recorded"
        );
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Contract artifacts on the local filesystem, rooted at the configured
/// storage directory.
#[derive(Clone)]
pub(crate) struct FsContractStore {
    root: PathBuf,
}

impl FsContractStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContractStore for FsContractStore {
    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|err| StorageError::Io(err.to_string()))?;
        }
        fs::write(&full, bytes).map_err(|err| StorageError::Io(err.to_string()))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StorageError::Missing(path.to_string()),
            _ => StorageError::Io(err.to_string()),
        })
    }
}

/// Stand-in for the external HTML-to-PDF service: the HTML bytes are the
/// artifact.
pub(crate) struct HtmlDocumentRenderer;

impl DocumentRenderer for HtmlDocumentRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(html.as_bytes().to_vec())
    }
}

/// Stand-in for the outbound SMTP provider: dispatches are logged and
/// retained for inspection.
#[derive(Default, Clone)]
pub(crate) struct TracingEmailGateway {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl TracingEmailGateway {
    pub(crate) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailGateway for TracingEmailGateway {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(to = %message.to, subject = %message.subject, "contract email dispatched");
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(())
    }
}

/// Starter job and applicant so a fresh process has an application to
/// exercise; both `serve` and the demo submit this on startup.
pub(crate) fn seed_submission() -> SubmitApplication {
    SubmitApplication {
        job: JobSnapshot {
            id: JobId("job-demo-1".to_string()),
            title: "Household Nurse".to_string(),
            salary: 450.0,
            salary_currency: "OMR".to_string(),
            duties: vec!["cooking_meals".to_string(), "child_care".to_string()],
            additional_duties: Some("Weekend errands".to_string()),
            employer: PartySnapshot {
                id: UserId("emp-demo-1".to_string()),
                first_name: "Salim".to_string(),
                last_name: "Al Habsi".to_string(),
                email: "salim@example.com".to_string(),
            },
        },
        employee: PartySnapshot {
            id: UserId("wrk-demo-1".to_string()),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            email: "maria@example.com".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_submission_passes_intake_validation() {
        let submission = seed_submission();
        assert!(!submission.employee.email.trim().is_empty());
        assert!(!submission.job.employer.email.trim().is_empty());
    }

    #[test]
    fn fs_store_round_trips_and_flags_missing_artifacts() {
        let root = std::env::temp_dir().join(format!("worklink-store-{}", std::process::id()));
        let store = FsContractStore::new(&root);

        store
            .write("contracts/app-1.pdf", b"document")
            .expect("write succeeds");
        let bytes = store.read("contracts/app-1.pdf").expect("read succeeds");
        assert_eq!(bytes, b"document");

        match store.read("contracts/absent.pdf") {
            Err(StorageError::Missing(path)) => assert_eq!(path, "contracts/absent.pdf"),
            other => panic!("expected missing artifact, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&root);
    }
}
