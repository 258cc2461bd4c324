use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::ids::{ApplicationId, ContractId, JobId, TicketId, UserId};

/// Minimal identity snapshot of one party to a placement (worker or
/// employer), denormalized onto the application so the workflow never has to
/// join back to an accounts store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl PartySnapshot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The advertised position an application targets, including the employment
/// terms that flow into the generated contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub title: String,
    pub salary: f64,
    pub salary_currency: String,
    /// Duty codes in `underscore_separated` form; rendered with spaces.
    pub duties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_duties: Option<String>,
    pub employer: PartySnapshot,
}

/// Lifecycle states of an application.
///
/// The platform advances these monotonically in practice, but ordering is not
/// enforced here: the only hard invariants are shortlist uniqueness per job
/// and the dispatcher's artifact-exists precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "APPLICATION_SUBMITTED")]
    Submitted,
    #[serde(rename = "SHORTLISTED")]
    Shortlisted,
    #[serde(rename = "CONTRACT_SENT")]
    ContractSent,
    #[serde(rename = "FLIGHT_TICKET_SENT")]
    FlightTicketSent,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "APPLICATION_SUBMITTED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::ContractSent => "CONTRACT_SENT",
            ApplicationStatus::FlightTicketSent => "FLIGHT_TICKET_SENT",
            ApplicationStatus::Completed => "COMPLETED",
        }
    }
}

/// Persisted record of a worker's candidacy for a job. Applications are never
/// hard-deleted; the status carries the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job: JobSnapshot,
    pub employee: PartySnapshot,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_url: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Intake payload for a new application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitApplication {
    pub job: JobSnapshot,
    pub employee: PartySnapshot,
}

/// Employment-terms artifact issued on successful dispatch. Created once,
/// read-mostly afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub contract_number: String,
    pub employer_id: UserId,
    pub employee_id: UserId,
    pub application_id: ApplicationId,
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// Human-facing contract number: the full id, upper-cased, so every
    /// contract renders a distinct number.
    pub fn number_from_id(id: &ContractId) -> String {
        id.0.to_uppercase()
    }
}

/// Travel-document metadata attached to a contract. A contract may hold any
/// number of tickets; no de-duplication is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightTicket {
    pub id: TicketId,
    pub contract_id: ContractId,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Upload payload for a flight ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightTicketRequest {
    pub contract_id: ContractId,
    pub file_url: String,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub departure_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub arrival_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price: Option<f64>,
}
