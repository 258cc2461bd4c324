//! Job-application placement lifecycle: shortlist, contract generation,
//! contract dispatch, and flight-ticket recording.
//!
//! The pipeline is deliberately two-phase around the contract artifact:
//! generation writes the document to its well-known path and dispatch reads
//! it back before emailing both parties. The two operations have distinct
//! failure domains and are never merged.

pub mod contract;
pub mod domain;
pub mod email;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use contract::{ContractStore, DocumentRenderer, RenderError, StorageError};
pub use domain::{
    ApplicationRecord, ApplicationStatus, Contract, FlightTicket, FlightTicketRequest,
    JobSnapshot, PartySnapshot, SubmitApplication,
};
pub use email::{EmailError, EmailGateway, EmailMessage};
pub use repository::{PlacementRepository, RepositoryError};
pub use router::placement_router;
pub use service::{DispatchOutcome, PlacementError, PlacementService};
