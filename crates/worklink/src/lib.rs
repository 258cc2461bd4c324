//! Worklink — placement workflow core for a worker/employer recruitment
//! platform.
//!
//! The crate models the job-application lifecycle (shortlist → contract
//! generation → contract dispatch → flight ticket) together with the per-user
//! wallet ledger and the append-only notification side channel. Persistence
//! and outbound delivery are trait boundaries so the services can run against
//! in-memory adapters in tests and demos.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
