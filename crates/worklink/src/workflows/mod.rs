//! Workflow modules for the recruitment platform.
//!
//! `placement` owns the application lifecycle from shortlist to flight
//! ticket; `wallet` owns the per-user balance ledger; `notify` is the shared
//! append-only notification side channel both write into.

pub mod ids;
pub mod notify;
pub mod placement;
pub mod wallet;
