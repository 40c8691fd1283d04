//! Link supervision
//!
//! Keeps the panel's single connection alive: one connect attempt per
//! loop iteration while the link is down, a fixed backoff after each failure.

pub mod supervisor;

pub use supervisor::{LinkSupervisor, SupervisorOutcome};
