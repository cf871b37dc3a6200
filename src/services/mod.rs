//! Service layer: HTTP handlers
//!
//! Handlers are static methods on `XxxService` structs, registered in the
//! explicit route table in `main.rs`.

mod contact;
mod health;
mod projects;
mod visits;

pub use contact::ContactService;
pub use health::{AppStartTime, HealthService};
pub use projects::ProjectService;
pub use visits::{VisitPayload, VisitService};
