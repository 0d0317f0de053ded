//! `ems-agent` — the entities of the dispatch simulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ambulance`] | `Ambulance`, `AmbulanceStatus`, `Leg`, `Arrival`          |
//! | [`emergency`] | `Emergency`, `EmergencyStatus`                            |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                            |
//!
//! Both entities model their lifecycle as a closed state machine: every
//! transition is a method that validates the current state and returns
//! [`AgentError::IllegalAmbulanceTransition`] /
//! [`AgentError::IllegalEmergencyTransition`] on an out-of-order call.
//! Callers never mutate status fields directly.

pub mod ambulance;
pub mod emergency;
pub mod error;


pub use ambulance::{Ambulance, AmbulanceStatus, Arrival, Leg};
pub use emergency::{Emergency, EmergencyStatus};
pub use error::{AgentError, AgentResult};
