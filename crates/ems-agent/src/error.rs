use thiserror::Error;

use ems_core::{AmbulanceId, EmergencyId};

use crate::ambulance::AmbulanceStatus;
use crate::emergency::EmergencyStatus;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("ambulance {ambulance} cannot go {from:?} → {to:?}")]
    IllegalAmbulanceTransition {
        ambulance: AmbulanceId,
        from: AmbulanceStatus,
        to: AmbulanceStatus,
    },

    #[error("emergency {emergency} cannot go {from:?} → {to:?}")]
    IllegalEmergencyTransition {
        emergency: EmergencyId,
        from: EmergencyStatus,
        to: EmergencyStatus,
    },
}

pub type AgentResult<T> = Result<T, AgentError>;
