use ems_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptError {
    #[error("optimizer configuration error: {0}")]
    Config(String),

    #[error("trial simulation failed: {0}")]
    Sim(#[from] SimError),
}

pub type OptResult<T> = Result<T, OptError>;
