use super::types::RunState;
use thiserror::Error;

/// Errors raised while configuring or driving a swarm run
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// Rejected before any particle is created
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A fitness, velocity or position came out NaN or infinite
    #[error("non-finite value at iteration {iteration}: {detail}")]
    Computation { iteration: usize, detail: String },

    #[error("cannot step optimizer in state {0:?}")]
    InvalidState(RunState),

    #[error("observer failed: {0}")]
    Observer(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
