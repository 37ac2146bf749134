pub mod constraints;
pub mod error;
pub mod types;

pub use constraints::{clamp_to_bounds, ensure_finite, validate_configuration};
pub use error::{OptimizerError, Result};
pub use types::*;
