//! Single-dimension particle swarm optimization.
//!
//! An [`Optimizer`] owns a [`Swarm`] searching an [`Objective`] for its
//! minimum, emitting a [`Snapshot`] to a [`SwarmObserver`] after every
//! iteration. Runs are reproducible when [`RunConfiguration::rng_seed`] is set.

mod core;
mod optimization;
mod optimizer;

pub use self::core::*;
pub use self::optimization::*;
pub use optimizer::Optimizer;
