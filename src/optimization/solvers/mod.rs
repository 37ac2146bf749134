mod particle;
pub mod traits;

pub use particle::{Particle, Swarm};
pub use traits::{evaluate_lazy, Objective, SwarmObserver};
