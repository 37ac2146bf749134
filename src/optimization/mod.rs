pub mod callback;
pub mod problem;
pub mod solvers;

pub use callback::{CancellationToken, ChannelObserver, HistoryCallback};
pub use problem::{near_minima, CubicWell, KNOWN_ZERO};
pub use solvers::{evaluate_lazy, Objective, Particle, Swarm, SwarmObserver};
