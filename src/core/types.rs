use super::constraints;
use super::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ===== RUN CONFIGURATION =====

/// Immutable parameters of a single swarm run.
///
/// Missing fields in a JSON document fall back to [`RunConfiguration::default`],
/// which reproduces the classic demonstration run: 100 particles for 500 iterations over
/// `[0, 500]` with `w = 0`, `c1 = c2 = 2` and `k = 0.5`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfiguration {
    pub particle_count: usize,
    pub max_iterations: usize,
    pub xmin: f64,
    pub xmax: f64,
    /// Inertia weight `w`. Defaults to 0, the value the demonstration run executes
    /// with, even though common guidance suggests a value near 1. With `w = 0`
    /// a particle's previous velocity contributes nothing to its next one.
    #[serde(rename = "w")]
    pub inertia: f64,
    /// Cognitive coefficient `c1` (pull toward the personal best)
    #[serde(rename = "c1")]
    pub cognitive: f64,
    /// Social coefficient `c2` (pull toward the global best)
    #[serde(rename = "c2")]
    pub social: f64,
    /// Clamp factor `k` in `(0, 1]`, `vmax = k * (xmax - xmin) / 2`
    #[serde(rename = "k")]
    pub clamp_factor: f64,
    pub rng_seed: Option<u64>,
    /// Window around the known objective zero counted in each snapshot
    pub near_minima_offset: f64,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            particle_count: 100,
            max_iterations: 500,
            xmin: 0.0,
            xmax: 500.0,
            inertia: 0.0,
            cognitive: 2.0,
            social: 2.0,
            clamp_factor: 0.5,
            rng_seed: None,
            near_minima_offset: 25.0,
        }
    }
}

impl RunConfiguration {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_particles(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_bounds(mut self, xmin: f64, xmax: f64) -> Self {
        self.xmin = xmin;
        self.xmax = xmax;
        self
    }

    /// Configure PSO coefficients (defaults: w=0, c1=2, c2=2)
    pub fn with_coefficients(mut self, inertia: f64, cognitive: f64, social: f64) -> Self {
        self.inertia = inertia;
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    pub fn with_clamp_factor(mut self, k: f64) -> Self {
        self.clamp_factor = k;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_near_minima_offset(mut self, offset: f64) -> Self {
        self.near_minima_offset = offset;
        self
    }

    /// Maximum velocity magnitude derived from the bounds and clamp factor
    pub fn vmax(&self) -> f64 {
        self.clamp_factor * (self.xmax - self.xmin) / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        constraints::validate_configuration(self)
    }
}

// ===== RUN OUTPUT =====

/// State of the swarm after one completed iteration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Zero-based index of the iteration that produced this snapshot
    pub iteration: usize,
    pub positions: Vec<f64>,
    pub global_best_position: f64,
    pub global_best_fitness: f64,
    pub near_minima_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    MaxIterations,
    Cancelled,
    StoppedByObserver,
}

/// Outcome of [`crate::Optimizer::run`], also delivered as the `Completed` event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub iterations: usize,
    pub stop_reason: StopReason,
    /// `None` only when the run stopped before its first iteration
    pub final_snapshot: Option<Snapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    Snapshot(Snapshot),
    Completed(RunResult),
}

/// Lifecycle of an [`crate::Optimizer`]. There is no uninitialized state:
/// a configuration error means no optimizer is constructed at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running { iteration: usize },
    Completed,
}
