use crate::core::{OptimizerError, Result, RunConfiguration, RunResult, RunState, Snapshot, StopReason};
use crate::optimization::callback::CancellationToken;
use crate::optimization::problem::near_minima;
use crate::optimization::solvers::{Objective, Swarm, SwarmObserver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Drives a swarm for a fixed number of iterations.
///
/// The optimizer owns the swarm, the objective and the random source for the
/// whole run. Each [`Optimizer::step`] updates personal and global bests,
/// moves every particle, then produces a [`Snapshot`].
pub struct Optimizer<O, R = StdRng> {
    config: RunConfiguration,
    objective: O,
    rng: R,
    swarm: Swarm,
    state: RunState,
    cancellation: CancellationToken,
    last_snapshot: Option<Snapshot>,
}

impl<O: Objective> Optimizer<O, StdRng> {
    /// Validate the configuration and scatter the initial swarm.
    ///
    /// Seeds from `rng_seed` when present, otherwise from OS entropy.
    pub fn new(config: RunConfiguration, objective: O) -> Result<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, objective, rng)
    }
}

impl<O: Objective, R: Rng> Optimizer<O, R> {
    /// Like [`Optimizer::new`] but draws from the given random source,
    /// ignoring `rng_seed`.
    pub fn with_rng(config: RunConfiguration, objective: O, mut rng: R) -> Result<Self> {
        let swarm = Swarm::initialize(&config, &mut rng)?;

        info!(
            particles = config.particle_count,
            iterations = config.max_iterations,
            xmin = config.xmin,
            xmax = config.xmax,
            w = config.inertia,
            c1 = config.cognitive,
            c2 = config.social,
            vmax = swarm.vmax(),
            "swarm initialized"
        );

        Ok(Self {
            config,
            objective,
            rng,
            swarm,
            state: RunState::Running { iteration: 0 },
            cancellation: CancellationToken::new(),
            last_snapshot: None,
        })
    }

    /// Share an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn vmax(&self) -> f64 {
        self.swarm.vmax()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Request the run to stop before its next iteration
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Number of iterations completed so far
    pub fn iterations_completed(&self) -> usize {
        self.last_snapshot
            .as_ref()
            .map_or(0, |snapshot| snapshot.iteration + 1)
    }

    /// Run a single iteration.
    ///
    /// A computation error ends the run: the state moves to `Completed` and
    /// later calls fail with [`OptimizerError::InvalidState`].
    pub fn step(&mut self) -> Result<Snapshot> {
        let iteration = match self.state {
            RunState::Running { iteration } => iteration,
            state => return Err(OptimizerError::InvalidState(state)),
        };

        let global_best_fitness = match self.advance(iteration) {
            Ok(fitness) => fitness,
            Err(e) => {
                warn!(iteration, error = %e, "swarm update failed, run aborted");
                self.state = RunState::Completed;
                return Err(e);
            }
        };

        let positions = self.swarm.positions();
        let snapshot = Snapshot {
            iteration,
            near_minima_count: near_minima(&positions, self.config.near_minima_offset),
            positions,
            global_best_position: self.swarm.global_best_position(),
            global_best_fitness,
        };

        debug!(
            iteration,
            global_best = snapshot.global_best_position,
            fitness = snapshot.global_best_fitness,
            near_minima = snapshot.near_minima_count,
            "iteration complete"
        );

        self.state = if iteration + 1 >= self.config.max_iterations {
            RunState::Completed
        } else {
            RunState::Running {
                iteration: iteration + 1,
            }
        };
        self.last_snapshot = Some(snapshot.clone());

        Ok(snapshot)
    }

    // Bests must be settled for every particle before any particle moves
    fn advance(&mut self, iteration: usize) -> Result<f64> {
        let fitness = self.swarm.update_bests(&self.objective, iteration)?;
        self.swarm.update_motion(&mut self.rng, iteration)?;
        Ok(fitness)
    }

    /// Step until the iteration budget is spent, the run is cancelled, or the
    /// observer asks to stop. Every snapshot goes to `observer`, followed by a
    /// final `on_complete` carrying the last snapshot.
    pub fn run(&mut self, observer: &mut dyn SwarmObserver) -> Result<RunResult> {
        if self.state == RunState::Completed {
            return Err(OptimizerError::InvalidState(self.state));
        }

        let stop_reason = loop {
            if self.cancellation.is_cancelled() {
                info!(iteration = self.iterations_completed(), "swarm run cancelled");
                break StopReason::Cancelled;
            }

            let snapshot = self.step()?;
            observer.on_snapshot(&snapshot)?;

            if self.state == RunState::Completed {
                break StopReason::MaxIterations;
            }
            if observer.should_stop() {
                info!(iteration = snapshot.iteration, "swarm run stopped by observer");
                break StopReason::StoppedByObserver;
            }
        };

        let result = RunResult {
            iterations: self.iterations_completed(),
            stop_reason,
            final_snapshot: self.last_snapshot.clone(),
        };

        if let Some(snapshot) = &result.final_snapshot {
            info!(
                iterations = result.iterations,
                global_best = snapshot.global_best_position,
                fitness = snapshot.global_best_fitness,
                near_minima = snapshot.near_minima_count,
                "swarm run complete"
            );
        }

        observer.on_complete(&result)?;
        Ok(result)
    }
}
