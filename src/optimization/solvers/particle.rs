use super::traits::Objective;
use crate::core::{RunConfiguration, clamp_to_bounds, ensure_finite, Result};
use rand::Rng;
use rand::distributions::Open01;
use serde::{Deserialize, Serialize};

/// A single candidate solution
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: f64,
    pub velocity: f64,
    /// Best position this particle has occupied, by objective value
    pub best_position: f64,
}

impl Particle {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self {
            position,
            velocity,
            best_position: position,
        }
    }
}

/// Particle Swarm Optimization over a single real dimension.
///
/// Only the global best *position* is stored; its fitness is re-derived from
/// the objective whenever it is compared.
#[derive(Clone, Debug)]
pub struct Swarm {
    particles: Vec<Particle>,
    global_best_position: f64,
    xmin: f64,
    xmax: f64,
    vmax: f64,
    inertia: f64,   // w - velocity inertia weight
    cognitive: f64, // c1 - personal best influence
    social: f64,    // c2 - global best influence
}

impl Swarm {
    /// Scatter particles uniformly over the search range.
    ///
    /// The initial global best is an independent uniform draw and need not
    /// coincide with any particle.
    pub fn initialize<R: Rng + ?Sized>(config: &RunConfiguration, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let vmax = config.vmax();

        let global_best_position = rng.gen_range(config.xmin..=config.xmax);
        let particles = (0..config.particle_count)
            .map(|_| {
                let position = rng.gen_range(config.xmin..=config.xmax);
                let velocity = rng.gen_range(-vmax..=vmax);
                Particle::new(position, velocity)
            })
            .collect();

        Ok(Self::assemble(config, particles, global_best_position))
    }

    /// Build a swarm from explicit particle states, clamped into range.
    pub fn from_particles(
        config: &RunConfiguration,
        particles: Vec<Particle>,
        global_best_position: f64,
    ) -> Result<Self> {
        config.validate()?;
        let vmax = config.vmax();
        let particles = particles
            .into_iter()
            .map(|p| Particle {
                position: clamp_to_bounds(p.position, config.xmin, config.xmax),
                velocity: clamp_to_bounds(p.velocity, -vmax, vmax),
                best_position: clamp_to_bounds(p.best_position, config.xmin, config.xmax),
            })
            .collect();
        let global_best_position = clamp_to_bounds(global_best_position, config.xmin, config.xmax);

        Ok(Self::assemble(config, particles, global_best_position))
    }

    fn assemble(config: &RunConfiguration, particles: Vec<Particle>, global_best_position: f64) -> Self {
        Self {
            particles,
            global_best_position,
            xmin: config.xmin,
            xmax: config.xmax,
            vmax: config.vmax(),
            inertia: config.inertia,
            cognitive: config.cognitive,
            social: config.social,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.particles.iter().map(|p| p.position).collect()
    }

    pub fn global_best_position(&self) -> f64 {
        self.global_best_position
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    /// Update personal bests, then the global best, from current positions.
    ///
    /// Personal bests move only on strict improvement. The global best takes
    /// the first (lowest index) minimum of the personal-best fitnesses when
    /// that minimum strictly beats the current global best. Returns the
    /// fitness of the resulting global best.
    pub fn update_bests<O: Objective + ?Sized>(&mut self, objective: &O, iteration: usize) -> Result<f64> {
        let mut best_fitness = Vec::with_capacity(self.particles.len());

        for particle in self.particles.iter_mut() {
            let fitness = ensure_finite(objective.evaluate(particle.position), iteration, "fitness")?;
            let personal =
                ensure_finite(objective.evaluate(particle.best_position), iteration, "personal best fitness")?;

            if fitness < personal {
                particle.best_position = particle.position;
                best_fitness.push(fitness);
            } else {
                best_fitness.push(personal);
            }
        }

        // Stable left-to-right scan, ties keep the lowest index
        let mut min_index = 0;
        for (i, &fitness) in best_fitness.iter().enumerate().skip(1) {
            if fitness < best_fitness[min_index] {
                min_index = i;
            }
        }

        let mut global_fitness = ensure_finite(
            objective.evaluate(self.global_best_position),
            iteration,
            "global best fitness",
        )?;
        if let Some(&candidate) = best_fitness.get(min_index) {
            if candidate < global_fitness {
                self.global_best_position = self.particles[min_index].best_position;
                global_fitness = candidate;
            }
        }

        Ok(global_fitness)
    }

    /// Move every particle toward its personal best and the global best.
    ///
    /// Draws exactly two uniform values in `(0, 1)` per particle. Velocity is
    /// clamped to `[-vmax, vmax]`, then position to `[xmin, xmax]`.
    pub fn update_motion<R: Rng + ?Sized>(&mut self, rng: &mut R, iteration: usize) -> Result<()> {
        let global_best = self.global_best_position;

        for particle in self.particles.iter_mut() {
            let r1: f64 = rng.sample(Open01);
            let r2: f64 = rng.sample(Open01);

            // PSO velocity update equation
            let velocity = self.inertia * particle.velocity
                + self.cognitive * r1 * (particle.best_position - particle.position)
                + self.social * r2 * (global_best - particle.position);
            let velocity = ensure_finite(velocity, iteration, "velocity")?;
            particle.velocity = clamp_to_bounds(velocity, -self.vmax, self.vmax);

            let position = ensure_finite(particle.position + particle.velocity, iteration, "position")?;
            particle.position = clamp_to_bounds(position, self.xmin, self.xmax);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::problem::CubicWell;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config() -> RunConfiguration {
        RunConfiguration::default().with_particles(4).with_iterations(10)
    }

    #[test]
    fn initialization_respects_bounds() {
        let config = RunConfiguration::default();
        let mut rng = StdRng::seed_from_u64(11);
        let swarm = Swarm::initialize(&config, &mut rng).unwrap();

        assert_eq!(swarm.len(), 100);
        assert!((0.0..=500.0).contains(&swarm.global_best_position()));
        for p in swarm.particles() {
            assert!((0.0..=500.0).contains(&p.position));
            assert!((-125.0..=125.0).contains(&p.velocity));
            assert_eq!(p.best_position, p.position);
        }
    }

    #[test]
    fn initialization_rejects_bad_config() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Swarm::initialize(&config().with_particles(0), &mut rng).is_err());
    }

    #[test]
    fn personal_best_moves_only_on_strict_improvement() {
        let particles = vec![
            Particle { position: 326.0, velocity: 0.0, best_position: 0.0 },
            Particle { position: 0.0, velocity: 0.0, best_position: 326.0 },
            Particle { position: 100.0, velocity: 0.0, best_position: 100.0 },
        ];
        let mut swarm = Swarm::from_particles(&config(), particles, 500.0).unwrap();
        swarm.update_bests(&CubicWell, 0).unwrap();

        let bests: Vec<f64> = swarm.particles().iter().map(|p| p.best_position).collect();
        assert_eq!(bests, vec![326.0, 326.0, 100.0]);
    }

    #[test]
    fn global_best_tie_goes_to_lowest_index() {
        // Constant objective except for two equally good points
        let objective = |x: f64| if x == 10.0 || x == 20.0 { 1.0 } else { 5.0 };
        let particles = vec![
            Particle::new(30.0, 0.0),
            Particle::new(20.0, 0.0),
            Particle::new(10.0, 0.0),
        ];
        let mut swarm = Swarm::from_particles(&config(), particles, 40.0).unwrap();
        let fitness = swarm.update_bests(&objective, 0).unwrap();

        assert_eq!(fitness, 1.0);
        assert_eq!(swarm.global_best_position(), 20.0);
    }

    #[test]
    fn global_best_is_kept_when_not_strictly_beaten() {
        let objective = |x: f64| (x - 250.0).abs();
        let particles = vec![Particle::new(240.0, 0.0), Particle::new(260.0, 0.0)];
        let mut swarm = Swarm::from_particles(&config(), particles, 245.0).unwrap();
        let fitness = swarm.update_bests(&objective, 0).unwrap();

        assert_eq!(swarm.global_best_position(), 245.0);
        assert_eq!(fitness, 5.0);
    }

    #[test]
    fn global_best_never_worse_than_any_personal_best() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut swarm = Swarm::initialize(&RunConfiguration::default(), &mut rng).unwrap();
        for iteration in 0..20 {
            let global = swarm.update_bests(&CubicWell, iteration).unwrap();
            for p in swarm.particles() {
                assert!(global <= CubicWell.evaluate(p.best_position));
            }
            swarm.update_motion(&mut rng, iteration).unwrap();
        }
    }

    #[test]
    fn motion_clamps_velocity_and_position() {
        let config = RunConfiguration::default().with_coefficients(1.0, 2.0, 2.0);
        let particles = vec![
            Particle { position: 0.0, velocity: 125.0, best_position: 500.0 },
            Particle { position: 500.0, velocity: -125.0, best_position: 0.0 },
            Particle { position: 490.0, velocity: 125.0, best_position: 490.0 },
        ];
        let mut swarm = Swarm::from_particles(&config, particles, 500.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        swarm.update_motion(&mut rng, 0).unwrap();

        for p in swarm.particles() {
            assert!(p.velocity.abs() <= 125.0);
            assert!((0.0..=500.0).contains(&p.position));
        }
        // Full-inertia particle at the upper edge sticks to the bound
        assert_eq!(swarm.particles()[2].position, 500.0);
    }

    #[test]
    fn zero_inertia_ignores_previous_velocity() {
        let particles = vec![Particle { position: 200.0, velocity: 125.0, best_position: 200.0 }];
        let mut swarm = Swarm::from_particles(&config(), particles, 200.0).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        swarm.update_motion(&mut rng, 0).unwrap();

        assert_eq!(swarm.particles()[0].velocity, 0.0);
        assert_eq!(swarm.particles()[0].position, 200.0);
    }

    #[test]
    fn non_finite_fitness_is_a_computation_error() {
        let objective = |x: f64| if x > 250.0 { f64::NAN } else { x };
        let particles = vec![Particle::new(100.0, 0.0), Particle::new(400.0, 0.0)];
        let mut swarm = Swarm::from_particles(&config(), particles, 0.0).unwrap();

        let err = swarm.update_bests(&objective, 7).unwrap_err();
        assert!(matches!(
            err,
            crate::OptimizerError::Computation { iteration: 7, .. }
        ));
    }
}
