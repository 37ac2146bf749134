use crate::core::{Result, RunResult, Snapshot};

/// Scalar objective to be minimized.
///
/// Implementations must be pure: the same input always yields the same
/// output. Any `Fn(f64) -> f64` closure is an objective.
pub trait Objective {
    /// Evaluate the objective at a single position
    fn evaluate(&self, x: f64) -> f64;

    /// Evaluate a sequence of positions eagerly, preserving order
    fn evaluate_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

impl<F> Objective for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Evaluate a sequence of positions lazily, preserving order
pub fn evaluate_lazy<'a, O, I>(objective: &'a O, xs: I) -> impl Iterator<Item = f64> + 'a
where
    O: Objective + ?Sized,
    I: IntoIterator<Item = f64> + 'a,
{
    xs.into_iter().map(move |x| objective.evaluate(x))
}

/// Receives a snapshot after every completed iteration.
///
/// Observers run synchronously on the optimizer's thread, so they should hand
/// work off quickly (see [`crate::ChannelObserver`]).
pub trait SwarmObserver {
    /// Called once per completed iteration
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Called once when the run ends, carrying the last snapshot
    fn on_complete(&mut self, _result: &RunResult) -> Result<()> {
        Ok(())
    }

    /// Check if the run should stop early
    fn should_stop(&self) -> bool {
        false
    }
}

impl<F> SwarmObserver for F
where
    F: FnMut(&Snapshot),
{
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        self(snapshot);
        Ok(())
    }
}
