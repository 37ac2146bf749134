use super::solvers::traits::SwarmObserver;
use crate::core::{Result, RunEvent, RunResult, Snapshot};
use crossbeam::channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Callback for tracking swarm progress
#[derive(Debug, Default)]
pub struct HistoryCallback {
    max_snapshots: Option<usize>,
    history: Vec<Snapshot>,
    completed: Option<RunResult>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the run once this many snapshots have been recorded
    pub fn with_limit(mut self, max_snapshots: usize) -> Self {
        self.max_snapshots = Some(max_snapshots);
        self
    }

    /// Get iteration history
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.history.last()
    }

    pub fn completed(&self) -> Option<&RunResult> {
        self.completed.as_ref()
    }
}

impl SwarmObserver for HistoryCallback {
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.history.push(snapshot.clone());
        Ok(())
    }

    fn on_complete(&mut self, result: &RunResult) -> Result<()> {
        if let (Some(first), Some(last)) = (self.history.first(), self.history.last()) {
            info!(
                iterations = result.iterations,
                stop_reason = ?result.stop_reason,
                initial_fitness = first.global_best_fitness,
                final_fitness = last.global_best_fitness,
                global_best = last.global_best_position,
                near_minima = last.near_minima_count,
                "swarm run summary"
            );
        }
        self.completed = Some(result.clone());
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.max_snapshots
            .is_some_and(|limit| self.history.len() >= limit)
    }
}

/// Forwards run events over a bounded channel without ever blocking the run.
///
/// Events that do not fit (full buffer or dropped receiver) are discarded and
/// counted.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: Sender<RunEvent>,
    dropped: usize,
}

impl ChannelObserver {
    pub fn new(sender: Sender<RunEvent>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Create an observer together with the receiving end of a channel
    /// holding up to `capacity` pending events.
    pub fn bounded(capacity: usize) -> (Self, Receiver<RunEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self::new(sender), receiver)
    }

    /// Number of events discarded so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn forward(&mut self, event: RunEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                warn!(dropped = self.dropped, "observer channel full, event dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                warn!(dropped = self.dropped, "observer channel disconnected, event dropped");
            }
        }
    }
}

impl SwarmObserver for ChannelObserver {
    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.forward(RunEvent::Snapshot(snapshot.clone()));
        Ok(())
    }

    fn on_complete(&mut self, result: &RunResult) -> Result<()> {
        self.forward(RunEvent::Completed(result.clone()));
        Ok(())
    }
}

/// Cooperative cancellation flag, checked by the optimizer between iterations
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StopReason;

    fn snapshot(iteration: usize) -> Snapshot {
        Snapshot {
            iteration,
            positions: vec![iteration as f64],
            global_best_position: 1.0,
            global_best_fitness: 2.0,
            near_minima_count: 0,
        }
    }

    #[test]
    fn history_records_in_order_and_honors_limit() {
        let mut callback = HistoryCallback::new().with_limit(2);
        callback.on_snapshot(&snapshot(0)).unwrap();
        assert!(!callback.should_stop());
        callback.on_snapshot(&snapshot(1)).unwrap();
        assert!(callback.should_stop());

        let iterations: Vec<usize> = callback.history().iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![0, 1]);
        assert_eq!(callback.last().map(|s| s.iteration), Some(1));
    }

    #[test]
    fn channel_observer_drops_instead_of_blocking() {
        let (mut observer, receiver) = ChannelObserver::bounded(1);
        observer.on_snapshot(&snapshot(0)).unwrap();
        observer.on_snapshot(&snapshot(1)).unwrap();
        assert_eq!(observer.dropped(), 1);

        match receiver.try_recv().unwrap() {
            RunEvent::Snapshot(s) => assert_eq!(s.iteration, 0),
            other => panic!("unexpected event: {:?}", other),
        }

        let result = RunResult {
            iterations: 1,
            stop_reason: StopReason::MaxIterations,
            final_snapshot: Some(snapshot(0)),
        };
        observer.on_complete(&result).unwrap();
        assert!(matches!(receiver.try_recv().unwrap(), RunEvent::Completed(_)));
    }

    #[test]
    fn channel_observer_survives_disconnected_receiver() {
        let (mut observer, receiver) = ChannelObserver::bounded(4);
        drop(receiver);
        assert!(observer.on_snapshot(&snapshot(0)).is_ok());
        assert_eq!(observer.dropped(), 1);
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
