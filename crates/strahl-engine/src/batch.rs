//! Tracking independent beams in parallel.
//!
//! [`track_batch`] shares one read-only [`CompiledLattice`] between scoped
//! worker threads. Each beam gets its own tracker and observer; workers
//! pull `(index, beam)` tasks from a channel and send results back on a
//! second channel. Results are returned in input order.

use crossbeam_channel::{bounded, unbounded};
use strahl_beam::Beam;
use strahl_compile::CompiledLattice;
use strahl_obs::Observer;
use tracing::debug;

use crate::config::TrackConfig;
use crate::tracker::{TrackError, TrackOutcome, Tracker};

/// Configuration of a batch tracking call.
#[derive(Clone, Debug, Default)]
pub struct BatchConfig {
    /// Configuration applied to every beam. A cancel token stops every
    /// beam still in flight.
    pub track: TrackConfig,
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 16]`).
    pub workers: Option<usize>,
}

impl BatchConfig {
    /// Resolve the worker count for `beams` beams.
    ///
    /// Never more workers than beams, never fewer than one.
    pub fn resolved_workers(&self, beams: usize) -> usize {
        let wanted = match self.workers {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        };
        wanted.min(beams.max(1))
    }
}

/// Track every beam through `lattice`, one observer per beam.
///
/// `make_observer` is called with the beam's index. The result for beam
/// `i` is at position `i`; a failing beam does not stop the others.
pub fn track_batch<O, F>(
    lattice: &CompiledLattice,
    beams: Vec<Beam>,
    config: &BatchConfig,
    make_observer: F,
) -> Vec<Result<TrackOutcome<O::Output>, TrackError>>
where
    O: Observer + Send,
    O::Output: Send,
    F: Fn(usize) -> O + Sync,
{
    let n = beams.len();
    if n == 0 {
        return Vec::new();
    }
    let workers = config.resolved_workers(n);
    debug!(beams = n, workers, "batch tracking");

    let (task_tx, task_rx) = bounded::<(usize, Beam)>(workers * 2);
    let (reply_tx, reply_rx) = unbounded();
    let make_observer = &make_observer;

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let reply_tx = reply_tx.clone();
            let track_config = config.track.clone();
            scope.spawn(move || {
                for (index, beam) in task_rx {
                    let observer = make_observer(index);
                    let result = Tracker::new(lattice, beam, observer, track_config.clone())
                        .and_then(Tracker::run);
                    if reply_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(reply_tx);
        for task in beams.into_iter().enumerate() {
            if task_tx.send(task).is_err() {
                break;
            }
        }
        drop(task_tx);
    });

    let mut slots: Vec<Option<Result<TrackOutcome<O::Output>, TrackError>>> =
        (0..n).map(|_| None).collect();
    for (index, result) in reply_rx.try_iter() {
        slots[index] = Some(result);
    }
    // Every task is answered: the scope re-raises any worker panic.
    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_bounded_by_beams() {
        let cfg = BatchConfig {
            workers: Some(8),
            ..BatchConfig::default()
        };
        assert_eq!(cfg.resolved_workers(3), 3);
        assert_eq!(cfg.resolved_workers(20), 8);
        assert_eq!(cfg.resolved_workers(0), 1);
    }

    #[test]
    fn zero_workers_clamps_to_one() {
        let cfg = BatchConfig {
            workers: Some(0),
            ..BatchConfig::default()
        };
        assert_eq!(cfg.resolved_workers(5), 1);
    }
}
