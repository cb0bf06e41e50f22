//! Scripted attempt outcomes that also record when each attempt started.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::time::{Duration, Instant};
use tonic::Status;

/// Each call to [`Script::next`] pops the next outcome. Running past the end
/// of the script is a test bug and panics.
pub struct Script<T> {
    outcomes: Mutex<VecDeque<Result<T, Status>>>,
    started: Mutex<Vec<Instant>>,
}

impl<T> Script<T> {
    pub fn new(outcomes: impl IntoIterator<Item = Result<T, Status>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            started: Mutex::new(Vec::new()),
        }
    }

    /// `failures` copies of `status` (built fresh each time), then `success`.
    pub fn failing_then(failures: usize, status: impl Fn() -> Status, success: T) -> Self {
        Self::new(
            (0..failures)
                .map(|_| Err(status()))
                .chain(std::iter::once(Ok(success))),
        )
    }

    pub fn next(&self) -> Result<T, Status> {
        self.started.lock().unwrap().push(Instant::now());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted: unexpected extra attempt")
    }

    pub async fn attempt(&self) -> Result<T, Status> {
        self.next()
    }

    pub fn calls(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    /// Pauses observed between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        let started = self.started.lock().unwrap();
        started.windows(2).map(|w| w[1] - w[0]).collect()
    }
}
