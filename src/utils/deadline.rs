use std::{future::Future, io, time::Duration};

use tokio::time::{error::Elapsed, timeout_at, Instant};

/// An absolute point in time shared by every step of one operation.
///
/// All waits go through [`Deadline::run`] so that time spent in earlier steps
/// shrinks the budget of later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Remaining budget, or a `TimedOut` error when nothing is left.
    pub fn budget(&self) -> io::Result<Duration> {
        match self.remaining() {
            d if d.is_zero() => Err(elapsed()),
            d => Ok(d),
        }
    }

    /// Drive `fut` until it completes or the deadline passes.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Elapsed> {
        timeout_at(self.0, fut).await
    }

    /// Like [`Deadline::run`] for I/O futures, folding expiry into `TimedOut`.
    pub async fn run_io<T, F>(&self, fut: F) -> io::Result<T>
    where
        F: Future<Output = io::Result<T>>,
    {
        self.budget()?;
        self.run(fut)
            .await
            .map_err(|_| elapsed())?
    }
}

fn elapsed() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "deadline elapsed")
}

impl From<Instant> for Deadline {
    fn from(instant: Instant) -> Self {
        Self(instant)
    }
}

impl From<std::time::Instant> for Deadline {
    fn from(instant: std::time::Instant) -> Self {
        Self(instant.into())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{sleep, Instant};

    use super::Deadline;

    #[tokio::test]
    async fn expired_deadline_has_no_budget() {
        let deadline = Deadline::at(Instant::now());
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
        assert_eq!(
            deadline.budget().unwrap_err().kind(),
            std::io::ErrorKind::TimedOut
        );
    }

    #[tokio::test]
    async fn run_io_stops_at_deadline() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let started = Instant::now();
        let result = deadline
            .run_io(async {
                sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
