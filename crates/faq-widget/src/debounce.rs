use tokio::time::{Duration, Instant};

/// A single pending value that becomes due after a quiet period.
///
/// Scheduling again replaces the pending value and pushes the deadline out, so at most
/// one evaluation is ever outstanding.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Returns true if an earlier pending value was replaced.
    pub fn schedule(&mut self, value: T) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            deadline: Instant::now() + self.quiet,
            value,
        });
        replaced
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.cancel()
        } else {
            None
        }
    }
}

/// Resolves at `deadline`, or never when there is nothing pending.
pub async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
