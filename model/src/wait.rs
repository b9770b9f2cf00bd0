/*!

Polling primitives used to block until the cluster reaches some state.

A wait repeatedly evaluates an async predicate on a fixed interval until it holds, until an
explicit failure predicate holds, or until the attempt budget runs out. Nothing is kept between
calls; every wait is an independent, strictly sequential loop whose only suspension point is the
sleep between attempts.

# Example

```
# use tnb_model::wait::wait_for;
# use std::time::Duration;
# async fn no_run() -> tnb_model::wait::Result<()> {
let mut checks = 0;
wait_for(
    || {
        checks += 1;
        let done = checks >= 3;
        async move { Ok::<_, std::io::Error>(done) }
    },
    5,
    Duration::from_millis(10),
    "Waiting for the third check",
)
.await
# }
```

!*/

use log::{debug, trace};
use snafu::{ensure, Snafu};
use std::future::Future;
use std::time::Duration;

/// The error type a predicate may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// The terminal, unsuccessful outcomes of a wait.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{}: condition was not met after {} attempts", description, attempts))]
    Timeout { description: String, attempts: u32 },

    #[snafu(display(
        "{}: failure condition was observed on attempt {}",
        description,
        attempts
    ))]
    Failure { description: String, attempts: u32 },

    #[snafu(display("{}: unable to evaluate condition: {}", description, source))]
    Probe {
        description: String,
        source: BoxError,
    },

    #[snafu(display("{}: the number of attempts must be greater than zero", description))]
    ZeroAttempts { description: String },
}

impl Error {
    /// `true` if the attempt budget was exhausted.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// `true` if a failure predicate was observed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Error::Failure { .. })
    }

    /// The description of the condition that was being waited for.
    pub fn description(&self) -> &str {
        match self {
            Error::Timeout { description, .. }
            | Error::Failure { description, .. }
            | Error::Probe { description, .. }
            | Error::ZeroAttempts { description } => description,
        }
    }
}

/// Describes a single wait: what is being waited for, how long to sleep between attempts and how
/// many attempts may be made. A `Waiter` is consumed by `until` or `until_either`.
#[derive(Debug, Clone)]
pub struct Waiter {
    description: String,
    interval: Duration,
    max_attempts: Option<u32>,
}

impl Waiter {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

    /// Creates a bounded `Waiter` using the default interval and attempt budget.
    pub fn new<S>(description: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            description: description.into(),
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Some(Self::DEFAULT_MAX_ATTEMPTS),
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Removes the attempt budget. An unbounded `until` only ends when the predicate holds or
    /// fails to evaluate.
    pub fn unbounded(mut self) -> Self {
        self.max_attempts = None;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluates `predicate` until it returns `true`. No sleep happens after a successful attempt
    /// or after the final failed attempt, so `n` failed attempts take `(n - 1) * interval`.
    pub async fn until<F, Fut, E>(self, mut predicate: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<bool, E>>,
        E: Into<BoxError>,
    {
        self.check_attempts()?;
        trace!("{}", self.description);
        let mut attempt = 0;
        loop {
            attempt += 1;
            if self.evaluate(predicate().await)? {
                debug!("{}: done after {} attempt(s)", self.description, attempt);
                return Ok(());
            }
            self.next_attempt(attempt).await?;
        }
    }

    /// Evaluates `success` and then `failure` once per cycle. The wait ends successfully as soon
    /// as `success` holds and fails immediately, without further retries, as soon as `failure`
    /// holds. Unless the `Waiter` is `unbounded` the attempt budget also applies.
    pub async fn until_either<S, SFut, F, FFut, E>(
        self,
        mut success: S,
        mut failure: F,
    ) -> Result<()>
    where
        S: FnMut() -> SFut,
        SFut: Future<Output = std::result::Result<bool, E>>,
        F: FnMut() -> FFut,
        FFut: Future<Output = std::result::Result<bool, E>>,
        E: Into<BoxError>,
    {
        self.check_attempts()?;
        trace!("{}", self.description);
        let mut attempt = 0;
        loop {
            attempt += 1;
            if self.evaluate(success().await)? {
                debug!("{}: done after {} attempt(s)", self.description, attempt);
                return Ok(());
            }
            if self.evaluate(failure().await)? {
                return FailureSnafu {
                    description: &self.description,
                    attempts: attempt,
                }
                .fail();
            }
            self.next_attempt(attempt).await?;
        }
    }

    fn check_attempts(&self) -> Result<()> {
        ensure!(
            self.max_attempts != Some(0),
            ZeroAttemptsSnafu {
                description: &self.description
            }
        );
        Ok(())
    }

    fn evaluate<E>(&self, outcome: std::result::Result<bool, E>) -> Result<bool>
    where
        E: Into<BoxError>,
    {
        outcome.map_err(|e| Error::Probe {
            description: self.description.clone(),
            source: e.into(),
        })
    }

    /// Logs the failed `attempt` and sleeps, or returns `Timeout` if it was the last one.
    async fn next_attempt(&self, attempt: u32) -> Result<()> {
        match self.max_attempts {
            Some(max) if attempt >= max => {
                debug!(
                    "{}: attempt {}/{} not satisfied, giving up",
                    self.description, attempt, max
                );
                return TimeoutSnafu {
                    description: &self.description,
                    attempts: attempt,
                }
                .fail();
            }
            Some(max) => debug!(
                "{}: attempt {}/{} not satisfied, retrying in {:?}",
                self.description, attempt, max, self.interval
            ),
            None => debug!(
                "{}: attempt {} not satisfied, retrying in {:?}",
                self.description, attempt, self.interval
            ),
        }
        tokio::time::sleep(self.interval).await;
        Ok(())
    }
}

/// Waits until `predicate` returns `true`, making at most `max_attempts` evaluations with
/// `interval` between them. Fails with `Timeout` when the attempts are exhausted and with `Probe`
/// as soon as the predicate itself returns an error.
pub async fn wait_for<F, Fut, E, S>(
    predicate: F,
    max_attempts: u32,
    interval: Duration,
    description: S,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<bool, E>>,
    E: Into<BoxError>,
    S: Into<String>,
{
    Waiter::new(description)
        .interval(interval)
        .max_attempts(max_attempts)
        .until(predicate)
        .await
}

/// Waits until `success` returns `true` or fails with `Failure` as soon as `failure` returns
/// `true`. There is no attempt budget; use a bounded [`Waiter`] when the observed system might
/// never reach either terminal state.
pub async fn wait_for_either<S, SFut, F, FFut, E, D>(
    success: S,
    failure: F,
    interval: Duration,
    description: D,
) -> Result<()>
where
    S: FnMut() -> SFut,
    SFut: Future<Output = std::result::Result<bool, E>>,
    F: FnMut() -> FFut,
    FFut: Future<Output = std::result::Result<bool, E>>,
    E: Into<BoxError>,
    D: Into<String>,
{
    Waiter::new(description)
        .interval(interval)
        .unbounded()
        .until_either(success, failure)
        .await
}
