//! Fixed-interval polling with a deadline, for long-running remote jobs.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Tunable parameters for job polling.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between status checks.
    pub interval: Duration,
    /// Give up once this much time has passed since the first check.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            timeout: Duration::from_secs(180),
        }
    }
}

/// Outcome of a single status check.
#[derive(Debug, PartialEq, Eq)]
pub enum PollStep<T> {
    Done(T),
    Pending,
}

/// Why polling stopped without a result.
#[derive(Debug, PartialEq, Eq)]
pub enum PollError<E> {
    /// The check itself failed.
    Check(E),
    /// The deadline passed; carries the number of checks made.
    TimedOut { attempts: u32 },
}

/// Call `check` until it returns [`PollStep::Done`], sleeping
/// `config.interval` between calls. The first check runs immediately.
pub async fn poll_until<T, E, F, Fut>(config: &PollConfig, mut check: F) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStep<T>, E>>,
{
    let deadline = Instant::now() + config.timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match check().await.map_err(PollError::Check)? {
            PollStep::Done(value) => return Ok(value),
            PollStep::Pending => {}
        }

        if Instant::now() + config.interval > deadline {
            return Err(PollError::TimedOut { attempts });
        }
        tokio::time::sleep(config.interval).await;
    }
}
