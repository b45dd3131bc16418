use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::ConnectError;

/// How long the client waits for the service by default.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Pause between two connection attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Call `attempt` until it succeeds or `timeout` has elapsed.
///
/// `attempt` runs at least once, even for a zero timeout.  On expiry the error of the last attempt
/// is kept as the source of the returned [`ConnectError`].  A timeout too large to be represented
/// as a deadline never expires.
pub fn connect<T, E, F>(
    service: &'static str,
    timeout: Duration,
    retry: Duration,
    mut attempt: F,
) -> Result<T, ConnectError>
where
    F: FnMut() -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let deadline = Instant::now().checked_add(timeout);
    let mut tries = 0u32;

    loop {
        tries = tries.saturating_add(1);
        match attempt() {
            Ok(connection) => {
                info!(service, tries, "connected");
                return Ok(connection);
            }
            Err(e) => {
                let now = Instant::now();
                let remaining = match deadline {
                    Some(deadline) => deadline.saturating_duration_since(now),
                    None => Duration::MAX,
                };
                if remaining.is_zero() {
                    error!(service, tries, error = %e, "giving up on service");
                    return Err(ConnectError {
                        service,
                        timeout,
                        last: Some(Box::new(e)),
                    });
                }
                debug!(service, error = %e, "service not ready");
                thread::sleep(retry.min(remaining));
            }
        }
    }
}
