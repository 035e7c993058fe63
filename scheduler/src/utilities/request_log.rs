/// ----- REQUEST LOG -----
/// Append-only record of completed requests. Has its own lock so writes
/// to it never contend with the pending queue.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use shared_resources::request::Request;

use super::shutdown::Shutdown;
use super::wait_error::WaitError;

#[derive(Debug, Default)]
pub struct RequestLog {
    requests: Mutex<Vec<Request>>,
    appended: Condvar,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Vec<Request>> {
        self.requests.lock()
    }

    pub fn append(&self, request: Request) {
        self.requests.lock().push(request);
        self.appended.notify_all();
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Blocks until at least `count` requests have been recorded.
    pub fn wait_for_len(
        &self,
        count: usize,
        shutdown: &Shutdown,
        timeout: Option<Duration>,
    ) -> Result<(), WaitError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut requests = self.requests.lock();
        while requests.len() < count {
            if shutdown.is_triggered() {
                return Err(WaitError::Cancelled);
            }
            let mut wake_at = Instant::now() + shutdown.poll_interval();
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(WaitError::TimedOut);
                }
                wake_at = wake_at.min(deadline);
            }
            self.appended.wait_until(&mut requests, wake_at);
        }
        Ok(())
    }
}
