/// ----- REQUEST QUEUE -----
/// FIFO of requests guarded by its own mutex and paired condition variable.
/// Used both for the scheduler's pending queue and for the floor
/// subsystem's inbound buffer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use shared_resources::request::Request;

use super::shutdown::Shutdown;
use super::wait_error::WaitError;

#[derive(Debug, Default)]
pub struct RequestQueue {
    requests: Mutex<VecDeque<Request>>,
    not_empty: Condvar,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_requests(requests: Vec<Request>) -> Self {
        RequestQueue {
            requests: Mutex::new(VecDeque::from(requests)),
            not_empty: Condvar::new(),
        }
    }

    /// Locks the live container. Waiters are not woken when the guard is
    /// dropped; call `notify_all` after pushing through it.
    pub fn lock(&self) -> MutexGuard<'_, VecDeque<Request>> {
        self.requests.lock()
    }

    pub fn notify_all(&self) {
        self.not_empty.notify_all();
    }

    pub fn push(&self, request: Request) {
        self.requests.lock().push_back(request);
        self.not_empty.notify_all();
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Request> {
        self.requests.lock().iter().cloned().collect()
    }

    /// Blocks until the queue holds at least one request and returns the
    /// guard with the lock still held, so the caller sees exactly what
    /// was there when the wait ended.
    pub fn wait_non_empty(
        &self,
        shutdown: &Shutdown,
        timeout: Option<Duration>,
    ) -> Result<MutexGuard<'_, VecDeque<Request>>, WaitError> {
        let mut requests = self.requests.lock();
        self.wait_while_empty(&mut requests, shutdown, timeout)?;
        Ok(requests)
    }

    /// Blocks until a request is available and removes it from the head.
    pub fn take(&self, shutdown: &Shutdown, timeout: Option<Duration>) -> Result<Request, WaitError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut requests = self.requests.lock();
        loop {
            if let Some(request) = requests.pop_front() {
                return Ok(request);
            }
            self.wait_once(&mut requests, shutdown, deadline)?;
        }
    }

    fn wait_while_empty(
        &self,
        requests: &mut MutexGuard<'_, VecDeque<Request>>,
        shutdown: &Shutdown,
        timeout: Option<Duration>,
    ) -> Result<(), WaitError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        while requests.is_empty() {
            self.wait_once(requests, shutdown, deadline)?;
        }
        Ok(())
    }

    // One bounded condvar wait. Spurious wakeups are fine, callers re-check.
    fn wait_once(
        &self,
        requests: &mut MutexGuard<'_, VecDeque<Request>>,
        shutdown: &Shutdown,
        deadline: Option<Instant>,
    ) -> Result<(), WaitError> {
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
        self.not_empty.wait_until(requests, wake_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use shared_resources::direction::ButtonDirection;

    use crate::utilities::shutdown;

    fn request(floor: u8) -> Request {
        Request::new(0, floor, ButtonDirection::Up, floor + 1)
    }

    #[test]
    fn push_keeps_order() {
        let queue = RequestQueue::new();
        for floor in 0..5 {
            queue.push(request(floor));
        }
        let floors: Vec<u8> = queue.snapshot().iter().map(|r| r.floor()).collect();
        assert_eq!(floors, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn take_times_out_on_empty_queue() {
        let (_trigger, shutdown) = shutdown::channel(Duration::from_millis(5));
        let queue = RequestQueue::new();
        let result = queue.take(&shutdown, Some(Duration::from_millis(30)));
        assert_eq!(result, Err(WaitError::TimedOut));
    }

    #[test]
    fn take_is_cancelled_by_shutdown() {
        let (trigger, shutdown) = shutdown::channel(Duration::from_millis(5));
        let queue = Arc::new(RequestQueue::new());
        let handle = {
            let queue = queue.clone();
            thread::spawn(move || queue.take(&shutdown, None))
        };
        thread::sleep(Duration::from_millis(20));
        trigger.trigger();
        assert_eq!(handle.join().unwrap(), Err(WaitError::Cancelled));
    }

    #[test]
    fn take_wakes_on_push() {
        let (_trigger, shutdown) = shutdown::channel(Duration::from_secs(10));
        let queue = Arc::new(RequestQueue::new());
        let handle = {
            let queue = queue.clone();
            thread::spawn(move || queue.take(&shutdown, Some(Duration::from_secs(5))))
        };
        thread::sleep(Duration::from_millis(20));
        queue.push(request(3));
        assert_eq!(handle.join().unwrap(), Ok(request(3)));
        assert!(queue.is_empty());
    }

    #[test]
    fn wait_non_empty_returns_locked_contents() {
        let (_trigger, shutdown) = shutdown::channel(Duration::from_millis(5));
        let queue = RequestQueue::from_requests(vec![request(1), request(2)]);
        let guard = queue.wait_non_empty(&shutdown, None).unwrap();
        assert_eq!(guard.len(), 2);
    }

    #[test]
    fn wait_prefers_contents_over_shutdown() {
        let (trigger, shutdown) = shutdown::channel(Duration::from_millis(5));
        trigger.trigger();
        let queue = RequestQueue::from_requests(vec![request(1)]);
        assert_eq!(queue.take(&shutdown, None), Ok(request(1)));
        assert_eq!(queue.take(&shutdown, None), Err(WaitError::Cancelled));
    }
}
