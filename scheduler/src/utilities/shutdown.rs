/// ----- SHUTDOWN SIGNAL -----
/// Stop signal shared by every thread of the scheduler. Built on a
/// crossbeam channel that never carries a message: dropping the only
/// sender disconnects it, and every receiver observes that at once.

use std::time::Duration;

use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};

use super::wait_error::WaitError;

pub struct ShutdownTrigger {
    tx: Sender<()>,
}

impl ShutdownTrigger {
    pub fn trigger(self) {
        drop(self.tx);
    }
}

#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: Receiver<()>,
    poll_interval: Duration,
}

/// `poll_interval` bounds how long a condition-variable wait can go without
/// looking at the signal.
pub fn channel(poll_interval: Duration) -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = bounded(0);
    (ShutdownTrigger { tx: tx }, Shutdown { rx: rx, poll_interval: poll_interval })
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Simulated latency: pauses for the full `duration` unless shut down first.
    pub fn sleep(&self, duration: Duration) -> Result<(), WaitError> {
        select! {
            recv(self.rx) -> _ => Err(WaitError::Cancelled),
            default(duration) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn not_triggered_while_trigger_lives() {
        let (_trigger, shutdown) = channel(Duration::from_millis(5));
        assert!(!shutdown.is_triggered());
        assert_eq!(shutdown.sleep(Duration::from_millis(10)), Ok(()));
    }

    #[test]
    fn trigger_reaches_every_clone() {
        let (trigger, shutdown) = channel(Duration::from_millis(5));
        let other = shutdown.clone();
        trigger.trigger();
        assert!(shutdown.is_triggered());
        assert!(other.is_triggered());
    }

    #[test]
    fn sleep_is_cut_short_by_trigger() {
        let (trigger, shutdown) = channel(Duration::from_millis(5));
        let start = Instant::now();
        let handle = thread::spawn(move || shutdown.sleep(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        trigger.trigger();
        assert_eq!(handle.join().unwrap(), Err(WaitError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
