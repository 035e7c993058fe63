/// ----- FLOOR MODULE -----
/// The floor side of the simulation. Button presses land in an inbound
/// buffer that the scheduler drains; completed requests and lamp updates
/// come back through the `Floor` trait.

use std::time::{Duration, Instant};

use log::info;
use parking_lot::Mutex;

use shared_resources::direction::ButtonDirection;
use shared_resources::request::Request;

use crate::utilities::request_queue::RequestQueue;
use crate::utilities::shutdown::Shutdown;
use crate::utilities::wait_error::WaitError;

/// What the scheduler needs from the floor subsystem.
pub trait Floor: Send + Sync {
    /// Newly created requests not yet picked up by the scheduler.
    fn requests(&self) -> &RequestQueue;

    /// A serviced request handed back for display.
    fn receive_request(&self, request: Request);

    fn set_lamp_status(&self, direction: ButtonDirection);
}

#[derive(Debug, Default)]
pub struct FloorSubsystem {
    requests: RequestQueue,
    served: Mutex<Vec<Request>>,
    lamp: Mutex<Option<ButtonDirection>>,
}

impl FloorSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A call button was pressed.
    pub fn submit(&self, request: Request) {
        info!("(FORWARD) Floor: new request {}", request);
        self.requests.push(request);
    }

    pub fn served_requests(&self) -> Vec<Request> {
        self.served.lock().clone()
    }

    pub fn lamp_status(&self) -> Option<ButtonDirection> {
        *self.lamp.lock()
    }

    /// Replays `requests`, submitting each one `time_ms` after the call.
    /// `requests` must be ordered by time.
    pub fn run(&self, requests: Vec<Request>, shutdown: &Shutdown) -> Result<(), WaitError> {
        let start = Instant::now();
        for request in requests {
            let due = start + Duration::from_millis(request.time_ms());
            let now = Instant::now();
            if due > now {
                shutdown.sleep(due - now)?;
            }
            self.submit(request);
        }
        info!("Floor: all requests submitted");
        Ok(())
    }
}

impl Floor for FloorSubsystem {
    fn requests(&self) -> &RequestQueue {
        &self.requests
    }

    fn receive_request(&self, request: Request) {
        info!("(BACK) Floor: request {} served", request);
        self.served.lock().push(request);
    }

    fn set_lamp_status(&self, direction: ButtonDirection) {
        info!("Floor: direction lamp set to {}", direction);
        *self.lamp.lock() = Some(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::shutdown;

    #[test]
    fn submit_appends_to_buffer() {
        let floor = FloorSubsystem::new();
        floor.submit(Request::new(0, 2, ButtonDirection::Up, 4));
        floor.submit(Request::new(0, 5, ButtonDirection::Down, 1));
        let floors: Vec<u8> = floor.requests().snapshot().iter().map(|r| r.floor()).collect();
        assert_eq!(floors, vec![2, 5]);
    }

    #[test]
    fn lamp_starts_off() {
        let floor = FloorSubsystem::new();
        assert_eq!(floor.lamp_status(), None);
        floor.set_lamp_status(ButtonDirection::Down);
        assert_eq!(floor.lamp_status(), Some(ButtonDirection::Down));
    }

    #[test]
    fn run_replays_in_order() {
        let (_trigger, shutdown) = shutdown::channel(Duration::from_millis(5));
        let floor = FloorSubsystem::new();
        let requests = vec![
            Request::new(0, 1, ButtonDirection::Up, 3),
            Request::new(10, 4, ButtonDirection::Down, 0),
            Request::new(20, 2, ButtonDirection::Up, 5),
        ];
        floor.run(requests.clone(), &shutdown).unwrap();
        assert_eq!(floor.requests().snapshot(), requests);
    }

    #[test]
    fn run_stops_on_shutdown() {
        let (trigger, shutdown) = shutdown::channel(Duration::from_millis(5));
        trigger.trigger();
        let floor = FloorSubsystem::new();
        let requests = vec![Request::new(60_000, 1, ButtonDirection::Up, 3)];
        assert_eq!(floor.run(requests, &shutdown), Err(WaitError::Cancelled));
        assert!(floor.requests().is_empty());
    }
}
