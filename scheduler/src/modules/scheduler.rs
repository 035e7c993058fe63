/// ----- SCHEDULER MODULE -----
/// Sits between the floor subsystem and the elevator subsystem. The control
/// loop moves new requests from the floor buffer into the pending queue,
/// where the elevator side picks them up; completed requests travel back
/// to the floor subsystem through `report_completion`.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, info};

use shared_resources::config::LatencyConfig;
use shared_resources::direction::ButtonDirection;
use shared_resources::request::Request;

use crate::modules::floor::Floor;
use crate::modules::state_machine::{SchedulerState, StateMachine};
use crate::utilities::request_log::RequestLog;
use crate::utilities::request_queue::RequestQueue;
use crate::utilities::scheduler_status::SchedulerStatus;
use crate::utilities::shutdown::Shutdown;
use crate::utilities::wait_error::WaitError;

pub struct Scheduler<F: Floor> {
    floor: Arc<F>,
    pending: RequestQueue,
    response_log: RequestLog,
    latency: LatencyConfig,
    shutdown: Shutdown,
    status_tx: Option<Sender<SchedulerStatus>>,
}

impl<F: Floor> Scheduler<F> {
    pub fn new(floor: Arc<F>, latency: LatencyConfig, shutdown: Shutdown) -> Self {
        Self::with_requests(floor, Vec::new(), latency, shutdown)
    }

    /// Starts with `requests` already pending.
    pub fn with_requests(
        floor: Arc<F>,
        requests: Vec<Request>,
        latency: LatencyConfig,
        shutdown: Shutdown,
    ) -> Self {
        Scheduler {
            floor: floor,
            pending: RequestQueue::from_requests(requests),
            response_log: RequestLog::new(),
            latency: latency,
            shutdown: shutdown,
            status_tx: None,
        }
    }

    /// Publish a `SchedulerStatus` after every state transition.
    pub fn with_status_channel(mut self, status_tx: Sender<SchedulerStatus>) -> Self {
        self.status_tx = Some(status_tx);
        self
    }

    /// Requests waiting for the elevator side. This is the live queue.
    pub fn pending_queue(&self) -> &RequestQueue {
        &self.pending
    }

    pub fn response_log(&self) -> &RequestLog {
        &self.response_log
    }

    /// Adds a request to the pending queue. Duplicates are accepted.
    pub fn enqueue(&self, request: Request) {
        info!("(FORWARD) Added elevator request {} to request queue", request);
        self.pending.push(request);
    }

    /// Blocks until a request is pending and hands it to the caller.
    /// Used by the elevator side.
    pub fn take_next(&self, timeout: Option<Duration>) -> Result<Request, WaitError> {
        self.pending.take(&self.shutdown, timeout)
    }

    /// Called by the elevator side once `request` has been serviced.
    ///
    /// Waits out the two simulated signal delays, forwards the request to
    /// the floor subsystem and drops it from the pending queue if it is
    /// still there. Only the shutdown signal can cut the delays short.
    pub fn report_completion(&self, request: Request) -> Result<(), WaitError> {
        self.shutdown.sleep(self.latency.transit)?;
        info!("(BACK) Scheduler: received {} back from elevator subsystem", request);
        self.shutdown.sleep(self.latency.confirmation)?;

        {
            let mut pending = self.pending.lock();
            let position = pending.iter().position(|queued| *queued == request);
            self.floor.receive_request(request);
            match position {
                Some(index) => {
                    pending.remove(index);
                },
                None => debug!("completed request was no longer pending"),
            }
        }
        self.pending.notify_all();
        Ok(())
    }

    pub fn record_completion(&self, request: Request) {
        debug!("Scheduler: recording completion of {}", request);
        self.response_log.append(request);
    }

    pub fn set_lamp_status(&self, direction: ButtonDirection) {
        self.floor.set_lamp_status(direction);
    }

    /// The control loop. Alternates between idle and processing until the
    /// shutdown signal fires, then returns `Ok(())`.
    pub fn run(&self) -> Result<(), WaitError> {
        let mut state_machine = StateMachine::new();
        info!("Scheduler started in state {}", state_machine.current());
        self.publish_status(state_machine.current());

        loop {
            if self.shutdown.is_triggered() {
                info!("Scheduler shutting down");
                return Ok(());
            }
            let result = match state_machine.current() {
                SchedulerState::Idle => {
                    self.handle_idle(&mut state_machine);
                    Ok(())
                },
                SchedulerState::Processing => self.handle_processing(&mut state_machine),
            };
            match result {
                Ok(()) => self.publish_status(state_machine.current()),
                Err(WaitError::Cancelled) => {
                    info!("Scheduler shutting down while {}", state_machine.current());
                    return Ok(());
                },
                Err(e) => return Err(e),
            }
        }
    }

    fn handle_idle(&self, state_machine: &mut StateMachine) {
        state_machine.start_processing();
    }

    fn handle_processing(&self, state_machine: &mut StateMachine) -> Result<(), WaitError> {
        info!("Scheduler is processing requests...");
        {
            let mut floor_requests = self.floor.requests().wait_non_empty(&self.shutdown, None)?;
            let mut pending = self.pending.lock();
            while let Some(request) = floor_requests.pop_front() {
                info!("(FORWARD) Scheduler: received {} from floor subsystem", request);
                pending.push_back(request);
            }
        }
        self.pending.notify_all();

        state_machine.start_idling();
        info!("Scheduler goes back to idle state");
        Ok(())
    }

    fn publish_status(&self, state: SchedulerState) {
        if let Some(status_tx) = &self.status_tx {
            let status = SchedulerStatus {
                state: state,
                pending: self.pending.snapshot(),
                completed: self.response_log.len(),
            };
            if status_tx.send(status).is_err() {
                debug!("status receiver is gone");
            }
        }
    }
}
