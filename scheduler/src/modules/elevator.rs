/// ----- ELEVATOR MODULE -----
/// Stand-in for the elevator subsystem. Takes pending requests from the
/// scheduler one at a time, pretends to service them and reports back.

use std::time::Duration;

use log::info;

use shared_resources::config::ElevatorConfig;
use shared_resources::request::Request;

use crate::modules::floor::Floor;
use crate::modules::scheduler::Scheduler;
use crate::utilities::shutdown::Shutdown;
use crate::utilities::wait_error::WaitError;

pub struct ElevatorSubsystem {
    service_time: Duration,
}

impl ElevatorSubsystem {
    pub fn new(elevator_config: ElevatorConfig) -> Self {
        ElevatorSubsystem {
            service_time: elevator_config.service_time,
        }
    }

    /// Serves requests until shutdown.
    pub fn run<F: Floor>(&self, scheduler: &Scheduler<F>, shutdown: &Shutdown) -> Result<(), WaitError> {
        loop {
            match self.serve_next(scheduler, shutdown) {
                Ok(request) => info!("Elevator: finished {}", request),
                Err(WaitError::Cancelled) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    fn serve_next<F: Floor>(&self, scheduler: &Scheduler<F>, shutdown: &Shutdown) -> Result<Request, WaitError> {
        let request = scheduler.take_next(None)?;
        info!("Elevator: servicing {}", request);
        scheduler.set_lamp_status(request.direction());
        shutdown.sleep(self.service_time)?;

        scheduler.report_completion(request.clone())?;
        scheduler.record_completion(request.clone());
        Ok(request)
    }
}
