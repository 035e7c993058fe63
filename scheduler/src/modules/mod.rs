use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::unbounded;
use log::{info, warn};

use shared_resources::config::SchedulerConfig;
use shared_resources::direction::ButtonDirection;
use shared_resources::request::Request;

use crate::utilities::debug;
use crate::utilities::shutdown;
use crate::utilities::wait_error::WaitError;

pub mod elevator;
pub mod floor;
pub mod scheduler;
pub mod state_machine;

use self::elevator::ElevatorSubsystem;
use self::floor::FloorSubsystem;
use self::scheduler::Scheduler;

fn demo_requests() -> Vec<Request> {
    vec![
        Request::new(0, 2, ButtonDirection::Up, 4),
        Request::new(1000, 5, ButtonDirection::Down, 1),
        Request::new(2500, 1, ButtonDirection::Up, 3),
    ]
}

fn join(name: &str, handle: JoinHandle<Result<(), WaitError>>) -> io::Result<()> {
    match handle.join() {
        Ok(Ok(())) | Ok(Err(WaitError::Cancelled)) => Ok(()),
        Ok(Err(e)) => Err(io::Error::new(io::ErrorKind::Other, e)),
        Err(_) => Err(io::Error::new(io::ErrorKind::Other, format!("{} thread panicked", name))),
    }
}

pub fn run() -> io::Result<()> {
    // READ CONFIGURATION
    let config = SchedulerConfig::get()?;
    let requests = match &config.requests_file {
        Some(path) => Request::load_all(path)?,
        None => demo_requests(),
    };
    let num_requests = requests.len();

    // INITIALIZE SHARED STATE
    let (shutdown_trigger, shutdown) = shutdown::channel(config.poll_interval);
    let floor = Arc::new(FloorSubsystem::new());
    let (status_tx, status_rx) = unbounded();
    let scheduler = {
        let scheduler = Scheduler::new(floor.clone(), config.latency, shutdown.clone());
        if config.debug {
            Arc::new(scheduler.with_status_channel(status_tx))
        } else {
            Arc::new(scheduler)
        }
    };

    // INITIALIZE THREAD FOR DEBUG VIEW
    let debug_handle = if config.debug {
        let num_floors = config.elevator.num_floors;
        Some(thread::Builder::new().name("debug".to_string()).spawn(move || debug::main(num_floors, status_rx))?)
    } else {
        None
    };

    // INITIALIZE THREAD FOR SCHEDULER
    let scheduler_handle = {
        let scheduler = scheduler.clone();
        thread::Builder::new().name("scheduler".to_string()).spawn(move || scheduler.run())?
    };

    // INITIALIZE THREAD FOR ELEVATOR SUBSYSTEM
    let elevator_handle = {
        let scheduler = scheduler.clone();
        let shutdown = shutdown.clone();
        let elevator = ElevatorSubsystem::new(config.elevator.clone());
        thread::Builder::new().name("elevator".to_string()).spawn(move || elevator.run(scheduler.as_ref(), &shutdown))?
    };

    // INITIALIZE THREAD FOR FLOOR SUBSYSTEM
    let floor_handle = {
        let floor = floor.clone();
        let shutdown = shutdown.clone();
        thread::Builder::new().name("floor".to_string()).spawn(move || floor.run(requests, &shutdown))?
    };

    match scheduler.response_log().wait_for_len(num_requests, &shutdown, config.run_time) {
        Ok(()) => info!("All {} requests served", num_requests),
        Err(WaitError::TimedOut) => warn!(
            "Run time elapsed with {} of {} requests served",
            scheduler.response_log().len(),
            num_requests,
        ),
        Err(WaitError::Cancelled) => (),
    }

    info!("STOPPING PROGRAM...");
    shutdown_trigger.trigger();
    join("floor", floor_handle)?;
    join("elevator", elevator_handle)?;
    join("scheduler", scheduler_handle)?;

    // the debug view exits once the last scheduler handle is gone
    drop(scheduler);
    if let Some(handle) = debug_handle {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => return Err(io::Error::new(io::ErrorKind::Other, "debug thread panicked")),
        }
    }
    Ok(())
}
