/// ----- STATE MACHINE -----
/// Two-state machine driven by the scheduler's control loop. It carries no
/// locking of its own: the loop owns it as a local value and is the only
/// caller of the transitions.

use std::fmt;

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum SchedulerState {
    Idle,
    Processing,
}

impl SchedulerState {
    pub fn as_string(&self) -> String {
        match self {
            SchedulerState::Idle => String::from("idle"),
            SchedulerState::Processing => String::from("processing"),
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[derive(Debug)]
pub struct StateMachine {
    state: SchedulerState,
}

impl StateMachine {
    pub fn new() -> Self {
        StateMachine { state: SchedulerState::Idle }
    }

    pub fn current(&self) -> SchedulerState {
        self.state
    }

    pub(crate) fn start_processing(&mut self) {
        debug_assert_eq!(self.state, SchedulerState::Idle);
        self.state = SchedulerState::Processing;
    }

    pub(crate) fn start_idling(&mut self) {
        debug_assert_eq!(self.state, SchedulerState::Processing);
        self.state = SchedulerState::Idle;
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
