use shared_resources::direction::ButtonDirection;
use shared_resources::request::Request;

use crate::modules::state_machine::SchedulerState;

/// Snapshot published by the control loop after every state transition.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub pending: Vec<Request>,
    pub completed: usize,
}

impl SchedulerStatus {
    pub fn pending_at_floor(&self, floor: u8, direction: ButtonDirection) -> usize {
        self.pending
            .iter()
            .filter(|request| request.floor() == floor && request.direction() == direction)
            .count()
    }
}
