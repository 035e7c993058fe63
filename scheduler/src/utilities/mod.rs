pub mod debug;
pub mod request_log;
pub mod request_queue;
pub mod scheduler_status;
pub mod shutdown;
pub mod wait_error;
