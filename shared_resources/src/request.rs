use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use super::direction::ButtonDirection;

/// Failure to read a request file.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "could not read request file: {}", e),
            LoadError::Parse(e) => write!(f, "could not parse request file: {}", e),
        }
    }
}

impl error::Error for LoadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

impl From<LoadError> for io::Error {
    fn from(e: LoadError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    }
}

/// A single elevator call.
///
/// Built by the floor subsystem when a button is pressed and never changed
/// afterwards; the scheduler only moves it between containers.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Request {
    time_ms: u64,
    floor: u8,
    direction: ButtonDirection,
    destination: u8,
}

impl Request {
    pub fn new(time_ms: u64, floor: u8, direction: ButtonDirection, destination: u8) -> Self {
        Request {
            time_ms: time_ms,
            floor: floor,
            direction: direction,
            destination: destination,
        }
    }

    /// Offset from simulation start at which the call is made.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> ButtonDirection {
        self.direction
    }

    pub fn destination(&self) -> u8 {
        self.destination
    }

    /// Reads a JSON array of requests, e.g. the input file replayed by the floor subsystem.
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<Request>, LoadError> {
        let contents = fs::read_to_string(path)?;
        let mut requests: Vec<Request> = serde_json::from_str(&contents)?;
        requests.sort_by_key(|request| request.time_ms);
        Ok(requests)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms floor {} {} -> {}", self.time_ms, self.floor, self.direction, self.destination)
    }
}
