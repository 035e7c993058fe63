use std::env;
use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

const CONFIG_FILE: &str = "config.json";
const FALLBACK_CONFIG_FILE: &str = "_config.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read configuration: {}", e),
            ConfigError::Parse(e) => write!(f, "could not parse configuration: {}", e),
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ConfigError> for io::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Io(e) => e,
            ConfigError::Parse(e) => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}

/// Simulated signal propagation between the elevator and floor subsystems.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LatencyConfigFile {
    pub transit_ms: u64,
    pub confirmation_ms: u64,
}

impl Default for LatencyConfigFile {
    fn default() -> Self {
        LatencyConfigFile {
            transit_ms: 1000,
            confirmation_ms: 1000,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub num_floors: u8,
    pub latency: LatencyConfigFile,
    pub poll_interval_ms: u64,
    pub service_time_ms: u64,
    pub requests_file: Option<PathBuf>,
    pub run_time_ms: Option<u64>,
    pub debug: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            num_floors: 5,
            latency: LatencyConfigFile::default(),
            poll_interval_ms: 50,
            service_time_ms: 500,
            requests_file: None,
            run_time_ms: None,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyConfig {
    pub transit: Duration,
    pub confirmation: Duration,
}

impl LatencyConfig {
    /// No simulated delay at all. Used by tests.
    pub fn none() -> Self {
        LatencyConfig {
            transit: Duration::ZERO,
            confirmation: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElevatorConfig {
    pub num_floors: u8,
    pub service_time: Duration,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub latency: LatencyConfig,
    pub poll_interval: Duration,
    pub elevator: ElevatorConfig,
    pub requests_file: Option<PathBuf>,
    pub run_time: Option<Duration>,
    pub debug: bool,
}

impl From<ConfigFile> for SchedulerConfig {
    fn from(config_file: ConfigFile) -> Self {
        SchedulerConfig {
            latency: LatencyConfig {
                transit: Duration::from_millis(config_file.latency.transit_ms),
                confirmation: Duration::from_millis(config_file.latency.confirmation_ms),
            },
            poll_interval: Duration::from_millis(config_file.poll_interval_ms),
            elevator: ElevatorConfig {
                num_floors: config_file.num_floors,
                service_time: Duration::from_millis(config_file.service_time_ms),
            },
            requests_file: config_file.requests_file,
            run_time: config_file.run_time_ms.map(Duration::from_millis),
            debug: config_file.debug,
        }
    }
}

impl SchedulerConfig {
    /// Reads `config.json` (or the path given with `--config`), falling back
    /// to `_config.json` and then to built-in defaults.
    pub fn get() -> Result<Self, ConfigError> {
        let args: Vec<String> = env::args().collect();
        let config_file = match parse_env_args(&args) {
            Some(path) => Self::read_file(&path)?,
            None => read_config_file()?,
        };
        Ok(config_file.into())
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ConfigFile, ConfigError> {
        let config_contents = fs::read_to_string(path)?;
        Self::parse(&config_contents)
    }

    pub fn parse(config_contents: &str) -> Result<ConfigFile, ConfigError> {
        Ok(serde_json::from_str(config_contents)?)
    }
}

fn read_config_file() -> Result<ConfigFile, ConfigError> {
    for file_path in [CONFIG_FILE, FALLBACK_CONFIG_FILE] {
        match fs::read_to_string(file_path) {
            Ok(content) => {
                info!("Using configuration from {}", file_path);
                return SchedulerConfig::parse(&content);
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        }
    }
    info!("No configuration file provided, using default settings...");
    Ok(ConfigFile::default())
}

// `args[0]` is the program name; the rest are `--flag value` pairs.
fn parse_env_args(args: &[String]) -> Option<PathBuf> {
    let mut config_path = None;

    let flags = args.get(1..).unwrap_or_default().chunks_exact(2);
    if let Some(extra) = flags.remainder().first() {
        warn!("argument {} has no value, skipping...", extra);
    }
    for arg_pair in flags {
        match arg_pair[0].as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(&arg_pair[1]));
            },
            _ => {warn!("illegal argument {}, skipping...", arg_pair[0]);},
        }
    }
    config_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config_file = SchedulerConfig::parse("{}").unwrap();
        assert_eq!(config_file, ConfigFile::default());

        let config: SchedulerConfig = config_file.into();
        assert_eq!(config.latency.transit, Duration::from_secs(1));
        assert_eq!(config.latency.confirmation, Duration::from_secs(1));
        assert_eq!(config.elevator.num_floors, 5);
        assert!(config.run_time.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn partial_latency_keeps_other_default() {
        let config_file = SchedulerConfig::parse(r#"{"latency": {"transit_ms": 20}}"#).unwrap();
        let config: SchedulerConfig = config_file.into();
        assert_eq!(config.latency.transit, Duration::from_millis(20));
        assert_eq!(config.latency.confirmation, Duration::from_millis(1000));
    }

    #[test]
    fn full_file_is_parsed() {
        let config_file = SchedulerConfig::parse(r#"{
            "num_floors": 7,
            "latency": {"transit_ms": 10, "confirmation_ms": 30},
            "poll_interval_ms": 5,
            "service_time_ms": 100,
            "requests_file": "requests.json",
            "run_time_ms": 4000,
            "debug": true
        }"#).unwrap();
        let config: SchedulerConfig = config_file.into();
        assert_eq!(config.elevator.num_floors, 7);
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert_eq!(config.elevator.service_time, Duration::from_millis(100));
        assert_eq!(config.requests_file, Some(PathBuf::from("requests.json")));
        assert_eq!(config.run_time, Some(Duration::from_secs(4)));
        assert!(config.debug);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = SchedulerConfig::parse("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn config_flag_is_picked_up() {
        let args: Vec<String> = ["scheduler", "--config", "other.json"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_env_args(&args), Some(PathBuf::from("other.json")));
    }

    #[test]
    fn trailing_argument_does_not_shift_pairs() {
        let args: Vec<String> = ["scheduler", "--config", "other.json", "extra"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_env_args(&args), Some(PathBuf::from("other.json")));
    }

    #[test]
    fn program_name_is_not_a_flag() {
        let args: Vec<String> = ["--config", "--config", "other.json"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_env_args(&args), Some(PathBuf::from("other.json")));
    }

    #[test]
    fn no_flag_means_default_lookup() {
        let args = vec![String::from("scheduler")];
        assert_eq!(parse_env_args(&args), None);
    }
}
