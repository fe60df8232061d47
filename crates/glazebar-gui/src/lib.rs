use flexi_logger::LogSpecification;
use glazebar_proto::config::LogLevel;

mod views;

pub mod app;

pub use app::{App, Message};

pub fn get_log_spec(log_level: LogLevel) -> LogSpecification {
    LogSpecification::env_or_parse(log_level.as_str()).unwrap_or_else(|err| {
        panic!("Failed to parse log level: {err}");
    })
}
