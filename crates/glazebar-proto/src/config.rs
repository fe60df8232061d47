use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE_PATH: &str = "~/.config/glazebar/config.toml";

/// Bar placement configuration.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    /// Render the bar at the top of the output.
    #[default]
    Top,
    /// Render the bar at the bottom of the output.
    Bottom,
}

/// Options for the window-manager integration.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GlazewmConfig {
    /// Name of the `glazewm` binary used for queries, subscriptions and
    /// command dispatch.
    #[serde(default = "default_glazewm_command")]
    pub command: String,
}

impl Default for GlazewmConfig {
    fn default() -> Self {
        Self {
            command: default_glazewm_command(),
        }
    }
}

/// Options for the date provider.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DateConfig {
    /// chrono format string used for the center readout.
    #[serde(default = "default_date_format")]
    pub format: String,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            format: default_date_format(),
        }
    }
}

/// Options for the cpu provider.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CpuConfig {
    /// Usage percentage above which the readout switches to the
    /// high-usage color. Strictly above: a reading equal to the
    /// threshold is still normal.
    #[serde(default = "default_cpu_high_usage_threshold")]
    pub high_usage_threshold: u32,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            high_usage_threshold: default_cpu_high_usage_threshold(),
        }
    }
}

/// Options for the weather provider.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WeatherConfig {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default = "default_weather_update_interval")]
    pub update_interval_minutes: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            update_interval_minutes: default_weather_update_interval(),
        }
    }
}

/// Top-level configuration, deserialized from
/// `~/.config/glazebar/config.toml`. Every section falls back to its
/// defaults when omitted.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub position: Position,
    pub glazewm: GlazewmConfig,
    pub date: DateConfig,
    pub cpu: CpuConfig,
    pub weather: WeatherConfig,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn default_glazewm_command() -> String {
    String::from("glazewm")
}

fn default_date_format() -> String {
    // Equivalent of the `EEE d MMM HH:mm:ss` pattern used by the
    // original widget.
    String::from("%a %-d %b %T")
}

fn default_cpu_high_usage_threshold() -> u32 {
    85
}

fn default_weather_update_interval() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let config: Config = toml::from_str("").expect("empty config parses");

        assert_eq!(config, Config::default());
        assert_eq!(config.date.format, "%a %-d %b %T");
        assert_eq!(config.cpu.high_usage_threshold, 85);
        assert_eq!(config.glazewm.command, "glazewm");
    }

    #[test]
    fn partial_section_keeps_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
            log_level = "debug"

            [weather]
            latitude = 52.52
            longitude = 13.4
            "#,
        )
        .expect("config parses");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.weather.latitude, 52.52);
        assert_eq!(config.weather.update_interval_minutes, 10);
        assert_eq!(config.position, Position::Top);
    }

    #[test]
    fn position_bottom_parses() {
        let config: Config =
            toml::from_str("position = \"Bottom\"").expect("config parses");

        assert_eq!(config.position, Position::Bottom);
    }
}
