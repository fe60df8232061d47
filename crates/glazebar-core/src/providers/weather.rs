use std::time::Duration;

use glazebar_proto::config::WeatherConfig;
use log::error;
use masterror::{AppError, AppResult};
use serde::Deserialize;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};

use crate::{components::icons::Icons, context::ProviderContext, event_bus::ProviderEvent};

/// Sky condition, split into day and night flavors to pick the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherStatus {
    ClearDay,
    ClearNight,
    CloudyDay,
    CloudyNight,
    LightRainDay,
    LightRainNight,
    HeavyRainDay,
    HeavyRainNight,
    SnowDay,
    SnowNight,
    ThunderDay,
    ThunderNight,
}

impl WeatherStatus {
    /// Decode a WMO weather code into a status. Unknown codes yield `None`
    /// and the readout renders no icon for them.
    pub fn from_wmo(code: u8, is_day: bool) -> Option<Self> {
        Some(match code {
            0 => {
                if is_day {
                    Self::ClearDay
                } else {
                    Self::ClearNight
                }
            }
            1..=3 | 45 | 48 => {
                if is_day {
                    Self::CloudyDay
                } else {
                    Self::CloudyNight
                }
            }
            51 | 53 | 55 | 56 | 57 | 61 | 66 | 80 => {
                if is_day {
                    Self::LightRainDay
                } else {
                    Self::LightRainNight
                }
            }
            63 | 65 | 67 | 81 | 82 => {
                if is_day {
                    Self::HeavyRainDay
                } else {
                    Self::HeavyRainNight
                }
            }
            71 | 73 | 75 | 77 | 85 | 86 => {
                if is_day {
                    Self::SnowDay
                } else {
                    Self::SnowNight
                }
            }
            95 | 96 | 99 => {
                if is_day {
                    Self::ThunderDay
                } else {
                    Self::ThunderNight
                }
            }
            _ => return None,
        })
    }
}

impl From<WeatherStatus> for Icons {
    fn from(status: WeatherStatus) -> Self {
        match status {
            WeatherStatus::ClearDay => Icons::DaySunny,
            WeatherStatus::ClearNight => Icons::NightClear,
            WeatherStatus::CloudyDay => Icons::DayCloudy,
            WeatherStatus::CloudyNight => Icons::NightCloudy,
            WeatherStatus::LightRainDay => Icons::DaySprinkle,
            WeatherStatus::LightRainNight => Icons::NightSprinkle,
            WeatherStatus::HeavyRainDay => Icons::DayRain,
            WeatherStatus::HeavyRainNight => Icons::NightRain,
            WeatherStatus::SnowDay => Icons::DaySnow,
            WeatherStatus::SnowNight => Icons::NightSnow,
            WeatherStatus::ThunderDay => Icons::DayThunder,
            WeatherStatus::ThunderNight => Icons::NightThunder,
        }
    }
}

/// Weather snapshot for the right-region readout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherOutput {
    pub status: Option<WeatherStatus>,
    pub celsius_temp: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct WeatherResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Clone, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u8,
    is_day: u8,
}

fn decode(response: WeatherResponse) -> WeatherOutput {
    let current = response.current_weather;

    WeatherOutput {
        status: WeatherStatus::from_wmo(current.weathercode, current.is_day == 1),
        celsius_temp: current.temperature as f32,
    }
}

/// Fetch the current weather from the Open-Meteo API.
async fn fetch_weather(config: &WeatherConfig) -> AppResult<WeatherOutput> {
    let url = format!(
        "https://api.open-meteo.com/v1/forecast?latitude={}&longitude={}&current_weather=true",
        config.latitude, config.longitude
    );

    let response = reqwest::get(&url).await.map_err(|e| {
        if e.is_timeout() {
            AppError::internal("Weather API timeout")
        } else if e.is_connect() {
            AppError::internal("No internet connection - cannot fetch weather")
        } else {
            AppError::internal(format!("Network error fetching weather: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::internal(match status.as_u16() {
            429 => "Weather API rate limit exceeded - try again later".to_string(),
            500..=599 => format!("Weather API server error ({status})"),
            _ => format!("Weather API returned error {status}"),
        }));
    }

    let payload = response
        .json::<WeatherResponse>()
        .await
        .map_err(|e| AppError::internal(format!("Invalid weather data format from API: {e}")))?;

    Ok(decode(payload))
}

pub(crate) fn spawn(ctx: &ProviderContext, config: WeatherConfig) -> JoinHandle<()> {
    let sender = ctx.provider_sender(ProviderEvent::Weather);
    let refresh = Duration::from_secs(config.update_interval_minutes.max(1) * 60);

    ctx.runtime_handle().spawn(async move {
        let mut ticker = interval(refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick fires immediately, so the readout appears without
            // waiting a full refresh interval.
            ticker.tick().await;

            match fetch_weather(&config).await {
                Ok(output) => {
                    if let Err(err) = sender.try_send(output) {
                        error!("failed to publish weather update: {err}");
                    }
                }
                Err(err) => error!("failed to fetch weather: {err}"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL_STATUSES: [WeatherStatus; 12] = [
        WeatherStatus::ClearDay,
        WeatherStatus::ClearNight,
        WeatherStatus::CloudyDay,
        WeatherStatus::CloudyNight,
        WeatherStatus::LightRainDay,
        WeatherStatus::LightRainNight,
        WeatherStatus::HeavyRainDay,
        WeatherStatus::HeavyRainNight,
        WeatherStatus::SnowDay,
        WeatherStatus::SnowNight,
        WeatherStatus::ThunderDay,
        WeatherStatus::ThunderNight,
    ];

    #[test]
    fn every_status_maps_to_a_distinct_icon() {
        let icons: HashSet<Icons> = ALL_STATUSES.iter().map(|s| Icons::from(*s)).collect();

        assert_eq!(icons.len(), ALL_STATUSES.len());
    }

    #[test]
    fn unknown_wmo_codes_carry_no_status() {
        assert_eq!(WeatherStatus::from_wmo(42, true), None);
        assert_eq!(WeatherStatus::from_wmo(42, false), None);
        assert_eq!(WeatherStatus::from_wmo(200, true), None);
    }

    #[test]
    fn wmo_codes_pick_the_day_flavor() {
        assert_eq!(
            WeatherStatus::from_wmo(0, true),
            Some(WeatherStatus::ClearDay)
        );
        assert_eq!(
            WeatherStatus::from_wmo(0, false),
            Some(WeatherStatus::ClearNight)
        );
        assert_eq!(
            WeatherStatus::from_wmo(95, true),
            Some(WeatherStatus::ThunderDay)
        );
        assert_eq!(
            WeatherStatus::from_wmo(85, false),
            Some(WeatherStatus::SnowNight)
        );
    }

    #[test]
    fn decode_maps_temperature_and_day_flag() {
        let output = decode(WeatherResponse {
            current_weather: CurrentWeather {
                temperature: 21.6,
                weathercode: 0,
                is_day: 0,
            },
        });

        assert_eq!(output.status, Some(WeatherStatus::ClearNight));
        assert_eq!(output.celsius_temp, 21.6);
    }
}
