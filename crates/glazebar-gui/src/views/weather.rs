use glazebar_core::{
    components::icons::{Icons, icon},
    providers::weather::WeatherOutput,
};
use iced::{Alignment, Element, widget::{Row, text}};

use crate::app::Message;

/// Weather readout: status icon when the condition is known, rounded
/// Celsius temperature either way.
pub fn render(output: Option<&WeatherOutput>) -> Option<Element<'static, Message>> {
    let weather = output.copied()?;

    let mut content = Row::new().spacing(4).align_y(Alignment::Center);

    if let Some(status) = weather.status {
        content = content.push(icon(Icons::from(status)));
    }

    content = content.push(text(format!("{}°C", weather.celsius_temp.round())));

    Some(content.into())
}
