use glazebar_core::{
    components::icons::{Icons, icon},
    providers::battery::{BatteryOutput, charge_icon},
};
use iced::{Alignment, Element, widget::{Row, text}};

use crate::app::Message;

/// Battery readout: charging plug indicator, bracket icon, rounded percent.
pub fn render(output: Option<&BatteryOutput>) -> Option<Element<'static, Message>> {
    let battery = output.copied()?;

    let mut content = Row::new().spacing(4).align_y(Alignment::Center);

    if battery.is_charging {
        content = content.push(icon(Icons::PowerPlug));
    }

    content = content
        .push(icon(charge_icon(battery.charge_percent)))
        .push(text(format!("{}%", battery.charge_percent.round())));

    Some(content.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_output_renders_nothing() {
        assert!(render(None).is_none());
    }
}
