use glazebar_core::{
    components::icons::{Icons, icon},
    providers::{cpu::CpuOutput, memory::MemoryOutput},
};
use glazebar_proto::config::CpuConfig;
use iced::{
    Alignment, Element, Theme,
    widget::{container, row, text},
};

use crate::app::Message;

fn percent_label(usage: f32) -> String {
    format!("{}%", usage.round())
}

/// Memory readout for the right region.
pub fn memory_readout(output: Option<&MemoryOutput>) -> Option<Element<'static, Message>> {
    let memory = output.copied()?;

    Some(
        row![icon(Icons::Memory), text(percent_label(memory.usage))]
            .spacing(4)
            .align_y(Alignment::Center)
            .into(),
    )
}

/// Cpu readout for the right region, colored when usage is strictly above
/// the configured threshold.
pub fn cpu_readout(
    output: Option<&CpuOutput>,
    config: &CpuConfig,
) -> Option<Element<'static, Message>> {
    let cpu = output.copied()?;
    let high_usage = cpu.is_high_usage(config.high_usage_threshold);

    Some(
        row![
            icon(Icons::Cpu),
            container(text(percent_label(cpu.usage))).style(move |theme: &Theme| {
                container::Style {
                    text_color: high_usage.then(|| theme.palette().danger),
                    ..container::Style::default()
                }
            })
        ]
        .spacing(4)
        .align_y(Alignment::Center)
        .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_label_rounds_to_whole_numbers() {
        assert_eq!(percent_label(37.4), "37%");
        assert_eq!(percent_label(37.5), "38%");
    }

    #[test]
    fn absent_outputs_render_nothing() {
        assert!(memory_readout(None).is_none());
        assert!(cpu_readout(None, &CpuConfig::default()).is_none());
    }
}
