use glazebar_core::providers::date::DateOutput;
use iced::{Element, widget::text};

use crate::app::Message;

/// Shown while the date provider has not emitted yet.
pub const DATE_FALLBACK: &str = "Not available";

fn date_text(output: Option<&DateOutput>) -> String {
    output.map_or_else(|| DATE_FALLBACK.to_string(), |date| date.formatted.clone())
}

/// Center readout: the formatted date, or the fallback literal.
pub fn render(output: Option<&DateOutput>) -> Element<'static, Message> {
    text(date_text(output)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_output_renders_fallback_literal() {
        assert_eq!(date_text(None), "Not available");
    }

    #[test]
    fn present_output_passes_through() {
        let output = DateOutput {
            formatted: "Mon 3 Aug 12:30:00".to_string(),
        };

        assert_eq!(date_text(Some(&output)), "Mon 3 Aug 12:30:00");
    }

    #[test]
    fn rendering_is_idempotent_for_a_snapshot() {
        let output = DateOutput {
            formatted: "Mon 3 Aug 12:30:00".to_string(),
        };

        assert_eq!(date_text(Some(&output)), date_text(Some(&output)));
    }
}
