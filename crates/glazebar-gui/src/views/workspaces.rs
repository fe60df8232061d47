use glazebar_core::{
    components::icons::icon,
    providers::glazewm::{TOGGLE_TILING_DIRECTION, direction_icon, focus_workspace_command},
};
use glazebar_proto::ports::glazewm::GlazewmState;
use iced::{
    Border, Element, Theme,
    widget::{Row, button, text},
};

use crate::app::Message;

fn workspace_button_style(
    has_focus: bool,
    is_displayed: bool,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme: &Theme, _status| {
        let palette = theme.extended_palette();

        let (background, text_color) = if has_focus {
            (palette.primary.strong.color, palette.primary.strong.text)
        } else if is_displayed {
            (palette.background.strong.color, palette.background.base.text)
        } else {
            (palette.background.weak.color, palette.background.base.text)
        };

        button::Style {
            background: Some(background.into()),
            text_color,
            border: Border {
                radius: 8.0.into(),
                ..Border::default()
            },
            ..button::Style::default()
        }
    }
}

/// Workspace buttons for the left region. Absent until the window manager
/// provider has emitted.
pub fn workspace_buttons(state: Option<&GlazewmState>) -> Option<Element<'_, Message>> {
    let state = state?;

    Some(
        Row::with_children(
            state
                .workspaces
                .iter()
                .map(|workspace| {
                    button(text(workspace.label().to_owned()))
                        .style(workspace_button_style(
                            workspace.has_focus,
                            workspace.is_displayed,
                        ))
                        .padding([2, 8])
                        .on_press(Message::RunCommand(focus_workspace_command(
                            &workspace.name,
                        )))
                        .into()
                })
                .collect::<Vec<_>>(),
        )
        .spacing(4)
        .into(),
    )
}

/// Tiling-direction toggle for the right region. Shares the window manager
/// slot with the workspace buttons, so it disappears with them.
pub fn tiling_toggle(state: Option<&GlazewmState>) -> Option<Element<'static, Message>> {
    let state = state?;

    Some(
        button(icon(direction_icon(state.tiling_direction)))
            .style(button::text)
            .padding([2, 4])
            .on_press(Message::RunCommand(TOGGLE_TILING_DIRECTION.to_string()))
            .into(),
    )
}
