use iced::{
    Font,
    widget::{Text, text},
};

pub const NERD_FONT: Font = Font::with_name("Symbols Nerd Font");

/// Glyphs used by the bar, drawn from a nerd font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icons {
    Battery0,
    Battery1,
    Battery2,
    Battery3,
    Battery4,
    PowerPlug,
    Cpu,
    Memory,
    SwapHorizontal,
    SwapVertical,
    DaySunny,
    NightClear,
    DayCloudy,
    NightCloudy,
    DaySprinkle,
    NightSprinkle,
    DayRain,
    NightRain,
    DaySnow,
    NightSnow,
    DayThunder,
    NightThunder,
}

impl From<Icons> for &'static str {
    fn from(icon: Icons) -> Self {
        match icon {
            Icons::Battery0 => "\u{f244}",
            Icons::Battery1 => "\u{f243}",
            Icons::Battery2 => "\u{f242}",
            Icons::Battery3 => "\u{f241}",
            Icons::Battery4 => "\u{f240}",
            Icons::PowerPlug => "\u{f06a5}",
            Icons::Cpu => "\u{f4bc}",
            Icons::Memory => "\u{f035b}",
            Icons::SwapHorizontal => "\u{f04e1}",
            Icons::SwapVertical => "\u{f04e2}",
            Icons::DaySunny => "\u{e30d}",
            Icons::NightClear => "\u{e32e}",
            Icons::DayCloudy => "\u{e302}",
            Icons::NightCloudy => "\u{e37e}",
            Icons::DaySprinkle => "\u{e30b}",
            Icons::NightSprinkle => "\u{e328}",
            Icons::DayRain => "\u{e308}",
            Icons::NightRain => "\u{e325}",
            Icons::DaySnow => "\u{e30a}",
            Icons::NightSnow => "\u{e327}",
            Icons::DayThunder => "\u{e30e}",
            Icons::NightThunder => "\u{e32a}",
        }
    }
}

/// Build a text widget rendering the given icon with the nerd font.
pub fn icon<'a>(icon: Icons) -> Text<'a> {
    text(<&'static str>::from(icon)).font(NERD_FONT)
}
