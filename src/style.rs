use iced::widget::{container, progress_bar, text_input};
use iced::{Theme, Color, Background, Border};

pub fn hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 { return Color::BLACK; }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    Color::from_rgb8(r, g, b)
}

pub const BG_DARK: &str = "#2b2b2b";
pub const BG_DARKER: &str = "#1e1e1e";
pub const FG: &str = "#ffffff";
pub const HIGHLIGHT: &str = "#404040";
pub const ACCENT: &str = "#ff0000";

pub struct WindowStyle;
impl container::StyleSheet for WindowStyle {
    type Style = Theme;
    fn appearance(&self, _: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(hex_color(BG_DARK))),
            text_color: Some(hex_color(FG)),
            ..Default::default()
        }
    }
}

pub struct EntryStyle;
impl text_input::StyleSheet for EntryStyle {
    type Style = Theme;
    fn active(&self, _: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(hex_color(BG_DARKER)),
            border: Border { color: hex_color(HIGHLIGHT), width: 1.0, radius: 2.0.into() },
            icon_color: hex_color(FG),
        }
    }
    fn focused(&self, style: &Self::Style) -> text_input::Appearance {
        self.active(style)
    }
    fn disabled(&self, style: &Self::Style) -> text_input::Appearance {
        self.active(style)
    }
    fn placeholder_color(&self, _: &Self::Style) -> Color { hex_color(HIGHLIGHT) }
    fn value_color(&self, _: &Self::Style) -> Color { hex_color(FG) }
    fn disabled_color(&self, _: &Self::Style) -> Color { hex_color(HIGHLIGHT) }
    fn selection_color(&self, _: &Self::Style) -> Color { hex_color(ACCENT) }
}

pub struct BarStyle;
impl progress_bar::StyleSheet for BarStyle {
    type Style = Theme;
    fn appearance(&self, _: &Self::Style) -> progress_bar::Appearance {
        progress_bar::Appearance {
            background: Background::Color(hex_color(HIGHLIGHT)),
            bar: Background::Color(hex_color(ACCENT)),
            border_radius: 2.0.into(),
        }
    }
}
