use colored::{Color, Colorize};

/// The six named color-print builtins. `turkuaz` (turquoise) has no direct
/// `colored::Color` variant, so it maps to `Cyan` — the closest terminal
/// color and the same choice the reference implementation's colorama
/// integration fell back to in practice.
#[derive(Debug, Clone, Copy)]
pub enum NamedColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Turquoise,
}

impl NamedColor {
    fn to_colored(self) -> Color {
        match self {
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Turquoise => Color::Cyan,
        }
    }

    pub fn paint(self, text: &str) -> String {
        text.color(self.to_colored()).to_string()
    }
}
