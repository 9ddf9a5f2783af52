use crate::cryptography::strength::Strength;
use crate::vault::notify::Severity;
use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Debug)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,
    pub accent: Color,
    pub muted: Color,
    pub selection: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            primary: Color::LightBlue,
            accent: Color::LightMagenta,
            muted: Color::DarkGray,
            selection: Color::Cyan,
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            primary: Color::Blue,
            accent: Color::Magenta,
            muted: Color::Gray,
            selection: Color::Blue,
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg)
    }
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection).add_modifier(Modifier::BOLD)
    }
    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn toast_style(&self, severity: Severity) -> Style {
        let color = match severity {
            Severity::Success => Color::Green,
            Severity::Info => self.primary,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn strength_style(&self, strength: Strength) -> Style {
        let color = match strength {
            Strength::Weak => Color::Red,
            Strength::Medium => Color::Yellow,
            Strength::Strong => Color::Green,
        };
        Style::default().fg(color)
    }
}

/// Three-cell meter, e.g. `■■□`.
pub fn strength_meter(strength: Strength) -> String {
    let filled = strength.bars();
    "■".repeat(filled) + &"□".repeat(3 - filled)
}
