// ============================================================================
// Palette de couleurs
// ============================================================================
// Deux palettes (clair / sombre) choisies selon la ThemePreference
// ============================================================================

use ratatui::style::{Color, Style};

use crate::models::{ThemePreference, Trend};

/// Couleurs utilisées par tous les widgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub error: Color,
}

impl Palette {
    /// Palette claire
    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(247, 250, 252),
        text: Color::Rgb(26, 32, 44),
        muted: Color::Rgb(113, 128, 150),
        border: Color::Rgb(160, 174, 192),
        accent: Color::Rgb(49, 130, 206),
        positive: Color::Rgb(56, 161, 105),
        negative: Color::Rgb(229, 62, 62),
        error: Color::Rgb(197, 48, 48),
    };

    /// Palette sombre
    pub const DARK: Palette = Palette {
        background: Color::Rgb(26, 32, 44),
        text: Color::Rgb(247, 250, 252),
        muted: Color::Rgb(160, 174, 192),
        border: Color::Rgb(74, 85, 104),
        accent: Color::Rgb(99, 179, 237),
        positive: Color::Rgb(72, 187, 120),
        negative: Color::Rgb(245, 101, 101),
        error: Color::Rgb(252, 129, 129),
    };

    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Light => Self::LIGHT,
            ThemePreference::Dark => Self::DARK,
        }
    }

    /// Couleur d'une série ou d'une variation
    pub fn trend(&self, trend: Trend) -> Color {
        match trend {
            Trend::Positive => self.positive,
            Trend::Negative => self.negative,
        }
    }

    /// Style de base : texte sur fond
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border).bg(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_for_theme() {
        assert_eq!(Palette::for_theme(ThemePreference::Dark), Palette::DARK);
        assert_ne!(Palette::LIGHT.trend(Trend::Positive), Palette::LIGHT.trend(Trend::Negative));
    }
}
