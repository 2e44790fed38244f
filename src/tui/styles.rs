//! Wellness-themed color palette and styles.
//!
//! Colors chosen for:
//! - Calm, supportive appearance for a mental-health context
//! - High contrast for accessibility
//! - Clear severity signaling without alarmism

use ratatui::style::{Color, Modifier, Style};

use crate::domain::SeverityBand;

/// Wellness theme color palette.
pub struct WellnessTheme;

impl WellnessTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color (calm, trust)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    // === Secondary Colors ===

    /// Slate blue - Secondary (professionalism)
    pub const SECONDARY: Color = Color::Rgb(71, 85, 105); // #475569

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Emerald - Positive/normal
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber - Moderate severity
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose - High severity/errors
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue - Info
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Text Colors ===

    /// Primary text (white)
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    /// Secondary text (gray)
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for success messages
    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Style for warning messages
    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Style for danger/error messages
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for info messages
    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    /// Style for focused borders
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Get severity band style
    #[must_use]
    pub fn severity(band: SeverityBand) -> Style {
        let (r, g, b) = band.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }
}

/// ASCII art logo for Mindgauge
#[allow(dead_code)]
pub const LOGO: &str = r#"
╔╦╗┬┌┐┌┌┬┐┌─┐┌─┐┬ ┬┌─┐┌─┐
║║║││││ │││ ┬├─┤│ ││ ┬├┤
╩ ╩┴┘└┘─┴┘└─┘┴ ┴└─┘└─┘└─┘
"#;

/// Smaller inline logo
#[allow(dead_code)]
pub const LOGO_SMALL: &str = "Mindgauge";
