//! UI module: View components for the TUI.

pub mod dashboard;
pub mod questionnaire;
pub mod results;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::WellnessTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This tool provides AI-based predictions, not a professional diagnosis.",
            WellnessTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "If your results indicate distress, please reach out to a mental health professional or counsellor.",
            WellnessTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(WellnessTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
