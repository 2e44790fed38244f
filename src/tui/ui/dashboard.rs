//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{Assessment, SeverityBand};
use crate::tui::styles::WellnessTheme;

/// In-memory summary of assessments completed this session.
///
/// Results are not persisted; the summary dies with the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSummary {
    pub total: usize,
    pub normal: u32,
    pub mild: u32,
    pub moderate: u32,
    pub severe: u32,
    pub extremely_severe: u32,
    pub prone_flags: u32,
}

impl SessionSummary {
    /// Record one completed assessment.
    pub fn record(&mut self, assessment: &Assessment) {
        self.total += 1;
        match assessment.severity {
            SeverityBand::Normal => self.normal += 1,
            SeverityBand::Mild => self.mild += 1,
            SeverityBand::Moderate => self.moderate += 1,
            SeverityBand::Severe => self.severe += 1,
            SeverityBand::ExtremelySevere => self.extremely_severe += 1,
        }
        if assessment.guidance.is_prone() {
            self.prone_flags += 1;
        }
    }
}

/// Dashboard state for rendering.
pub struct DashboardState {
    pub model_loaded: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            model_loaded: false,
        }
    }
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState, summary: SessionSummary) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state, summary);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", WellnessTheme::text()),
        Span::styled("Mindgauge", WellnessTheme::title()),
        Span::styled(" │ ", WellnessTheme::text_muted()),
        Span::styled(
            "DASS-21 Mental Well-being Assessment",
            WellnessTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(WellnessTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState, summary: SessionSummary) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Status and actions
            Constraint::Percentage(60), // Session summary
        ])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_session_summary(f, chunks[1], summary);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // System status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let status_items = vec![
        format_status_item("Models Loaded", state.model_loaded),
        Line::from(vec![
            Span::styled("  Scoring: ", WellnessTheme::text_secondary()),
            Span::styled("local, offline-trained", WellnessTheme::text_muted()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" System Status ", WellnessTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(WellnessTheme::border());

    let status_list = Paragraph::new(status_items).block(status_block);
    f.render_widget(status_list, chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[S] ", WellnessTheme::key_hint()),
            Span::styled("Stress Assessment", WellnessTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[A] ", WellnessTheme::key_hint()),
            Span::styled("Anxiety Assessment", WellnessTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[D] ", WellnessTheme::key_hint()),
            Span::styled("Depression Assessment", WellnessTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", WellnessTheme::key_hint()),
            Span::styled("Quit", WellnessTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Assessments ", WellnessTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(WellnessTheme::border());

    let actions_list = Paragraph::new(actions).block(actions_block);
    f.render_widget(actions_list, chunks[1]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", WellnessTheme::success())
    } else {
        ("FAIL", WellnessTheme::danger())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), WellnessTheme::text()),
    ])
}

fn render_session_summary(f: &mut Frame, area: Rect, summary: SessionSummary) {
    let block = Block::default()
        .title(Span::styled(
            " This Session (not persisted) ",
            WellnessTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(WellnessTheme::border());

    if summary.total == 0 {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No assessments yet. Press [S], [A] or [D] to start.",
            WellnessTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let severity_line = |label: &'static str, count: u32, band: SeverityBand| {
        Line::from(vec![
            Span::styled(format!("{label}: "), WellnessTheme::text_secondary()),
            Span::styled(count.to_string(), WellnessTheme::severity(band)),
        ])
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Completed: ", WellnessTheme::text_secondary()),
            Span::styled(summary.total.to_string(), WellnessTheme::text()),
        ]),
        Line::from(""),
        severity_line("Normal", summary.normal, SeverityBand::Normal),
        severity_line("Mild", summary.mild, SeverityBand::Mild),
        severity_line("Moderate", summary.moderate, SeverityBand::Moderate),
        severity_line("Severe", summary.severe, SeverityBand::Severe),
        severity_line(
            "Extremely Severe",
            summary.extremely_severe,
            SeverityBand::ExtremelySevere,
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("Prone flags: ", WellnessTheme::text_secondary()),
            Span::styled(summary.prone_flags.to_string(), WellnessTheme::warning()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Scores and answers are never written to disk.",
            WellnessTheme::text_muted(),
        )]),
    ];

    let p = Paragraph::new(lines).block(Block::default());
    f.render_widget(p, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dimension;

    #[test]
    fn test_summary_records_bands_and_proneness() {
        let mut summary = SessionSummary::default();
        summary.record(&Assessment::stress(10.0));
        summary.record(&Assessment::with_proneness(Dimension::Anxiety, 25.0, true));
        summary.record(&Assessment::with_proneness(Dimension::Depression, 5.0, false));

        assert_eq!(summary.total, 3);
        assert_eq!(summary.normal, 2);
        assert_eq!(summary.extremely_severe, 1);
        assert_eq!(summary.prone_flags, 1);
    }
}
