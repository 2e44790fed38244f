//! Assessment result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Assessment, Guidance};
use crate::tui::styles::WellnessTheme;

/// Upper bound for the score gauge. The DASS dimension scales top out at 42
/// (seven items, 0-3, doubled by the survey scoring convention); predicted
/// scores above this are clamped for display only.
const SCORE_GAUGE_MAX: f64 = 42.0;

/// Results state
#[derive(Debug, Clone, Default)]
pub enum ResultsState {
    /// No result yet
    #[default]
    Idle,
    /// Completed with a result
    Complete { assessment: Assessment },
    /// Error occurred
    Error { message: String },
}

/// Render the results view
pub fn render_results(f: &mut Frame, area: Rect, state: &ResultsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_results_header(f, chunks[0]);
    render_results_content(f, chunks[1], state);
    render_results_footer(f, chunks[2], state);
}

fn render_results_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", WellnessTheme::text()),
        Span::styled("Assessment Result", WellnessTheme::title()),
        Span::styled(" │ Predicted Score & Severity", WellnessTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(WellnessTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_results_content(f: &mut Frame, area: Rect, state: &ResultsState) {
    match state {
        ResultsState::Idle => render_idle(f, area),
        ResultsState::Complete { assessment } => render_result(f, area, assessment),
        ResultsState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No assessment submitted yet",
            WellnessTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Complete a questionnaire to see results",
            WellnessTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(WellnessTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Result ", assessment.dimension),
            WellnessTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(WellnessTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Severity label
            Constraint::Length(4), // Score gauge
            Constraint::Min(0),    // Guidance
        ])
        .margin(1)
        .split(inner);

    // Severity (big display)
    let severity_style = WellnessTheme::severity(assessment.severity);
    let severity_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Severity: {}", assessment.severity),
            severity_style.add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Predicted {} score: {:.2}", assessment.dimension, assessment.score),
            WellnessTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(severity_display, chunks[0]);

    // Score gauge
    let ratio = (assessment.score / SCORE_GAUGE_MAX).clamp(0.0, 1.0);
    let score_gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Score ", WellnessTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(WellnessTheme::border()),
        )
        .gauge_style(severity_style)
        .percent((ratio * 100.0) as u16)
        .label(format!("{:.1}", assessment.score));
    f.render_widget(score_gauge, chunks[1]);

    // Guidance text
    let guidance_title = match assessment.guidance {
        Guidance::Recommendation { .. } => " Recommendation ",
        Guidance::Proneness { .. } => " Proneness ",
    };
    let guidance_style = if assessment.guidance.is_prone() {
        WellnessTheme::warning()
    } else {
        WellnessTheme::text()
    };
    let guidance = Paragraph::new(Line::from(Span::styled(
        assessment.guidance.text().to_string(),
        guidance_style,
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(guidance_title, WellnessTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(WellnessTheme::border()),
    );
    f.render_widget(guidance, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", WellnessTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, WellnessTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(WellnessTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_results_footer(f: &mut Frame, area: Rect, state: &ResultsState) {
    let content = match state {
        ResultsState::Complete { .. } => Line::from(vec![
            Span::styled("[Enter] ", WellnessTheme::key_hint()),
            Span::styled("Return ", WellnessTheme::key_desc()),
            Span::styled("[N] ", WellnessTheme::key_hint()),
            Span::styled("New Assessment", WellnessTheme::key_desc()),
        ]),
        ResultsState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", WellnessTheme::key_hint()),
            Span::styled("Retry ", WellnessTheme::key_desc()),
            Span::styled("[Esc] ", WellnessTheme::key_hint()),
            Span::styled("Back", WellnessTheme::key_desc()),
        ]),
        ResultsState::Idle => Line::from(vec![Span::styled(
            "Waiting for a submission...",
            WellnessTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(WellnessTheme::border()),
    );

    f.render_widget(footer, area);
}
