//! Questionnaire entry form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{AnswerSet, Dimension, ANSWER_MAX, QUESTIONS_PER_DIMENSION};
use crate::tui::styles::WellnessTheme;

/// Questionnaire form state for one dimension.
pub struct QuestionnaireFormState {
    pub dimension: Dimension,
    /// One answer buffer per item ("0".."3" or empty)
    pub values: Vec<String>,
    pub selected_item: usize,
    pub error_message: Option<String>,
}

impl QuestionnaireFormState {
    /// Create an empty form for the given dimension.
    #[must_use]
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            values: vec![String::new(); QUESTIONS_PER_DIMENSION],
            selected_item: 0,
            error_message: None,
        }
    }

    /// Move to the next item
    pub fn next_item(&mut self) {
        self.selected_item = (self.selected_item + 1) % self.values.len();
    }

    /// Move to the previous item
    pub fn prev_item(&mut self) {
        if self.selected_item == 0 {
            self.selected_item = self.values.len() - 1;
        } else {
            self.selected_item -= 1;
        }
    }

    /// Set the current item's answer from a key press (scale is 0-3).
    pub fn input_char(&mut self, c: char) {
        if matches!(c, '0'..='3') {
            self.values[self.selected_item] = c.to_string();
            self.error_message = None;
        }
    }

    /// Clear the current item's answer.
    pub fn clear_item(&mut self) {
        self.values[self.selected_item].clear();
    }

    /// Wipe all answer buffers from memory and reset the form.
    ///
    /// Intended to be called immediately after submission so plaintext
    /// answers do not persist in the UI state.
    pub fn clear_sensitive(&mut self) {
        for value in self.values.iter_mut() {
            value.zeroize();
        }
        self.error_message = None;
        self.selected_item = 0;
    }

    /// Validate and convert to an AnswerSet.
    pub fn to_answer_set(&self) -> Result<AnswerSet, String> {
        let mut answers = Vec::with_capacity(QUESTIONS_PER_DIMENSION);

        for (i, value) in self.values.iter().enumerate() {
            let answer: u8 = value
                .parse()
                .map_err(|_| format!("Item {}: not answered", i + 1))?;
            if answer > ANSWER_MAX {
                return Err(format!("Item {}: answer must be 0-{ANSWER_MAX}", i + 1));
            }
            answers.push(answer);
        }

        AnswerSet::from_vec(&answers)
    }

    /// Load sample data for testing (mixed moderate answers).
    pub fn load_sample_data(&mut self) {
        let sample = ["1", "2", "1", "0", "2", "1", "1"];
        for (value, sample) in self.values.iter_mut().zip(sample) {
            *value = sample.to_string();
        }
    }
}

/// Render the questionnaire entry form.
pub fn render_questionnaire(f: &mut Frame, area: Rect, state: &QuestionnaireFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Items
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state.dimension);
    render_form_items(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, dimension: Dimension) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", WellnessTheme::text()),
        Span::styled(
            format!("{dimension} Assessment"),
            WellnessTheme::title(),
        ),
        Span::styled(
            " │ Over the past week... (0 = never, 3 = almost always)",
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

fn render_form_items(f: &mut Frame, area: Rect, state: &QuestionnaireFormState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(WellnessTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let questions = state.dimension.questions();
    let lines: Vec<Line> = questions
        .iter()
        .enumerate()
        .flat_map(|(i, question)| {
            let is_selected = i == state.selected_item;
            let cursor = if is_selected { "▌ " } else { "  " };
            let value = &state.values[i];

            let value_span = if value.is_empty() {
                Span::styled("[·]", WellnessTheme::text_muted())
            } else {
                Span::styled(format!("[{value}]"), WellnessTheme::text())
            };

            let question_style = if is_selected {
                WellnessTheme::focused()
            } else {
                WellnessTheme::text_secondary()
            };

            [
                Line::from(vec![
                    Span::styled(cursor, WellnessTheme::focused()),
                    value_span,
                    Span::raw(" "),
                    Span::styled(format!("{}. {question}", i + 1), question_style),
                ]),
                Line::from(""),
            ]
        })
        .collect();

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(p, inner);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &QuestionnaireFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", WellnessTheme::danger()),
            Span::styled(err.clone(), WellnessTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", WellnessTheme::key_hint()),
            Span::styled("Navigate ", WellnessTheme::key_desc()),
            Span::styled("[0-3] ", WellnessTheme::key_hint()),
            Span::styled("Answer ", WellnessTheme::key_desc()),
            Span::styled("[Enter] ", WellnessTheme::key_hint()),
            Span::styled("Submit ", WellnessTheme::key_desc()),
            Span::styled("[X] ", WellnessTheme::key_hint()),
            Span::styled("Sample ", WellnessTheme::key_desc()),
            Span::styled("[Esc] ", WellnessTheme::key_hint()),
            Span::styled("Cancel", WellnessTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(WellnessTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_char_accepts_scale_only() {
        let mut form = QuestionnaireFormState::new(Dimension::Stress);
        form.input_char('2');
        assert_eq!(form.values[0], "2");

        form.input_char('7');
        assert_eq!(form.values[0], "2"); // rejected

        form.input_char('a');
        assert_eq!(form.values[0], "2"); // rejected
    }

    #[test]
    fn test_to_answer_set_requires_all_items() {
        let mut form = QuestionnaireFormState::new(Dimension::Anxiety);
        assert!(form.to_answer_set().is_err());

        form.load_sample_data();
        let answers = form.to_answer_set().expect("Sample data is complete");
        assert!(answers.validate().is_ok());
    }

    #[test]
    fn test_clear_sensitive_wipes_values() {
        let mut form = QuestionnaireFormState::new(Dimension::Depression);
        form.load_sample_data();
        form.clear_sensitive();
        assert!(form.values.iter().all(String::is_empty));
        assert_eq!(form.selected_item, 0);
    }
}
