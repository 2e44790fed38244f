//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::model::ExportedModelAdapter;
use crate::application::AssessmentService;
use crate::domain::{AssessmentData, Dimension};

use super::ui::{
    dashboard::{render_dashboard, DashboardState, SessionSummary},
    questionnaire::{render_questionnaire, QuestionnaireFormState},
    render_disclaimer,
    results::{render_results, ResultsState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Questionnaire,
    Results,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Assessment service
    service: AssessmentService<ExportedModelAdapter>,

    /// Dashboard state
    dashboard_state: DashboardState,

    /// Questionnaire form state
    form_state: QuestionnaireFormState,

    /// Results state
    results_state: ResultsState,

    /// In-memory summary of this session's assessments
    session_summary: SessionSummary,
}

impl App {
    /// Create a new application instance using the default model adapter.
    ///
    /// # Errors
    /// Returns error if the model artifacts cannot be loaded and verified.
    pub fn new() -> Result<Self> {
        let mut engine = ExportedModelAdapter::new();

        // Load artifacts from the configured path (supports deployment flexibility)
        let model_path =
            std::env::var("MINDGAUGE_MODEL_PATH").unwrap_or_else(|_| "models".to_string());
        let model_dir = std::path::Path::new(&model_path);

        if !model_dir.exists() {
            return Err(anyhow!(
                "Model path not found at {:?}. Set MINDGAUGE_MODEL_PATH to a directory containing the exported predictor artifacts.",
                model_dir
            ));
        }

        // Refuse to start if the artifacts cannot be loaded and verified.
        engine
            .load_models(model_dir)
            .map_err(|e| anyhow!("Failed to load models from {:?}: {}", model_dir, e))?;

        let service = AssessmentService::new(Arc::new(engine));
        Ok(Self::with_dependencies(service))
    }

    /// Create application with an injected service (Composition Root pattern).
    ///
    /// This allows `main.rs` or tests to construct the adapter externally.
    #[must_use]
    pub fn with_dependencies(service: AssessmentService<ExportedModelAdapter>) -> Self {
        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            dashboard_state: DashboardState { model_loaded: true },
            form_state: QuestionnaireFormState::new(Dimension::Stress),
            results_state: ResultsState::default(),
            session_summary: SessionSummary::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Draw current screen
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Dashboard => render_dashboard(
                        f,
                        content_area,
                        &self.dashboard_state,
                        self.session_summary,
                    ),
                    Screen::Questionnaire => {
                        render_questionnaire(f, content_area, &self.form_state)
                    }
                    Screen::Results => render_results(f, content_area, &self.results_state),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Questionnaire => self.handle_questionnaire_key(key),
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('s') | KeyCode::Char('S') => self.start_questionnaire(Dimension::Stress),
            KeyCode::Char('a') | KeyCode::Char('A') => self.start_questionnaire(Dimension::Anxiety),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.start_questionnaire(Dimension::Depression)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn start_questionnaire(&mut self, dimension: Dimension) {
        self.form_state = QuestionnaireFormState::new(dimension);
        self.screen = Screen::Questionnaire;
    }

    fn handle_questionnaire_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up => {
                self.form_state.prev_item();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_item();
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.form_state.clear_item();
            }
            KeyCode::Enter => {
                self.submit_questionnaire();
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match &self.results_state {
            ResultsState::Complete { assessment } => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    let dimension = assessment.dimension;
                    self.start_questionnaire(dimension);
                }
                _ => {}
            },
            ResultsState::Error { .. } => match key {
                KeyCode::Enter => {
                    // Answers were kept on failure, so retry lands on a filled form.
                    self.screen = Screen::Questionnaire;
                }
                KeyCode::Esc => {
                    self.form_state.clear_sensitive();
                    self.screen = Screen::Dashboard;
                }
                _ => {}
            },
            ResultsState::Idle => {
                if key == KeyCode::Esc {
                    self.screen = Screen::Dashboard;
                }
            }
        }
    }

    fn submit_questionnaire(&mut self) {
        let answers = match self.form_state.to_answer_set() {
            Ok(answers) => answers,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        let data = AssessmentData::new(self.form_state.dimension, answers);

        match self.service.run_assessment(&data) {
            Ok(assessment) => {
                self.session_summary.record(&assessment);
                self.results_state = ResultsState::Complete { assessment };
                // Clear plaintext answers from the UI immediately.
                self.form_state.clear_sensitive();
            }
            Err(e) => {
                tracing::error!("Assessment failed: {e}");
                self.results_state = ResultsState::Error {
                    message: e.to_string(),
                };
            }
        }

        self.screen = Screen::Results;
    }
}
