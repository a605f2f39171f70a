use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::engine::TypingMetricsEngine;
use crate::section::SectionStatus;
use crate::submit::ResultsSubmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Thin adapter between terminal input and the typing engine. Owns the
/// engine for the lifetime of the screen and hands the finished report to
/// the submitters exactly once per run.
pub struct App<C: Clock = SystemClock> {
    pub engine: TypingMetricsEngine<C>,
    pub state: AppState,
    pub last_error: Option<String>,
    submitters: Vec<Box<dyn ResultsSubmitter>>,
    submitted: bool,
}

impl<C: Clock> App<C> {
    pub fn new(engine: TypingMetricsEngine<C>, submitters: Vec<Box<dyn ResultsSubmitter>>) -> Self {
        let mut app = Self {
            engine,
            state: AppState::Typing,
            last_error: None,
            submitters,
            submitted: false,
        };
        app.settle();
        app
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Typing {
            self.engine.tick();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Action::Quit;
        }

        match self.state {
            AppState::Typing => match key.code {
                KeyCode::Tab => {
                    // skipping the last section ends the run
                    if self.engine.is_last_section() {
                        self.engine.finalize_section();
                    } else {
                        self.engine.advance_section();
                    }
                    self.settle();
                }
                KeyCode::Char(c) => {
                    self.engine.submit_keystroke(c);
                    self.settle();
                }
                _ => {}
            },
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('q') => return Action::Quit,
                _ => {}
            },
        }

        Action::Continue
    }

    pub fn restart(&mut self) {
        self.engine.restart();
        self.state = AppState::Typing;
        self.submitted = false;
        self.last_error = None;
        self.settle();
    }

    /// Skips past finished sections and submits once everything is done.
    fn settle(&mut self) {
        while self.engine.status() == SectionStatus::Completed && !self.engine.is_last_section() {
            self.engine.advance_section();
        }

        if self.engine.all_sections_complete() {
            self.state = AppState::Results;
            self.submit();
        }
    }

    fn submit(&mut self) {
        if self.submitted {
            return;
        }
        let Some(report) = self.engine.report() else {
            return;
        };
        self.submitted = true;
        info!(overall = report.overall, "assessment complete");

        for submitter in self.submitters.iter_mut() {
            if let Err(err) = submitter.submit(&report) {
                warn!(%err, "failed to submit results");
                self.last_error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::content::Content;
    use crate::engine::EngineOptions;
    use crate::error::Result;
    use crate::results::AssessmentReport;
    use crate::section::Section;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<AssessmentReport>>>);

    impl ResultsSubmitter for Recorder {
        fn submit(&mut self, report: &AssessmentReport) -> Result<()> {
            self.0.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(content: Content) -> (App<ManualClock>, Recorder) {
        let engine =
            TypingMetricsEngine::with_clock(&content, EngineOptions::default(), ManualClock::new());
        let recorder = Recorder::default();
        (App::new(engine, vec![Box::new(recorder.clone())]), recorder)
    }

    fn type_str(app: &mut App<ManualClock>, s: &str) {
        for c in s.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn empty_leading_sections_are_skipped() {
        let content = Content::default().with_items(Section::Paragraphs, vec!["Hi.".into()]);
        let (app, _) = app(content);
        assert_eq!(app.engine.active_section(), Section::Paragraphs);
        assert_eq!(app.state, AppState::Typing);
    }

    #[test]
    fn finishing_all_sections_submits_once() {
        let content = Content::default()
            .with_items(Section::Words, vec!["ok".into()])
            .with_items(Section::Sentences, vec!["Go.".into()]);
        let (mut app, recorder) = app(content);

        type_str(&mut app, "ok");
        assert_eq!(app.engine.active_section(), Section::Sentences);
        type_str(&mut app, "Go.");

        assert_eq!(app.state, AppState::Results);
        assert!(app.is_submitted());
        type_str(&mut app, "xyz");
        assert_eq!(recorder.0.borrow().len(), 1);
        assert_eq!(recorder.0.borrow()[0].overall, 66.7);
    }

    #[test]
    fn tab_skips_sections_and_ends_on_last() {
        let content = Content::default()
            .with_items(Section::Words, vec!["one".into()])
            .with_items(Section::Sentences, vec!["Two.".into()]);
        let (mut app, recorder) = app(content);

        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.engine.active_section(), Section::Sentences);
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Results);
        assert_eq!(recorder.0.borrow()[0].overall, 0.0);
    }

    #[test]
    fn restart_allows_a_second_submission() {
        let content = Content::default().with_items(Section::Words, vec!["a".into()]);
        let (mut app, recorder) = app(content);
        type_str(&mut app, "a");
        assert_eq!(app.state, AppState::Results);

        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Typing);
        assert!(!app.is_submitted());
        type_str(&mut app, "a");
        assert_eq!(recorder.0.borrow().len(), 2);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let (mut app, _) = app(Content::default().with_items(Section::Words, vec!["a".into()]));
        assert_eq!(app.on_key(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(app.engine.session().keystrokes, 0);
    }

    #[test]
    fn ticks_only_sample_while_typing() {
        let (mut app, _) = app(Content::default().with_items(Section::Words, vec!["ab".into()]));
        app.on_key(key(KeyCode::Char('a')));
        app.on_tick();
        assert_eq!(app.engine.wpm_history().len(), 1);
    }
}
