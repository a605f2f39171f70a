use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::content::Content;
use crate::results::{characters_label, AssessmentReport, SectionReport, SectionResult};
use crate::section::{Section, SectionStatus};
use crate::session::{Outcome, TypingSession};
use crate::time_series::{WpmHistory, DEFAULT_WPM_HISTORY_CAPACITY};
use crate::util::{round_metric, std_dev};

const CHARS_PER_WORD: f64 = 5.0;
/// Elapsed time never counts as less than one second when computing WPM.
const MIN_ELAPSED_MINUTES: f64 = 1.0 / 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub sections: Vec<Section>,
    pub history_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            sections: Section::ALL.to_vec(),
            history_capacity: DEFAULT_WPM_HISTORY_CAPACITY,
        }
    }
}

/// How a character of the current item should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

#[derive(Debug, Clone)]
struct TargetItem {
    text: String,
    chars: Vec<char>,
}

#[derive(Debug, Clone)]
struct SectionTrack {
    section: Section,
    items: Vec<TargetItem>,
    status: SectionStatus,
    result: Option<SectionResult>,
}

impl SectionTrack {
    fn new(section: Section, content: &Content) -> Self {
        let items: Vec<TargetItem> = content
            .items(section)
            .iter()
            .filter(|text| !text.is_empty())
            .map(|text| TargetItem {
                text: text.clone(),
                chars: text.chars().collect(),
            })
            .collect();

        let dropped = content.items(section).len() - items.len();
        if dropped > 0 {
            warn!(%section, dropped, "ignoring empty target items");
        }

        let mut track = Self {
            section,
            items,
            status: SectionStatus::NotStarted,
            result: None,
        };
        track.reset();
        track
    }

    /// Empty sections are complete from the start.
    fn reset(&mut self) {
        if self.items.is_empty() {
            self.status = SectionStatus::Completed;
            self.result = Some(SectionResult::empty());
        } else {
            self.status = SectionStatus::NotStarted;
            self.result = None;
        }
    }
}

/// Turns keystrokes and timer ticks into live typing metrics and one final
/// result per section.
///
/// The engine does no I/O and owns no timer: the host forwards each typed
/// character to [`submit_keystroke`](Self::submit_keystroke) and calls
/// [`tick`](Self::tick) on a fixed interval while a section is active.
#[derive(Debug)]
pub struct TypingMetricsEngine<C: Clock = SystemClock> {
    clock: C,
    tracks: Vec<SectionTrack>,
    active: usize,
    session: TypingSession,
    history: WpmHistory,
}

impl TypingMetricsEngine<SystemClock> {
    pub fn new(content: &Content, options: EngineOptions) -> Self {
        Self::with_clock(content, options, SystemClock)
    }
}

impl<C: Clock> TypingMetricsEngine<C> {
    pub fn with_clock(content: &Content, options: EngineOptions, clock: C) -> Self {
        let mut sections = Section::ordered(&options.sections);
        if sections.is_empty() {
            warn!("no sections selected, assessing all of them");
            sections = Section::ALL.to_vec();
        }

        let tracks = sections
            .into_iter()
            .map(|section| SectionTrack::new(section, content))
            .collect();

        Self {
            clock,
            tracks,
            active: 0,
            session: TypingSession::default(),
            history: WpmHistory::new(options.history_capacity),
        }
    }

    fn track(&self) -> &SectionTrack {
        &self.tracks[self.active]
    }

    pub fn sections(&self) -> Vec<Section> {
        self.tracks.iter().map(|t| t.section).collect()
    }

    pub fn active_section(&self) -> Section {
        self.track().section
    }

    pub fn status(&self) -> SectionStatus {
        self.track().status
    }

    pub fn section_status(&self, section: Section) -> Option<SectionStatus> {
        self.tracks
            .iter()
            .find(|t| t.section == section)
            .map(|t| t.status)
    }

    pub fn is_last_section(&self) -> bool {
        self.active + 1 == self.tracks.len()
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    pub fn wpm_history(&self) -> &WpmHistory {
        &self.history
    }

    pub fn item_count(&self) -> usize {
        self.track().items.len()
    }

    pub fn current_item(&self) -> Option<&str> {
        self.track()
            .items
            .get(self.session.current_item_index)
            .map(|item| item.text.as_str())
    }

    /// Per-character highlighting for the item under the cursor.
    pub fn char_states(&self) -> Vec<(char, CharState)> {
        let Some(item) = self.track().items.get(self.session.current_item_index) else {
            return vec![];
        };

        item.chars
            .iter()
            .enumerate()
            .map(|(idx, &c)| {
                let state = match self.session.item_outcomes.get(idx) {
                    Some(Outcome::Correct) => CharState::Correct,
                    Some(Outcome::Incorrect) => CharState::Incorrect,
                    None if idx == self.session.current_char_index => CharState::Cursor,
                    None => CharState::Pending,
                };
                (c, state)
            })
            .collect()
    }

    /// Feeds one typed character. Ignored when the active section has no
    /// content or is already completed. A wrong character still moves the
    /// cursor forward.
    pub fn submit_keystroke(&mut self, typed: char) {
        let idx = self.active;
        let status = self.tracks[idx].status;
        if self.tracks[idx].items.is_empty() || status == SectionStatus::Completed {
            return;
        }

        if status == SectionStatus::NotStarted {
            self.session.started_at = Some(self.clock.now());
            self.tracks[idx].status = SectionStatus::Active;
            debug!(section = %self.tracks[idx].section, "section started");
        }

        let track = &self.tracks[idx];
        let Some(item) = track.items.get(self.session.current_item_index) else {
            return;
        };
        let Some(&expected) = item.chars.get(self.session.current_char_index) else {
            return;
        };
        let item_len = item.chars.len();
        let item_count = track.items.len();

        let outcome = if typed == expected {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.session.record(outcome);
        self.session.check_counters();

        if self.session.current_char_index == item_len {
            if self.session.current_item_index + 1 < item_count {
                self.session.next_item();
            } else {
                self.finalize_section();
            }
        }
    }

    /// Takes an instantaneous WPM sample. Only has an effect while the
    /// active section is being typed.
    pub fn tick(&mut self) {
        if self.status() != SectionStatus::Active {
            return;
        }
        let wpm = self.wpm_at(self.clock.now());
        self.history.push(wpm);
        trace!(wpm, "wpm sample");
    }

    /// Completes the active section and returns its result. Calling it
    /// again returns the stored result untouched.
    pub fn finalize_section(&mut self) -> &SectionResult {
        let idx = self.active;
        if self.tracks[idx].result.is_none() {
            let result = self.compute_result(self.clock.now());
            debug!(
                section = %self.tracks[idx].section,
                wpm = result.wpm,
                accuracy = result.accuracy,
                consistency = result.consistency,
                time = result.time,
                "section completed"
            );
            self.tracks[idx].status = SectionStatus::Completed;
            self.tracks[idx].result = Some(result);
        }
        self.tracks[idx]
            .result
            .get_or_insert_with(SectionResult::empty)
    }

    /// Moves on to the next section, completing the current one first.
    /// Does nothing on the last section.
    pub fn advance_section(&mut self) {
        if self.is_last_section() {
            return;
        }
        self.finalize_section();
        self.active += 1;
        self.session = TypingSession::default();
        self.history.clear();
        debug!(section = %self.active_section(), "advanced section");
    }

    pub fn all_sections_complete(&self) -> bool {
        self.tracks.iter().all(|t| t.result.is_some())
    }

    /// Throws away all progress and starts again from the first section.
    pub fn restart(&mut self) {
        self.tracks.iter_mut().for_each(SectionTrack::reset);
        self.active = 0;
        self.session = TypingSession::default();
        self.history.clear();
        debug!("assessment restarted");
    }

    pub fn result(&self, section: Section) -> Option<&SectionResult> {
        self.tracks
            .iter()
            .find(|t| t.section == section)
            .and_then(|t| t.result.as_ref())
    }

    /// Results produced so far, in section order.
    pub fn results(&self) -> Vec<SectionReport> {
        self.tracks
            .iter()
            .filter_map(|t| {
                t.result.as_ref().map(|result| SectionReport {
                    section: t.section,
                    result: result.clone(),
                })
            })
            .collect()
    }

    /// The full report, available once every section has a result.
    pub fn report(&self) -> Option<AssessmentReport> {
        self.all_sections_complete()
            .then(|| AssessmentReport::new(self.results()))
    }

    pub fn live_wpm(&self) -> u32 {
        match &self.track().result {
            Some(result) => result.wpm,
            None => self.wpm_at(self.clock.now()),
        }
    }

    pub fn live_accuracy(&self) -> u32 {
        accuracy(self.session.correct_chars, self.session.incorrect_chars)
    }

    fn wpm_at(&self, now: Instant) -> u32 {
        let Some(started_at) = self.session.started_at else {
            return 0;
        };
        let elapsed_ms = now.saturating_duration_since(started_at).as_millis() as f64;
        let minutes = (elapsed_ms / 60_000.0).max(MIN_ELAPSED_MINUTES);
        round_metric(self.session.correct_chars as f64 / CHARS_PER_WORD / minutes)
    }

    fn compute_result(&self, now: Instant) -> SectionResult {
        let s = &self.session;
        let time = s
            .started_at
            .map(|started_at| {
                let ms = now.saturating_duration_since(started_at).as_millis() as f64;
                (ms / 1000.0).round() as u64
            })
            .unwrap_or(0);

        SectionResult {
            wpm: self.wpm_at(now),
            accuracy: accuracy(s.correct_chars, s.incorrect_chars),
            time,
            characters: characters_label(s.correct_chars, s.incorrect_chars),
            consistency: consistency(&self.history),
        }
    }
}

/// Percentage of typed characters that were correct, 0 when nothing was typed.
pub fn accuracy(correct: usize, incorrect: usize) -> u32 {
    let total = correct + incorrect;
    if total == 0 {
        return 0;
    }
    round_metric(100.0 * correct as f64 / total as f64)
}

/// 100 minus the standard deviation of the nonzero WPM samples, floored at
/// 0. Fewer than two nonzero samples score 0.
pub fn consistency(history: &WpmHistory) -> u32 {
    let samples = history.nonzero();
    if samples.len() < 2 {
        return 0;
    }
    match std_dev(&samples) {
        Some(sd) => round_metric(100.0 - sd.min(100.0)),
        None => 0,
    }
}
