use std::time::Instant;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Typing state for the section currently being taken.
#[derive(Debug, Clone, Default)]
pub struct TypingSession {
    pub started_at: Option<Instant>,
    // Cursor
    pub current_item_index: usize,
    pub current_char_index: usize,
    // Counters
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub keystrokes: usize,
    /// Outcomes for the item under the cursor, one per typed char.
    pub item_outcomes: Vec<Outcome>,
}

impl TypingSession {
    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn typed_chars(&self) -> usize {
        self.correct_chars + self.incorrect_chars
    }

    pub(crate) fn record(&mut self, outcome: Outcome) {
        self.keystrokes += 1;
        match outcome {
            Outcome::Correct => self.correct_chars += 1,
            Outcome::Incorrect => self.incorrect_chars += 1,
        }
        self.item_outcomes.push(outcome);
        self.current_char_index += 1;
    }

    pub(crate) fn next_item(&mut self) {
        self.current_item_index += 1;
        self.current_char_index = 0;
        self.item_outcomes.clear();
    }

    /// Panics if the counters drifted from the keystrokes that produced them.
    /// Only reachable by mutating the public fields directly.
    pub(crate) fn check_counters(&self) {
        assert!(
            self.typed_chars() <= self.keystrokes,
            "typing counters exceed accepted keystrokes: {} > {}",
            self.typed_chars(),
            self.keystrokes
        );
    }
}
