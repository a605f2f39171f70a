use rand::Rng;
use tracing::debug;

use crate::util::mean;

/// Scores a spoken or written attempt at a practice item, 0 to 100.
///
/// Real scoring lives in an external service; hosts plug it in here.
pub trait Scorer {
    fn score(&mut self, target: &str, attempt: &str) -> u32;
}

impl<F> Scorer for F
where
    F: FnMut(&str, &str) -> u32,
{
    fn score(&mut self, target: &str, attempt: &str) -> u32 {
        self(target, attempt)
    }
}

/// Placeholder scorer handing out a uniform score in 70..=99, whatever the
/// attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomScorer;

impl Scorer for RandomScorer {
    fn score(&mut self, _target: &str, _attempt: &str) -> u32 {
        rand::thread_rng().gen_range(70..100)
    }
}

/// Walks through a list of practice items, keeping the latest score for
/// each one.
pub struct PracticeTracker<S: Scorer> {
    items: Vec<String>,
    scores: Vec<Option<u32>>,
    current: usize,
    scorer: S,
}

impl<S: Scorer> PracticeTracker<S> {
    pub fn new(items: Vec<String>, scorer: S) -> Self {
        let scores = vec![None; items.len()];
        Self {
            items,
            scores,
            current: 0,
            scorer,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> Option<&str> {
        self.items.get(self.current).map(String::as_str)
    }

    pub fn score(&self, idx: usize) -> Option<u32> {
        self.scores.get(idx).copied().flatten()
    }

    /// Scores an attempt at the current item. Retrying replaces the
    /// previous score. Returns `None` when there are no items.
    pub fn submit_attempt(&mut self, attempt: &str) -> Option<u32> {
        let target = self.items.get(self.current)?;
        let score = self.scorer.score(target, attempt).min(100);
        debug!(item = self.current, score, "practice attempt scored");
        self.scores[self.current] = Some(score);
        Some(score)
    }

    /// Returns false when already on the last item.
    pub fn move_to_next_item(&mut self) -> bool {
        if self.current + 1 < self.items.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn is_activity_completed(&self) -> bool {
        !self.items.is_empty() && self.scores.iter().all(Option::is_some)
    }

    /// Mean of the scores given so far.
    pub fn average_score(&self) -> Option<f64> {
        let scored: Vec<f64> = self.scores.iter().flatten().map(|&s| f64::from(s)).collect();
        mean(&scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn exact_match(target: &str, attempt: &str) -> u32 {
        if target.eq_ignore_ascii_case(attempt) {
            100
        } else {
            40
        }
    }

    #[test]
    fn random_scorer_stays_in_stub_range() {
        let mut scorer = RandomScorer;
        for _ in 0..200 {
            let s = scorer.score("hello", "");
            assert!((70..100).contains(&s));
        }
    }

    #[test]
    fn tracker_walks_items_and_completes() {
        let mut t = PracticeTracker::new(items(&["hello", "thank you"]), exact_match);
        assert_eq!(t.current_item(), Some("hello"));
        assert!(!t.is_activity_completed());

        assert_eq!(t.submit_attempt("Hello"), Some(100));
        assert!(t.move_to_next_item());
        assert_eq!(t.submit_attempt("thanks"), Some(40));

        assert!(!t.move_to_next_item());
        assert_eq!(t.current_index(), 1);
        assert!(t.is_activity_completed());
        assert_eq!(t.average_score(), Some(70.0));
    }

    #[test]
    fn retry_replaces_score() {
        let mut t = PracticeTracker::new(items(&["good morning"]), exact_match);
        t.submit_attempt("good mourning");
        assert_eq!(t.score(0), Some(40));
        t.submit_attempt("good morning");
        assert_eq!(t.score(0), Some(100));
    }

    #[test]
    fn scores_are_clamped() {
        let mut t = PracticeTracker::new(items(&["hi"]), |_: &str, _: &str| 250);
        assert_eq!(t.submit_attempt("hi"), Some(100));
    }

    #[test]
    fn empty_tracker_never_completes() {
        let mut t = PracticeTracker::new(vec![], RandomScorer);
        assert_eq!(t.current_item(), None);
        assert_eq!(t.submit_attempt("x"), None);
        assert!(!t.move_to_next_item());
        assert!(!t.is_activity_completed());
        assert_eq!(t.average_score(), None);
    }
}
