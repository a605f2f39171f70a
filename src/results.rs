use serde::{Deserialize, Serialize};

use crate::section::Section;
use crate::util::mean;

/// Final score for one section. Produced once, never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    pub wpm: u32,
    pub accuracy: u32,
    /// Whole seconds between the first keystroke and completion.
    pub time: u64,
    /// `"correct/total/incorrect"`.
    pub characters: String,
    pub consistency: u32,
}

impl SectionResult {
    /// Result of a section that had nothing to type.
    pub fn empty() -> Self {
        Self {
            wpm: 0,
            accuracy: 0,
            time: 0,
            characters: characters_label(0, 0),
            consistency: 0,
        }
    }
}

pub fn characters_label(correct: usize, incorrect: usize) -> String {
    format!("{}/{}/{}", correct, correct + incorrect, incorrect)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: Section,
    #[serde(flatten)]
    pub result: SectionResult,
}

/// Everything handed to a results submitter once all sections are done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub sections: Vec<SectionReport>,
    pub overall: f64,
}

impl AssessmentReport {
    pub fn new(sections: Vec<SectionReport>) -> Self {
        let overall = overall_score(&sections);
        Self { sections, overall }
    }

    pub fn get(&self, section: Section) -> Option<&SectionResult> {
        self.sections
            .iter()
            .find(|r| r.section == section)
            .map(|r| &r.result)
    }
}

/// Mean accuracy across sections, to one decimal place.
fn overall_score(sections: &[SectionReport]) -> f64 {
    let accuracies: Vec<f64> = sections
        .iter()
        .map(|r| f64::from(r.result.accuracy))
        .collect();
    match mean(&accuracies) {
        Some(m) => (m * 10.0).round() / 10.0,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_accuracy(section: Section, accuracy: u32) -> SectionReport {
        SectionReport {
            section,
            result: SectionResult {
                accuracy,
                ..SectionResult::empty()
            },
        }
    }

    #[test]
    fn characters_label_is_correct_total_incorrect() {
        assert_eq!(characters_label(2, 1), "2/3/1");
        assert_eq!(SectionResult::empty().characters, "0/0/0");
    }

    #[test]
    fn overall_is_mean_accuracy_to_one_decimal() {
        let report = AssessmentReport::new(vec![
            with_accuracy(Section::Words, 100),
            with_accuracy(Section::Sentences, 67),
            with_accuracy(Section::Paragraphs, 0),
        ]);
        // (100 + 67 + 0) / 3 = 55.666..
        assert_eq!(report.overall, 55.7);
        assert_eq!(report.get(Section::Sentences).unwrap().accuracy, 67);
    }

    #[test]
    fn overall_of_no_sections_is_zero() {
        assert_eq!(AssessmentReport::new(vec![]).overall, 0.0);
    }

    #[test]
    fn report_json_flattens_results() {
        let report = AssessmentReport::new(vec![with_accuracy(Section::Words, 90)]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["sections"][0]["section"], "words");
        assert_eq!(json["sections"][0]["accuracy"], 90);
        assert_eq!(json["sections"][0]["characters"], "0/0/0");
        assert_eq!(json["overall"], 90.0);

        let back: AssessmentReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
