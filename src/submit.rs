use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::results::AssessmentReport;
use crate::section::Section;

/// Receives the final report once every section has been completed.
pub trait ResultsSubmitter {
    fn submit(&mut self, report: &AssessmentReport) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct LogRow<'a> {
    date: String,
    section: Section,
    wpm: u32,
    accuracy: u32,
    time: u64,
    characters: &'a str,
    consistency: u32,
    overall: f64,
}

/// Appends one row per section to a CSV log.
#[derive(Debug, Clone)]
pub struct CsvLogSubmitter {
    path: PathBuf,
}

impl CsvLogSubmitter {
    pub fn new<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ResultsSubmitter for CsvLogSubmitter {
    fn submit(&mut self, report: &AssessmentReport) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        let date = Local::now().format("%c").to_string();
        for entry in &report.sections {
            writer.serialize(LogRow {
                date: date.clone(),
                section: entry.section,
                wpm: entry.result.wpm,
                accuracy: entry.result.accuracy,
                time: entry.result.time,
                characters: &entry.result.characters,
                consistency: entry.result.consistency,
                overall: report.overall,
            })?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), overall = report.overall, "results logged");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SubmittedReport<'a> {
    submitted_at: DateTime<Local>,
    #[serde(flatten)]
    report: &'a AssessmentReport,
}

/// Writes the report as pretty JSON, replacing any previous file.
#[derive(Debug, Clone)]
pub struct JsonReportSubmitter {
    path: PathBuf,
}

impl JsonReportSubmitter {
    pub fn new<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ResultsSubmitter for JsonReportSubmitter {
    fn submit(&mut self, report: &AssessmentReport) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&SubmittedReport {
            submitted_at: Local::now(),
            report,
        })?;
        fs::write(&self.path, data)?;

        info!(path = %self.path.display(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{SectionReport, SectionResult};
    use tempfile::tempdir;

    fn report() -> AssessmentReport {
        AssessmentReport::new(vec![
            SectionReport {
                section: Section::Words,
                result: SectionResult {
                    wpm: 42,
                    accuracy: 96,
                    time: 31,
                    characters: "48/50/2".into(),
                    consistency: 81,
                },
            },
            SectionReport {
                section: Section::Sentences,
                result: SectionResult::empty(),
            },
        ])
    }

    #[test]
    fn csv_log_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("results.csv");
        let mut submitter = CsvLogSubmitter::new(&path);

        submitter.submit(&report()).unwrap();
        submitter.submit(&report()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "date,section,wpm,accuracy,time,characters,consistency,overall"
        );
        assert_eq!(lines.iter().filter(|l| l.starts_with("date,")).count(), 1);
        assert!(lines[1].ends_with(",words,42,96,31,48/50/2,81,48.0"));
        assert!(lines[2].ends_with(",sentences,0,0,0,0/0/0,0,48.0"));
    }

    #[test]
    fn json_report_contains_sections_and_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        JsonReportSubmitter::new(&path).submit(&report()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["submitted_at"].is_string());
        assert_eq!(json["overall"], 48.0);
        assert_eq!(json["sections"][0]["section"], "words");
        assert_eq!(json["sections"][0]["characters"], "48/50/2");
        assert_eq!(json["sections"][1]["wpm"], 0);

        let back: AssessmentReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report());
    }
}
