// Library surface for the typing engine and its collaborators.
// The terminal rendering stays in the binary.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod practice;
pub mod results;
pub mod runtime;
pub mod section;
pub mod session;
pub mod submit;
pub mod time_series;
pub mod util;

pub use engine::{EngineOptions, TypingMetricsEngine};
pub use error::{Error, Result};
pub use results::{AssessmentReport, SectionResult};
pub use section::{Section, SectionStatus};
