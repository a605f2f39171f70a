use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::section::Section;

static CONTENT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets/content");

pub const DEFAULT_PACK: &str = "default";

/// Target text for every section, in typing order. Missing sections are
/// empty and complete immediately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

impl Content {
    pub fn items(&self, section: Section) -> &[String] {
        match section {
            Section::Words => &self.words,
            Section::Sentences => &self.sentences,
            Section::Paragraphs => &self.paragraphs,
        }
    }

    pub fn with_items(mut self, section: Section, items: Vec<String>) -> Self {
        match section {
            Section::Words => self.words = items,
            Section::Sentences => self.sentences = items,
            Section::Paragraphs => self.paragraphs = items,
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Anything able to hand the engine its target text.
pub trait ContentSource {
    fn load(&self) -> Result<Content>;
}

/// Content packs compiled into the binary from `assets/content/<name>.json`.
#[derive(Debug, Clone)]
pub struct BundledContent {
    name: String,
}

impl BundledContent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = CONTENT_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for BundledContent {
    fn default() -> Self {
        Self::new(DEFAULT_PACK)
    }
}

impl ContentSource for BundledContent {
    fn load(&self) -> Result<Content> {
        let file = CONTENT_DIR
            .get_file(format!("{}.json", self.name))
            .ok_or_else(|| Error::ContentNotFound(self.name.clone()))?;
        let json = file
            .contents_utf8()
            .ok_or_else(|| Error::ContentEncoding(self.name.clone()))?;
        Content::from_json(json)
    }
}

/// Content read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    path: PathBuf,
}

impl FileContentSource {
    pub fn new<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ContentSource for FileContentSource {
    fn load(&self) -> Result<Content> {
        let json = fs::read_to_string(&self.path)?;
        Content::from_json(&json)
    }
}

impl ContentSource for Content {
    fn load(&self) -> Result<Content> {
        Ok(self.clone())
    }
}
