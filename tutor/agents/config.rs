use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tutor_memory_data::DEFAULT_MEMORY_SIZE;

use crate::{feedback::DEFAULT_THRESHOLD, qa::DEFAULT_ANSWER_MAX_CHARS};

/// Errors raised while loading or validating a [`TutorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting is outside its documented range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The file could not be read.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables of the tutoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Records retained per session.
    pub memory_size: usize,
    /// Candidates requested from the retriever.
    pub retrieval_top_k: usize,
    /// Leading candidates handed to the answerer and tutor.
    pub context_k: usize,
    /// Answer truncation limit in characters.
    pub answer_max_chars: usize,
    /// Minimum similarity for a correct answer.
    pub grading_threshold: f64,
    /// Optional JSON-lines log destination.
    pub log_path: Option<PathBuf>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            retrieval_top_k: 5,
            context_k: 3,
            answer_max_chars: DEFAULT_ANSWER_MAX_CHARS,
            grading_threshold: DEFAULT_THRESHOLD,
            log_path: None,
        }
    }
}

impl TutorConfig {
    /// Reads and validates a TOML file. Relative log paths resolve against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&raw)?;
        if let (Some(log_path), Some(dir)) = (&config.log_path, path.parent()) {
            if log_path.is_relative() {
                config.log_path = Some(dir.join(log_path));
            }
        }
        Ok(config)
    }

    /// Parses and validates TOML text. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("memory_size", self.memory_size),
            ("retrieval_top_k", self.retrieval_top_k),
            ("context_k", self.context_k),
            ("answer_max_chars", self.answer_max_chars),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidInput(format!("{key} must be at least 1")));
            }
        }
        if !self.grading_threshold.is_finite() || !(0.0..=1.0).contains(&self.grading_threshold) {
            return Err(ConfigError::InvalidInput(format!(
                "grading_threshold {} must be within [0, 1]",
                self.grading_threshold
            )));
        }
        Ok(())
    }
}
