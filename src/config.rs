//! Engine configuration: trigger words, stopwords and the fusion weight.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

const NEGATORS: &[&str] = &["not", "never", "no", "without", "nothing", "hardly"];
const INTENSIFIERS: &[&str] = &["very", "really", "so", "too", "extremely", "incredibly"];
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "so", "to", "of", "in", "on", "at", "for", "from", "is",
    "are", "am", "was", "were", "be", "been", "i", "you", "we", "they", "he", "she", "it", "me",
    "my", "your", "our", "their", "im", "youre", "dont", "cant", "aint",
];

/// Everything the scoring engine needs besides the lexicon.
///
/// Construct once and share; the engine never mutates it. Every field may be
/// omitted from a JSON config file and then takes its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub negators: HashSet<String>,
    pub intensifiers: HashSet<String>,
    pub stopwords: HashSet<String>,
    /// Multiplier applied to tokens following a negator
    pub negation_factor: f64,
    /// Number of tokens after a negator that are affected
    pub negation_window: usize,
    pub intensifier_factor: f64,
    pub intensifier_window: usize,
    /// Weight of the lexicon signal against the segment classifier (0..=1)
    pub lambda: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            negators: word_set(NEGATORS),
            intensifiers: word_set(INTENSIFIERS),
            stopwords: word_set(STOPWORDS),
            negation_factor: -0.7,
            negation_window: 2,
            intensifier_factor: 1.8,
            intensifier_window: 1,
            lambda: 0.7,
        }
    }
}

impl EngineConfig {
    /// Reads a (partial) JSON config. Word lists are lowercased.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut config: EngineConfig = serde_json::from_str(&raw)?;
        config.negators = lowercase_all(config.negators);
        config.intensifiers = lowercase_all(config.intensifiers);
        config.stopwords = lowercase_all(config.stopwords);
        config.validate()?;
        Ok(config)
    }

    ///Adds stopwords from a plain text file, one word per line.
    pub fn extend_stopwords_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let raw = fs::read_to_string(path)?;
        let before = self.stopwords.len();
        self.stopwords.extend(
            raw.lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty()),
        );
        Ok(self.stopwords.len() - before)
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.lambda) {
            return Err(Error::config(format!(
                "lambda must be within [0, 1], got {}",
                self.lambda
            )));
        }
        if !self.negation_factor.is_finite() || !self.intensifier_factor.is_finite() {
            return Err(Error::config("rule factors must be finite"));
        }
        Ok(())
    }

    pub fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token)
    }

    pub fn is_intensifier(&self, token: &str) -> bool {
        self.intensifiers.contains(token)
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }
}

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn lowercase_all(words: HashSet<String>) -> HashSet<String> {
    words.into_iter().map(|w| w.trim().to_lowercase()).collect()
}
