//! Word → per-emotion base score table.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::emotion::{Emotion, EmotionVector};
use crate::error::{Error, Result};

/// Static word-emotion lexicon, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, EmotionVector>,
}

/// Why a lexicon row did not contribute a score.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Stored,
    UnparsableScore,
    UnknownEmotion,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a lexicon CSV with `word`, `emotion` and `score` columns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let lexicon = Self::from_reader(file, path)?;
        info!(
            "Loaded lexicon with {} words from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Reads lexicon rows from any CSV source. `origin` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::missing_column(name, origin))
        };
        let word_col = column("word")?;
        let emotion_col = column("emotion")?;
        let score_col = column("score")?;

        let mut lexicon = Lexicon::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let (Some(word), Some(emotion), Some(score)) = (
                record.get(word_col),
                record.get(emotion_col),
                record.get(score_col),
            ) else {
                debug!("lexicon row {}: too few fields, skipped", row + 1);
                continue;
            };
            match lexicon.insert_row(word, emotion, score) {
                RowOutcome::Stored => {}
                other => debug!("lexicon row {}: {:?}, skipped", row + 1, other),
            }
        }
        Ok(lexicon)
    }

    /// Ingests one textual row.
    ///
    /// Only the first whitespace-delimited token of `score` is parsed. A word
    /// with a parsable score gets an entry even when its emotion label is not
    /// one of the fixed set; the score itself is then dropped.
    pub fn insert_row(&mut self, word: &str, emotion: &str, score: &str) -> RowOutcome {
        let Some(score) = parse_score(score) else {
            return RowOutcome::UnparsableScore;
        };
        let entry = self.entries.entry(word.trim().to_lowercase()).or_default();
        match Emotion::from_label(emotion) {
            Some(e) => {
                entry[e] = entry[e].max(score);
                RowOutcome::Stored
            }
            None => RowOutcome::UnknownEmotion,
        }
    }

    /// Stores `score` for (word, emotion), keeping the maximum over duplicates.
    pub fn insert(&mut self, word: &str, emotion: Emotion, score: f64) {
        let entry = self.entries.entry(word.to_lowercase()).or_default();
        entry[emotion] = entry[emotion].max(score);
    }

    /// Base vector for `word`; all-zero for words not in the lexicon.
    pub fn lookup(&self, word: &str) -> EmotionVector {
        self.entries.get(word).copied().unwrap_or_default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_score(raw: &str) -> Option<f64> {
    let token = raw.split_whitespace().next()?;
    token.parse::<f64>().ok().filter(|s| s.is_finite())
}
