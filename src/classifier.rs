//! Segment-level emotion probabilities.
//!
//! The neural classifier runs outside this crate. Its output reaches the
//! engine either as a precomputed table ([`ProbabilityTable`]) or, when no
//! table is available, from the lexicon itself ([`LexiconPrior`]).

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::aggregate::Segment;
use crate::emotion::{EMOTIONS, Emotion, EmotionVector};
use crate::error::{Error, Result};
use crate::fusion::normalize;
use crate::lexicon::Lexicon;
use crate::tokenize::tokenize;

/// Anything that turns a lyric segment into one probability per emotion.
pub trait SegmentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> EmotionVector;
}

/// A segment with its probabilities and arg-max label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedSegment {
    /// 1-based position within the song
    pub segment_index: usize,
    #[serde(flatten)]
    pub segment: Segment,
    pub label: Emotion,
}

///Classifies every segment text in order.
pub fn classify_segments<C: SegmentClassifier + ?Sized>(
    texts: &[String],
    classifier: &C,
) -> Vec<ClassifiedSegment> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let probs = classifier.classify(text);
            ClassifiedSegment {
                segment_index: i + 1,
                label: probs.argmax(),
                segment: Segment::new(text.clone(), probs),
            }
        })
        .collect()
}

/// Precomputed classifier output keyed by segment text.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityTable {
    rows: HashMap<String, EmotionVector>,
}

impl ProbabilityTable {
    /// Loads a CSV with a `text` column and one column per emotion label.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(File::open(path)?, path)?;
        info!(
            "Loaded classifier probabilities for {} segments from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::missing_column(name, origin))
        };
        let text_col = position("text")?;
        let emotion_cols = EMOTIONS
            .iter()
            .map(|e| position(e.as_str()))
            .collect::<Result<Vec<usize>>>()?;

        let mut rows = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            let text = record.get(text_col).unwrap_or_default().trim().to_string();
            let mut probs = EmotionVector::zeros();
            for (e, &col) in EMOTIONS.iter().zip(&emotion_cols) {
                let raw = record.get(col).unwrap_or_default().trim();
                probs[*e] = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite())
                    .ok_or_else(|| Error::InvalidProbabilities {
                        text: text.clone(),
                        reason: format!("{} = {raw:?} is not a finite number", e.as_str()),
                    })?;
            }
            rows.insert(text, probs);
        }
        Ok(ProbabilityTable { rows })
    }

    pub fn insert(&mut self, text: &str, probs: EmotionVector) {
        self.rows.insert(text.trim().to_string(), probs);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SegmentClassifier for ProbabilityTable {
    fn classify(&self, text: &str) -> EmotionVector {
        match self.rows.get(text.trim()) {
            Some(probs) => *probs,
            None => {
                debug!("no classifier probabilities for segment {text:?}");
                EmotionVector::zeros()
            }
        }
    }
}

/// Fallback classifier: the normalized sum of the segment's lexicon vectors.
#[derive(Debug, Clone, Copy)]
pub struct LexiconPrior<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> LexiconPrior<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        LexiconPrior { lexicon }
    }
}

impl SegmentClassifier for LexiconPrior<'_> {
    fn classify(&self, text: &str) -> EmotionVector {
        let total = tokenize(text)
            .iter()
            .fold(EmotionVector::zeros(), |acc, t| acc.plus(&self.lexicon.lookup(t)));
        normalize(&total)
    }
}
