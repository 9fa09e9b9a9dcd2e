//! Per-token emotion scoring and per-song aggregation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::emotion::{EMOTIONS, Emotion, EmotionVector};
use crate::fusion::fuse_segment;
use crate::lexicon::Lexicon;
use crate::rules::apply_rules;
use crate::tokenize::tokenize;

/// One unit of lyric text with its classifier probabilities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub probs: EmotionVector,
}

impl Segment {
    pub fn new(text: impl Into<String>, probs: EmotionVector) -> Self {
        Segment {
            text: text.into(),
            probs,
        }
    }
}

/// Tokens of one segment with their normalized emotion distributions, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSegment {
    pub tokens: Vec<String>,
    pub scores: Vec<EmotionVector>,
}

///Tokenizes a segment, looks up, adjusts and fuses every token.
pub fn score_segment(segment: &Segment, lexicon: &Lexicon, config: &EngineConfig) -> ScoredSegment {
    let tokens = tokenize(&segment.text);
    let base: Vec<EmotionVector> = tokens.iter().map(|t| lexicon.lookup(t)).collect();
    let adjusted = apply_rules(&tokens, &base, config);
    let scores = fuse_segment(&adjusted, &segment.probs, config.lambda);
    ScoredSegment { tokens, scores }
}

/// Emotion → word → accumulated score for one song.
///
/// Scores only ever grow; zero contributions are not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SongImportance {
    by_emotion: BTreeMap<Emotion, BTreeMap<String, f64>>,
}

impl SongImportance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `scores` for `word` into every emotion.
    pub fn add(&mut self, word: &str, scores: &EmotionVector) {
        for (e, v) in scores.iter() {
            if v > 0.0 {
                *self
                    .by_emotion
                    .entry(e)
                    .or_default()
                    .entry(word.to_string())
                    .or_insert(0.0) += v;
            }
        }
    }

    ///Folds one scored segment in, skipping stopwords.
    pub fn fold(&mut self, scored: &ScoredSegment, config: &EngineConfig) {
        for (token, scores) in scored.tokens.iter().zip(&scored.scores) {
            if config.is_stopword(token) {
                continue;
            }
            self.add(token, scores);
        }
    }

    /// Accumulated score; 0 for words never seen under `emotion`.
    pub fn get(&self, emotion: Emotion, word: &str) -> f64 {
        self.by_emotion
            .get(&emotion)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(0.0)
    }

    /// All scored words for `emotion`, alphabetically.
    pub fn words(&self, emotion: Emotion) -> impl Iterator<Item = (&str, f64)> {
        self.by_emotion
            .get(&emotion)
            .into_iter()
            .flat_map(|words| words.iter().map(|(w, s)| (w.as_str(), *s)))
    }

    ///Top `k` words for `emotion` by score descending, ties broken alphabetically.
    /// # Example
    /// ```
    /// use lyric_emotion::{Emotion, EmotionVector, SongImportance};
    /// let mut imp = SongImportance::new();
    /// imp.add("tears", &EmotionVector::one_hot(Emotion::Sadness, 0.9));
    /// imp.add("alone", &EmotionVector::one_hot(Emotion::Sadness, 0.9));
    /// imp.add("rain", &EmotionVector::one_hot(Emotion::Sadness, 0.4));
    /// let top = imp.top_words(Emotion::Sadness, 2);
    /// assert_eq!(top, vec![("alone".to_string(), 0.9), ("tears".to_string(), 0.9)]);
    /// ```
    pub fn top_words(&self, emotion: Emotion, k: usize) -> Vec<(String, f64)> {
        let mut sorted: Vec<(String, f64)> = self
            .words(emotion)
            .map(|(w, s)| (w.to_string(), s))
            .collect();
        // BTreeMap order is alphabetical and the sort is stable
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted.truncate(k);
        sorted
    }

    /// Sum of all word scores per emotion.
    pub fn totals(&self) -> EmotionVector {
        let mut out = EmotionVector::zeros();
        for e in EMOTIONS {
            out[e] = self.words(e).map(|(_, s)| s).sum();
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.by_emotion.values().all(|w| w.is_empty())
    }
}

///Builds the song importance map from all segments of one song, in order.
/// # Example
/// ```
/// use lyric_emotion::{aggregate, Emotion, EmotionVector, EngineConfig, Lexicon, Segment};
/// let mut lexicon = Lexicon::new();
/// lexicon.insert("happy", Emotion::Joy, 1.0);
/// let segments = vec![Segment::new("I am happy", EmotionVector::one_hot(Emotion::Joy, 1.0))];
/// let importance = aggregate(&segments, &lexicon, &EngineConfig::default());
/// assert_eq!(importance.get(Emotion::Joy, "happy"), 1.0);
/// ```
pub fn aggregate(segments: &[Segment], lexicon: &Lexicon, config: &EngineConfig) -> SongImportance {
    let mut importance = SongImportance::new();
    for segment in segments {
        importance.fold(&score_segment(segment, lexicon, config), config);
    }
    importance
}
