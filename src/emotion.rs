//! Fixed emotion label set and the per-emotion score vector used throughout the engine.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Number of emotion labels.
pub const EMOTION_COUNT: usize = 6;

/// One label of the fixed classification label set.
///
/// Variant order is the order of the classifier's output vector and of every
/// [`EmotionVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emotion {
    Sadness,
    Joy,
    Love,
    Anger,
    Fear,
    Surprise,
}

/// All emotions in vector order.
pub const EMOTIONS: [Emotion; EMOTION_COUNT] = [
    Emotion::Sadness,
    Emotion::Joy,
    Emotion::Love,
    Emotion::Anger,
    Emotion::Fear,
    Emotion::Surprise,
];

impl Emotion {
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Sadness => "sadness",
            Emotion::Joy => "joy",
            Emotion::Love => "love",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
        }
    }

    /// Position of this emotion in an [`EmotionVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive label lookup. Returns `None` for labels outside the set.
    pub fn from_label(label: &str) -> Option<Emotion> {
        let label = label.trim().to_lowercase();
        EMOTIONS.into_iter().find(|e| e.as_str() == label)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::from_label(s).ok_or_else(|| format!("unknown emotion label: {s}"))
    }
}

impl Serialize for Emotion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One real-valued score per emotion, indexed by [`Emotion`].
///
/// Unknown words, empty segments and unsupported tokens are all represented
/// by [`EmotionVector::zeros`], so every emotion can always be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmotionVector([f64; EMOTION_COUNT]);

impl EmotionVector {
    pub const fn zeros() -> Self {
        EmotionVector([0.0; EMOTION_COUNT])
    }

    pub const fn from_array(values: [f64; EMOTION_COUNT]) -> Self {
        EmotionVector(values)
    }

    /// Vector with `value` at `emotion` and zero elsewhere.
    pub fn one_hot(emotion: Emotion, value: f64) -> Self {
        let mut v = Self::zeros();
        v[emotion] = value;
        v
    }

    /// Builds a vector from a slice in emotion order. Returns `None` when the
    /// slice length differs from [`EMOTION_COUNT`].
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let values: [f64; EMOTION_COUNT] = values.try_into().ok()?;
        Some(EmotionVector(values))
    }

    pub fn as_array(&self) -> &[f64; EMOTION_COUNT] {
        &self.0
    }

    /// Pairs of (emotion, score) in emotion order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        EMOTIONS.iter().map(move |&e| (e, self.0[e.index()]))
    }

    /// New vector with `f` applied to every component.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        EmotionVector(self.0.map(f))
    }

    /// New vector with every component multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// New vector with negative components replaced by zero.
    #[must_use]
    pub fn clamped_non_negative(&self) -> Self {
        self.map(|v| v.max(0.0))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Emotion with the highest score; the earliest emotion wins ties.
    pub fn argmax(&self) -> Emotion {
        let mut best = Emotion::Sadness;
        for (e, v) in self.iter() {
            if v > self[best] {
                best = e;
            }
        }
        best
    }

    /// Component-wise sum.
    #[must_use]
    pub fn plus(&self, other: &EmotionVector) -> Self {
        let mut out = *self;
        for (i, v) in out.0.iter_mut().enumerate() {
            *v += other.0[i];
        }
        out
    }
}

impl Index<Emotion> for EmotionVector {
    type Output = f64;

    fn index(&self, emotion: Emotion) -> &f64 {
        &self.0[emotion.index()]
    }
}

impl IndexMut<Emotion> for EmotionVector {
    fn index_mut(&mut self, emotion: Emotion) -> &mut f64 {
        &mut self.0[emotion.index()]
    }
}

impl Serialize for EmotionVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for (e, v) in self.iter() {
            map.serialize_entry(e.as_str(), &v)?;
        }
        map.end()
    }
}
