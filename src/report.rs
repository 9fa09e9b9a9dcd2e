//! Song-level summary statistics and the genre × emotion table.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::aggregate::SongImportance;
use crate::classifier::ClassifiedSegment;
use crate::emotion::{EMOTION_COUNT, EMOTIONS, Emotion};

/// Segment count per emotion label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionCounts([usize; EMOTION_COUNT]);

impl EmotionCounts {
    pub fn add(&mut self, emotion: Emotion) {
        self.0[emotion.index()] += 1;
    }

    pub fn get(&self, emotion: Emotion) -> usize {
        self.0[emotion.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Most frequent label; earliest emotion wins ties. `None` when empty.
    pub fn dominant(&self) -> Option<Emotion> {
        if self.total() == 0 {
            return None;
        }
        let mut best = EMOTIONS[0];
        for e in EMOTIONS {
            if self.get(e) > self.get(best) {
                best = e;
            }
        }
        Some(best)
    }
}

impl Serialize for EmotionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for e in EMOTIONS {
            map.serialize_entry(e.as_str(), &self.get(e))?;
        }
        map.end()
    }
}

/// A change of segment label between consecutive segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Emotion,
    pub to: Emotion,
    pub segment_index: usize,
}

/// Statistics handed to the narrative generator for one song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongReport {
    pub song_id: String,
    pub segment_count: usize,
    pub distribution: EmotionCounts,
    pub transitions: Vec<Transition>,
    pub top_words: BTreeMap<Emotion, Vec<(String, f64)>>,
}

impl SongReport {
    pub fn build(
        song_id: &str,
        segments: &[ClassifiedSegment],
        importance: &SongImportance,
        top_k: usize,
    ) -> Self {
        let mut distribution = EmotionCounts::default();
        for seg in segments {
            distribution.add(seg.label);
        }

        let transitions = segments
            .windows(2)
            .filter(|pair| pair[0].label != pair[1].label)
            .map(|pair| Transition {
                from: pair[0].label,
                to: pair[1].label,
                segment_index: pair[1].segment_index,
            })
            .collect();

        let top_words = EMOTIONS
            .into_iter()
            .map(|e| (e, importance.top_words(e, top_k)))
            .filter(|(_, words)| !words.is_empty())
            .collect();

        SongReport {
            song_id: song_id.to_string(),
            segment_count: segments.len(),
            distribution,
            transitions,
            top_words,
        }
    }

    pub fn dominant(&self) -> Option<Emotion> {
        self.distribution.dominant()
    }

    /// Renders the statistics as the plain-text brief for summary generation.
    pub fn prompt_text(&self) -> String {
        let dist = EMOTIONS
            .iter()
            .map(|e| {
                format!(
                    "{}: {}/{} segments",
                    e,
                    self.distribution.get(*e),
                    self.segment_count
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let transitions = if self.transitions.is_empty() {
            "No major emotion changes detected.".to_string()
        } else {
            self.transitions
                .iter()
                .map(|t| format!("{} → {} at segment {}", t.from, t.to, t.segment_index))
                .collect::<Vec<_>>()
                .join("; ")
        };

        let words = self
            .top_words
            .iter()
            .map(|(e, words)| {
                let words: Vec<&str> = words.iter().map(|(w, _)| w.as_str()).collect();
                format!("{e}: {}\n", words.join(", "))
            })
            .collect::<String>();

        format!(
            "Song: {}\n\n\
             Emotion distribution (segment counts):\n{dist}\n\n\
             Emotion transitions:\n{transitions}\n\n\
             Top emotion-weighted words per emotion:\n{words}",
            self.song_id
        )
    }
}

/// Segment label counts per genre across a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenreStats {
    genres: BTreeMap<String, EmotionCounts>,
}

impl GenreStats {
    pub fn new() -> Self {
        Self::default()
    }

    ///Counts every segment label once for each of the song's genres.
    pub fn record(&mut self, genres: &[String], segments: &[ClassifiedSegment]) {
        for genre in genres {
            let counts = self.genres.entry(genre.clone()).or_default();
            for seg in segments {
                counts.add(seg.label);
            }
        }
    }

    pub fn counts(&self, genre: &str) -> Option<&EmotionCounts> {
        self.genres.get(genre)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmotionCounts)> {
        self.genres.iter().map(|(g, c)| (g.as_str(), c))
    }

    ///Genres with the most segments, ties broken by name.
    pub fn top_genres(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted: Vec<(String, usize)> = self
            .genres
            .iter()
            .map(|(g, c)| (g.clone(), c.total()))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}
