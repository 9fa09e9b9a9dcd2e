#![forbid(unsafe_code)]
//! # Lyric Emotion
//!
//! Estimates how strongly each word of a song's lyrics contributes to each
//! emotion by fusing a static word-emotion lexicon with per-segment
//! classifier probabilities.
//!
//! Per segment: [`tokenize`] → [`Lexicon::lookup`] → [`apply_rules`]
//! (negators and intensifiers) → [`fuse`] → one distribution per token.
//! [`aggregate`] folds a song's segments into a [`SongImportance`] map.
//!
//! ## Example
//! ```
//! use lyric_emotion::{aggregate, Emotion, EmotionVector, EngineConfig, Lexicon, Segment};
//!
//! let mut lexicon = Lexicon::new();
//! lexicon.insert("tears", Emotion::Sadness, 0.9);
//! let probs = EmotionVector::from_array([0.7, 0.1, 0.1, 0.05, 0.05, 0.0]);
//! let segments = vec![Segment::new("Tears keep falling", probs)];
//!
//! let importance = aggregate(&segments, &lexicon, &EngineConfig::default());
//! assert_eq!(importance.top_words(Emotion::Sadness, 1)[0].0, "tears");
//! ```

use log::warn;
use rayon::prelude::*;

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod emotion;
pub mod error;
pub mod export;
pub mod fusion;
pub mod lexicon;
pub mod report;
pub mod rules;
pub mod songs;
pub mod tokenize;

pub use aggregate::{ScoredSegment, Segment, SongImportance, aggregate, score_segment};
pub use classifier::{
    ClassifiedSegment, LexiconPrior, ProbabilityTable, SegmentClassifier, classify_segments,
};
pub use config::EngineConfig;
pub use emotion::{EMOTION_COUNT, EMOTIONS, Emotion, EmotionVector};
pub use error::{Error, Result};
pub use export::{
    ExportFormat, SongAnalysis, csv_safe_cell, export_genre_stats, export_song, run_stamp,
    safe_file_stem,
};
pub use fusion::{fuse, fuse_segment, normalize};
pub use lexicon::{Lexicon, RowOutcome};
pub use report::{EmotionCounts, GenreStats, SongReport, Transition};
pub use rules::{Adjustment, adjustments, apply_rules};
pub use songs::{SegmentMode, Song, collect_files, fix_mojibake, load_songs, segment_lyrics};
pub use tokenize::tokenize;

/// Options that shape a run but not the scoring itself.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub segment_mode: SegmentMode,
    /// Words per emotion in the narrative summary
    pub summary_top_k: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            segment_mode: SegmentMode::Line,
            summary_top_k: 8,
        }
    }
}

/// Results of a whole run, in input order.
#[derive(Debug, Default)]
pub struct RunResult {
    pub analyses: Vec<SongAnalysis>,
    pub genre_stats: GenreStats,
    /// Ids of songs without any lyric segment
    pub skipped: Vec<String>,
}

///Analyzes one song: segments its lyrics, classifies each segment and
///aggregates word importance. Returns `None` for songs without lyrics.
pub fn analyze_song(
    song: &Song,
    lexicon: &Lexicon,
    classifier: &dyn SegmentClassifier,
    config: &EngineConfig,
    options: &AnalysisOptions,
) -> Option<SongAnalysis> {
    let texts = song.segments(options.segment_mode);
    if texts.is_empty() {
        warn!("{}: no lyrics, skipping", song.id());
        return None;
    }

    let segments = classify_segments(&texts, classifier);
    let plain: Vec<Segment> = segments.iter().map(|s| s.segment.clone()).collect();
    let importance = aggregate(&plain, lexicon, config);
    let report = SongReport::build(&song.id(), &segments, &importance, options.summary_top_k);

    Some(SongAnalysis {
        song: song.clone(),
        segments,
        importance,
        report,
    })
}

///Analyzes songs in parallel. The lexicon, classifier and config are shared read-only;
///genre statistics are folded afterwards in input order.
pub fn analyze_songs(
    songs: &[Song],
    lexicon: &Lexicon,
    classifier: &dyn SegmentClassifier,
    config: &EngineConfig,
    options: &AnalysisOptions,
) -> RunResult {
    let results: Vec<Option<SongAnalysis>> = songs
        .par_iter()
        .map(|song| analyze_song(song, lexicon, classifier, config, options))
        .collect();

    let mut run = RunResult::default();
    for (song, result) in songs.iter().zip(results) {
        match result {
            Some(analysis) => {
                run.genre_stats
                    .record(&song.genre_list(), &analysis.segments);
                run.analyses.push(analysis);
            }
            None => run.skipped.push(song.id()),
        }
    }
    run
}
