#![forbid(unsafe_code)]
//! # Lyric Emotion CLI
//!
//! Command-line interface for the `lyric_emotion` crate. Reads a song table,
//! scores every lyric word against each emotion and exports per-song reports
//! plus genre × emotion statistics.
//!
//! ## Example
//! ```bash
//! cargo run --release -- data/songs.csv --lexicon lexicons/emotion_lexicon.csv \
//!     --probabilities outputs/segment_probs.csv --export-format csv --out outputs
//! ```
//!
//! See `--help` for all available options.

use std::path::{Path, PathBuf};
use std::process;

use chrono::Local;
use clap::Parser;
use log::{error, info};
use lyric_emotion::{
    AnalysisOptions, EngineConfig, ExportFormat, Lexicon, LexiconPrior, ProbabilityTable,
    SegmentClassifier, SegmentMode, Song, analyze_songs, collect_files, export_genre_stats,
    export_song, load_songs, run_stamp,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Song CSV file, or directory of song CSV files
    path: String,

    /// Word-emotion lexicon CSV (word, emotion, score)
    #[arg(long)]
    lexicon: PathBuf,

    /// Precomputed segment classifier output (text + one column per emotion).
    /// Without it, segment probabilities are derived from the lexicon.
    #[arg(long)]
    probabilities: Option<PathBuf>,

    /// JSON file overriding engine settings (trigger words, stopwords, factors, lambda)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// How lyrics are split into segments
    #[arg(long, default_value = "line")]
    segment_mode: SegmentMode,

    /// Weight of the lexicon against the classifier (0..=1); overrides the config file
    #[arg(long)]
    lambda: Option<f64>,

    /// Words per emotion in exported importance tables
    #[arg(long, default_value_t = 40)]
    top_k: usize,

    /// Output format for export (json, csv, tsv)
    #[arg(long, default_value = "json")]
    export_format: ExportFormat,

    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}

fn engine_config(cli: &Cli) -> lyric_emotion::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &cli.stopwords {
        let added = config.extend_stopwords_from_file(path)?;
        info!("Added {} stopwords from {}", added, path.display());
    }
    if let Some(lambda) = cli.lambda {
        config = config.with_lambda(lambda);
    }
    config.validate()?;
    Ok(config)
}

fn load_all_songs(path: &Path) -> lyric_emotion::Result<Vec<Song>> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )
        .into());
    }
    let mut songs = Vec::new();
    for file in collect_files(path) {
        songs.extend(load_songs(&file)?);
    }
    Ok(songs)
}

fn run(cli: &Cli) -> lyric_emotion::Result<()> {
    let config = engine_config(cli)?;
    let lexicon = Lexicon::load(&cli.lexicon)?;
    let songs = load_all_songs(Path::new(&cli.path))?;
    println!("Loaded {} songs from {}", songs.len(), cli.path);

    let table = cli.probabilities.as_ref().map(ProbabilityTable::load).transpose()?;
    let prior = LexiconPrior::new(&lexicon);
    let classifier: &dyn SegmentClassifier = match &table {
        Some(table) => table,
        None => {
            info!("No probability table given, deriving segment probabilities from the lexicon");
            &prior
        }
    };

    let options = AnalysisOptions {
        segment_mode: cli.segment_mode,
        ..AnalysisOptions::default()
    };
    let result = analyze_songs(&songs, &lexicon, classifier, &config, &options);
    let stamp = run_stamp(Local::now());

    for analysis in &result.analyses {
        let dominant = analysis.report.dominant();
        let top: Vec<&str> = dominant
            .and_then(|e| analysis.report.top_words.get(&e))
            .map(|words| words.iter().take(5).map(|(w, _)| w.as_str()).collect())
            .unwrap_or_default();
        println!(
            "{}: {} segments, dominant {}, top words: {}",
            analysis.song.id(),
            analysis.segments.len(),
            dominant.map(|e| e.as_str()).unwrap_or("-"),
            top.join(", ")
        );
        export_song(&cli.out, analysis, cli.export_format, cli.top_k, &stamp)?;
    }
    for id in &result.skipped {
        println!("{id}: no lyrics, skipped");
    }

    let genre_path = export_genre_stats(&cli.out, &result.genre_stats, cli.export_format, &stamp)?;
    info!("Genre statistics written to {}", genre_path.display());
    Ok(())
}
