//! Writing per-song results and run-level genre statistics to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::ValueEnum;
use log::warn;
use serde::Serialize;

use crate::aggregate::SongImportance;
use crate::classifier::ClassifiedSegment;
use crate::emotion::EMOTIONS;
use crate::error::Result;
use crate::report::{GenreStats, SongReport};
use crate::songs::Song;

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ExportFormat {
    fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Tsv => b'\t',
            _ => b',',
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }
}

/// Everything computed for one song.
#[derive(Debug, Clone, Serialize)]
pub struct SongAnalysis {
    pub song: Song,
    pub segments: Vec<ClassifiedSegment>,
    pub importance: SongImportance,
    pub report: SongReport,
}

/// Timestamp shared by every file written in one run.
pub fn run_stamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

///Neutralizes spreadsheet formulas: a cell starting with `=`, `+`, `-`, `@`, tab or CR
///gets a leading `'`.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

///File-name-safe form of a song id: whitespace and path separators become `_`.
pub fn safe_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

///Writes one song's results into `out_dir` and returns the written paths.
///
///JSON writes `{id}_{stamp}_report.json` with segments, report and the full
///importance map. CSV/TSV write `{id}_{stamp}_importance.{ext}` with the top
///`top_k` words per emotion. Both also write `{id}_{stamp}_summary.txt`.
pub fn export_song(
    out_dir: &Path,
    analysis: &SongAnalysis,
    format: ExportFormat,
    top_k: usize,
    stamp: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let base = format!("{}_{}", safe_file_stem(&analysis.song.id()), stamp);
    let stem = free_stem(out_dir, &base);
    let mut written = Vec::new();

    match format {
        ExportFormat::Json => {
            let path = out_dir.join(format!("{stem}_report.json"));
            fs::write(&path, serde_json::to_string_pretty(analysis)?)?;
            written.push(path);
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let path = out_dir.join(format!("{stem}_importance.{}", format.extension()));
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(format.delimiter())
                .from_path(&path)?;
            wtr.write_record(["emotion", "word", "score"])?;
            for e in EMOTIONS {
                for (word, score) in analysis.importance.top_words(e, top_k) {
                    wtr.write_record([
                        e.as_str().to_string(),
                        csv_safe_cell(word),
                        format!("{score:.6}"),
                    ])?;
                }
            }
            wtr.flush()?;
            written.push(path);
        }
    }

    let summary = out_dir.join(format!("{stem}_summary.txt"));
    fs::write(&summary, analysis.report.prompt_text())?;
    written.push(summary);
    Ok(written)
}

///First of `base`, `base_2`, `base_3`, ... whose summary file is not in `out_dir` yet.
fn free_stem(out_dir: &Path, base: &str) -> String {
    let taken = |stem: &str| out_dir.join(format!("{stem}_summary.txt")).exists();
    if !taken(base) {
        return base.to_string();
    }
    let stem = (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|s| !taken(s))
        .unwrap_or_else(|| base.to_string());
    warn!("{base} already exported in this run, writing {stem} instead");
    stem
}

///Writes the genre × emotion segment counts as `genre_emotion_{stamp}.{ext}`.
pub fn export_genre_stats(
    out_dir: &Path,
    stats: &GenreStats,
    format: ExportFormat,
    stamp: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("genre_emotion_{stamp}.{}", format.extension()));
    match format {
        ExportFormat::Json => {
            fs::write(&path, serde_json::to_string_pretty(stats)?)?;
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(format.delimiter())
                .from_path(&path)?;
            let mut header = vec!["genre".to_string()];
            header.extend(EMOTIONS.iter().map(|e| e.as_str().to_string()));
            header.push("total".to_string());
            wtr.write_record(&header)?;
            for (genre, counts) in stats.iter() {
                let mut row = vec![csv_safe_cell(genre.to_string())];
                row.extend(EMOTIONS.iter().map(|e| counts.get(*e).to_string()));
                row.push(counts.total().to_string());
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(path)
}
