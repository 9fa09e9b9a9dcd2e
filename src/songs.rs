//! Song table loading and lyric segmentation.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, Result};

const REQUIRED_COLUMNS: [&str; 3] = ["artist_name", "song_name", "lyrics"];

/// How lyrics are split into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SegmentMode {
    /// Every non-empty line
    #[default]
    Line,
    /// Blocks separated by a blank line
    Stanza,
}

/// One row of the song table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Song {
    pub artist_name: String,
    pub song_name: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub artist_popularity: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub new_artist_popularity: Option<f64>,
    #[serde(default, skip_serializing)]
    pub lyrics: String,
}

impl Song {
    /// `"{artist} - {song}"`
    pub fn id(&self) -> String {
        format!("{} - {}", self.artist_name, self.song_name)
    }

    pub fn segments(&self, mode: SegmentMode) -> Vec<String> {
        segment_lyrics(&self.lyrics, mode)
    }

    /// Genres split on `;`, or `["(unknown)"]` when there are none.
    pub fn genre_list(&self) -> Vec<String> {
        let genres: Vec<String> = self
            .genres
            .split(';')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect();
        if genres.is_empty() {
            vec!["(unknown)".to_string()]
        } else {
            genres
        }
    }
}

///Loads every song from a CSV file. Lyrics and genres are repaired with [`fix_mojibake`].
pub fn load_songs<P: AsRef<Path>>(path: P) -> Result<Vec<Song>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(File::open(path)?);
    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::missing_column(column, path));
        }
    }

    let mut songs = Vec::new();
    for record in rdr.deserialize::<Song>() {
        let mut song = record?;
        song.lyrics = fix_mojibake(&song.lyrics);
        song.genres = fix_mojibake(&song.genres);
        songs.push(song);
    }
    info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

///Collects the CSV files to read: `path` itself, or every `.csv` below it, sorted.
pub fn collect_files(path: &Path) -> Vec<String> {
    if path.is_file() {
        return vec![path.to_string_lossy().to_string()];
    }
    let mut files: Vec<String> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_string_lossy().to_string())
        .collect();
    files.sort();
    files
}

///Splits lyrics into segments, normalizing `\r\n` and `\r` line endings first.
/// # Example
/// ```
/// use lyric_emotion::{segment_lyrics, SegmentMode};
/// let lyrics = "first line\r\nsecond line\n\n  chorus  \n";
/// assert_eq!(
///     segment_lyrics(lyrics, SegmentMode::Line),
///     vec!["first line", "second line", "chorus"]
/// );
/// assert_eq!(
///     segment_lyrics(lyrics, SegmentMode::Stanza),
///     vec!["first line\nsecond line", "chorus"]
/// );
/// ```
pub fn segment_lyrics(lyrics: &str, mode: SegmentMode) -> Vec<String> {
    let text = lyrics.replace("\r\n", "\n").replace('\r', "\n");
    let pieces: Vec<&str> = match mode {
        SegmentMode::Line => text.split('\n').collect(),
        SegmentMode::Stanza => text.split("\n\n").collect(),
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

///Repairs UTF-8 text that was decoded as Latin-1 ("AxÃ©" -> "Axé").
///Text that does not fit that pattern is returned unchanged.
pub fn fix_mojibake(s: &str) -> String {
    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(c).ok()).collect();
    bytes
        .and_then(|b| String::from_utf8(b).ok())
        .unwrap_or_else(|| s.to_string())
}
