//! Integration tests for `lyric_emotion`.
//
// This suite verifies:
// - Library behavior (lexicon loading, rules, fusion, aggregation) on CSV fixtures
// - CLI behavior including export formats, config overrides and error exits
//
// Notes:
// - CLI tests run the binary with a per-process working directory (no global CWD change).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value as Json;
use tempfile::tempdir;

use lyric_emotion::{
    AnalysisOptions, EMOTIONS, Emotion, EmotionVector, EngineConfig, Lexicon, ProbabilityTable,
    Segment, aggregate, analyze_songs, apply_rules, fuse, load_songs, score_segment, tokenize,
};

// --------------------- helpers ---------------------

const LEXICON: &str = "word,emotion,score\n\
                       happy,joy,0.3\n\
                       happy,joy,0.9\n\
                       joyful,joy,0.8\n\
                       tears,sadness,0.9\n\
                       alone,sadness,0.7 # hand-tuned\n\
                       broken,sadness,n/a\n\
                       fire,anger,0.6\n\
                       fire,trust,0.9\n\
                       scream,fear,0.5\n";

const SONGS: &str = "artist_name,song_name,genres,language,lyrics\n\
                     Ana,Rainy Days,Pop; Ballad,en,\"I am happy\nTears fall and I'm alone\nnot happy, never joyful today\"\n\
                     Bo,Quiet,Rock,en,\n\
                     Cy,Inferno,Rock,en,\"so much fire\nI scream into the fire\"\n";

const PROBS: &str = "text,sadness,joy,love,anger,fear,surprise\n\
                     I am happy,0,1,0,0,0,0\n\
                     Tears fall and I'm alone,0.8,0.05,0.05,0.05,0.05,0\n\
                     \"not happy, never joyful today\",0.6,0.2,0.1,0.05,0.05,0\n\
                     so much fire,0.1,0,0,0.7,0.2,0\n\
                     I scream into the fire,0.1,0,0,0.4,0.5,0\n";

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Write lexicon, songs and probabilities fixtures.
fn fixtures(dir: &assert_fs::TempDir) -> (PathBuf, PathBuf, PathBuf) {
    (
        write_file(dir, "lexicon.csv", LEXICON),
        write_file(dir, "songs.csv", SONGS),
        write_file(dir, "probs.csv", PROBS),
    )
}

fn toks(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("lyric_emotion").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("lyric_emotion").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

/// Find an exported file by name prefix and suffix (the run stamp sits in between).
fn find_with_prefix_suffix(dir: &Path, prefix: &str, suffix: &str) -> PathBuf {
    for entry in fs::read_dir(dir).unwrap().filter_map(|e| e.ok()) {
        let p = entry.path();
        if let Some(name) = p.file_name().and_then(|n| n.to_str()) {
            if name.starts_with(prefix) && name.ends_with(suffix) {
                return p;
            }
        }
    }
    panic!("No file found matching {}*{}", prefix, suffix);
}

// --------------------- library tests ---------------------

#[test]
fn lib_lexicon_from_file_resolves_duplicates_and_skips_bad_rows() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, _, _) = fixtures(&td);
    let lex = Lexicon::load(&lexicon).unwrap();

    assert_eq!(lex.lookup("happy")[Emotion::Joy], 0.9);
    assert_eq!(lex.lookup("alone")[Emotion::Sadness], 0.7);
    assert!(!lex.contains("broken"));
    // out-of-set label "trust" never lands anywhere
    assert_eq!(lex.lookup("fire").sum(), 0.6);
    assert_eq!(lex.lookup("unknown"), EmotionVector::zeros());
}

#[test]
fn lib_negation_window_property() {
    let mut lex = Lexicon::new();
    lex.insert("happy", Emotion::Joy, 0.9);
    lex.insert("joyful", Emotion::Joy, 0.8);
    lex.insert("today", Emotion::Joy, 0.2);

    let tokens = toks(&["not", "happy", "joyful", "today"]);
    let base: Vec<EmotionVector> = tokens.iter().map(|t| lex.lookup(t)).collect();
    let adjusted = apply_rules(&tokens, &base, &EngineConfig::default());

    assert!(adjusted[1][Emotion::Joy] < 0.0);
    assert!(adjusted[2][Emotion::Joy] < 0.0);
    assert!((adjusted[1][Emotion::Joy] - 0.9 * -0.7).abs() < 1e-12);
    assert!((adjusted[2][Emotion::Joy] - 0.8 * -0.7).abs() < 1e-12);
    assert_eq!(adjusted[3][Emotion::Joy], 0.2);
}

#[test]
fn lib_intensifier_scope_property() {
    let mut lex = Lexicon::new();
    lex.insert("sad", Emotion::Sadness, 0.5);
    lex.insert("today", Emotion::Sadness, 0.1);

    let tokens = tokenize("Very sad today");
    assert_eq!(tokens, toks(&["very", "sad", "today"]));
    let base: Vec<EmotionVector> = tokens.iter().map(|t| lex.lookup(t)).collect();
    let adjusted = apply_rules(&tokens, &base, &EngineConfig::default());

    assert_eq!(adjusted[1][Emotion::Sadness], 0.5 * 1.8);
    assert_eq!(adjusted[2][Emotion::Sadness], 0.1);
}

#[test]
fn lib_end_to_end_single_segment() {
    let mut lex = Lexicon::new();
    lex.insert("happy", Emotion::Joy, 1.0);
    let segments = vec![Segment::new("I am happy", EmotionVector::one_hot(Emotion::Joy, 1.0))];

    let imp = aggregate(&segments, &lex, &EngineConfig::default());
    assert_eq!(imp.get(Emotion::Joy, "happy"), 1.0);
    for e in EMOTIONS.into_iter().filter(|e| *e != Emotion::Joy) {
        assert_eq!(imp.get(e, "happy"), 0.0);
    }
}

#[test]
fn lib_every_token_is_on_the_simplex_or_zero() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, _, probs) = fixtures(&td);
    let lex = Lexicon::load(&lexicon).unwrap();
    let table = ProbabilityTable::load(&probs).unwrap();
    let config = EngineConfig::default();

    use lyric_emotion::SegmentClassifier;
    for text in [
        "not happy, never joyful today",
        "so much fire",
        "Tears fall and I'm alone",
        "nothing matches here at all",
    ] {
        let scored = score_segment(&Segment::new(text, table.classify(text)), &lex, &config);
        for v in &scored.scores {
            assert!(v.iter().all(|(_, x)| x >= 0.0));
            assert!(v.is_zero() || (v.sum() - 1.0).abs() < 1e-9, "{text}: {v:?}");
        }
    }
}

#[test]
fn lib_zero_classifier_and_negation_yield_zero_vector() {
    let mut lex = Lexicon::new();
    lex.insert("happy", Emotion::Joy, 1.0);
    let tokens = toks(&["never", "happy"]);
    let base: Vec<EmotionVector> = tokens.iter().map(|t| lex.lookup(t)).collect();
    let adjusted = apply_rules(&tokens, &base, &EngineConfig::default());
    let fused = fuse(&adjusted[1], &EmotionVector::zeros(), 0.7);
    assert_eq!(fused, EmotionVector::zeros());
}

#[test]
fn lib_analyze_songs_from_files() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, songs, probs) = fixtures(&td);
    let lex = Lexicon::load(&lexicon).unwrap();
    let table = ProbabilityTable::load(&probs).unwrap();
    let songs = load_songs(&songs).unwrap();
    let config = EngineConfig::default();

    let run = analyze_songs(&songs, &lex, &table, &config, &AnalysisOptions::default());
    assert_eq!(run.analyses.len(), 2);
    assert_eq!(run.skipped, vec!["Bo - Quiet".to_string()]);

    let rainy = &run.analyses[0];
    assert_eq!(rainy.segments.len(), 3);
    // negated in the third line, so only the first line counts for joy
    assert_eq!(rainy.importance.get(Emotion::Joy, "happy"), 1.0);
    assert!(rainy.importance.get(Emotion::Sadness, "happy") > 0.0);
    for e in EMOTIONS {
        for (w, _) in rainy.importance.words(e) {
            assert!(!config.is_stopword(w), "stopword {w} leaked");
        }
    }
    let labels: Vec<Emotion> = rainy.segments.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![Emotion::Joy, Emotion::Sadness, Emotion::Sadness]);

    let inferno = &run.analyses[1];
    let top_anger = inferno.importance.top_words(Emotion::Anger, 1);
    assert_eq!(top_anger[0].0, "fire");

    let rock = run.genre_stats.counts("Rock").unwrap();
    assert_eq!(rock.total(), 2);
    assert_eq!(run.genre_stats.counts("Ballad").unwrap().total(), 3);
}

#[test]
fn lib_custom_config_changes_results() {
    let mut lex = Lexicon::new();
    lex.insert("happy", Emotion::Joy, 1.0);
    let segments = vec![Segment::new("nah happy baby", EmotionVector::zeros())];

    let mut config = EngineConfig::default();
    config.negators.insert("nah".to_string());
    config.stopwords.insert("baby".to_string());
    let imp = aggregate(&segments, &lex, &config);
    assert_eq!(imp.get(Emotion::Joy, "happy"), 0.0);
    assert!(imp.is_empty());

    let imp_default = aggregate(&segments, &lex, &EngineConfig::default());
    assert_eq!(imp_default.get(Emotion::Joy, "happy"), 1.0);
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_nonexistent_path_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, _, _) = fixtures(&td);
    let bad = td.path().join("does_not_exist_here.csv");
    run_cli_fail_in(
        td.path(),
        &[
            bad.to_string_lossy().as_ref(),
            "--lexicon",
            lexicon.to_str().unwrap(),
        ],
    );
}

#[test]
fn cli_missing_lexicon_column_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    let (_, songs, _) = fixtures(&td);
    let lexicon = write_file(&td, "bad_lexicon.csv", "term,label,value\nhappy,joy,1\n");
    run_cli_fail_in(
        td.path(),
        &[songs.to_str().unwrap(), "--lexicon", lexicon.to_str().unwrap()],
    );
}

#[test]
fn cli_rejects_out_of_range_lambda() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, songs, _) = fixtures(&td);
    run_cli_fail_in(
        td.path(),
        &[
            songs.to_str().unwrap(),
            "--lexicon",
            lexicon.to_str().unwrap(),
            "--lambda",
            "1.5",
        ],
    );
}

#[test]
fn cli_export_json() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, songs, probs) = fixtures(&td);
    let out = td.path().join("out");

    run_cli_ok_in(
        td.path(),
        &[
            songs.to_str().unwrap(),
            "--lexicon",
            lexicon.to_str().unwrap(),
            "--probabilities",
            probs.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ],
    )
    .stdout(predicate::str::contains("Loaded 3 songs"))
    .stdout(predicate::str::contains("Ana - Rainy Days: 3 segments"))
    .stdout(predicate::str::contains("Bo - Quiet: no lyrics, skipped"));

    let report = find_with_prefix_suffix(&out, "Ana_-_Rainy_Days_", "_report.json");
    let v: Json = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(v["song"]["song_name"], "Rainy Days");
    assert_eq!(v["segments"].as_array().unwrap().len(), 3);
    assert_eq!(v["segments"][0]["label"], "joy");
    assert_eq!(v["segments"][0]["segment_index"], 1);
    assert_eq!(v["importance"]["joy"]["happy"].as_f64().unwrap(), 1.0);
    assert!(v["importance"]["sadness"].get("and").is_none());
    assert_eq!(v["report"]["distribution"]["sadness"], 2);

    let genres = find_with_prefix_suffix(&out, "genre_emotion_", ".json");
    let g: Json = serde_json::from_str(&fs::read_to_string(genres).unwrap()).unwrap();
    let rock: HashMap<String, u64> = serde_json::from_value(g["Rock"].clone()).unwrap();
    assert_eq!(rock.values().sum::<u64>(), 2);

    let summary =
        fs::read_to_string(find_with_prefix_suffix(&out, "Ana_-_Rainy_Days_", "_summary.txt"))
            .unwrap();
    assert!(summary.contains("Song: Ana - Rainy Days"));
    assert!(summary.contains("joy → sadness at segment 2"));
}

#[test]
fn cli_export_csv_with_stopwords_file() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, songs, probs) = fixtures(&td);
    let stop = write_file(&td, "stop.txt", "fire\n");

    run_cli_ok_in(
        td.path(),
        &[
            songs.to_str().unwrap(),
            "--lexicon",
            lexicon.to_str().unwrap(),
            "--probabilities",
            probs.to_str().unwrap(),
            "--stopwords",
            stop.to_str().unwrap(),
            "--export-format",
            "csv",
            "--top-k",
            "3",
        ],
    );

    let table = find_with_prefix_suffix(td.path(), "Cy_-_Inferno_", "_importance.csv");
    let content = fs::read_to_string(table).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("emotion,word,score"));
    let rows: Vec<&str> = lines.collect();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| !r.contains(",fire,")));
    let anger_rows = rows.iter().filter(|r| r.starts_with("anger,")).count();
    assert!(anger_rows <= 3);

    let genres = find_with_prefix_suffix(td.path(), "genre_emotion_", ".csv");
    let header = fs::read_to_string(genres).unwrap();
    assert!(header.starts_with("genre,sadness,joy,love,anger,fear,surprise,total"));
}

#[test]
fn cli_config_file_and_stanza_mode() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, _, _) = fixtures(&td);
    let songs = write_file(
        &td,
        "stanzas.csv",
        "artist_name,song_name,lyrics\nDee,Waves,\"happy tears\nalone\n\nscream scream\"\n",
    );
    let config = write_file(&td, "engine.json", r#"{"lambda": 1.0}"#);

    run_cli_ok_in(
        td.path(),
        &[
            songs.to_str().unwrap(),
            "--lexicon",
            lexicon.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--segment-mode",
            "stanza",
        ],
    )
    .stdout(predicate::str::contains("Dee - Waves: 2 segments"));

    let report = find_with_prefix_suffix(td.path(), "Dee_-_Waves_", "_report.json");
    let v: Json = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    // lambda = 1: pure lexicon signal
    assert_eq!(v["importance"]["fear"]["scream"].as_f64().unwrap(), 2.0);
    assert!(v["importance"]["joy"].get("scream").is_none());
}

#[test]
fn cli_reads_directory_of_song_files() {
    let td = assert_fs::TempDir::new().unwrap();
    let (lexicon, _, _) = fixtures(&td);
    let songs_dir = td.child("songs");
    songs_dir.create_dir_all().unwrap();
    songs_dir
        .child("a.csv")
        .write_str("artist_name,song_name,lyrics\nEl,One,happy\n")
        .unwrap();
    songs_dir
        .child("b.csv")
        .write_str("artist_name,song_name,lyrics\nEl,Two,tears\n")
        .unwrap();
    let out = tempdir().unwrap();

    run_cli_ok_in(
        td.path(),
        &[
            songs_dir.path().to_str().unwrap(),
            "--lexicon",
            lexicon.to_str().unwrap(),
            "--out",
            out.path().to_str().unwrap(),
        ],
    )
    .stdout(predicate::str::contains("Loaded 2 songs"))
    .stdout(predicate::str::contains("El - One: 1 segments, dominant joy, top words: happy"))
    .stdout(predicate::str::contains("El - Two: 1 segments, dominant sadness, top words: tears"));
}
