use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z][a-z']+").unwrap());

///Splits segment text into lowercase word tokens.
///Keeps letters and interior apostrophes, strips leading/trailing apostrophes and
///drops anything of two characters or fewer ("'re", "am", "i").
/// # Example
/// ```
/// use lyric_emotion::tokenize;
/// let tokens = tokenize("I'm NOT gonna cry, 'cause you're gone");
/// assert_eq!(tokens, vec!["i'm", "not", "gonna", "cry", "cause", "you're", "gone"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().trim_matches('\''))
        .filter(|t| t.chars().count() > 2)
        .map(String::from)
        .collect()
}
