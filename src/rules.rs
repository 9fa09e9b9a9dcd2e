//! Negation and intensifier adjustments over a token stream.
//!
//! A negator multiplies the vectors of the next `negation_window` tokens by
//! `negation_factor`; otherwise an intensifier multiplies the next
//! `intensifier_window` tokens by `intensifier_factor`. Windows are clipped at
//! the end of the segment. Triggers are scanned left to right and overlapping
//! windows stack multiplicatively, so a trigger inside an earlier window is
//! itself adjusted and still opens its own window.

use crate::config::EngineConfig;
use crate::emotion::EmotionVector;

/// One multiplier applied to one token position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub trigger: usize,
    pub target: usize,
    pub factor: f64,
}

///Lists the adjustments the tokens trigger, in the order they are applied.
pub fn adjustments(tokens: &[String], config: &EngineConfig) -> Vec<Adjustment> {
    let mut out = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let (window, factor) = if config.is_negator(token) {
            (config.negation_window, config.negation_factor)
        } else if config.is_intensifier(token) {
            (config.intensifier_window, config.intensifier_factor)
        } else {
            continue;
        };
        let end = (i + 1).saturating_add(window).min(tokens.len());
        out.extend((i + 1..end).map(|target| Adjustment {
            trigger: i,
            target,
            factor,
        }));
    }
    out
}

///Applies contextual rules to index-aligned base vectors and returns the adjusted vectors.
///The input vectors are left untouched.
/// # Example
/// ```
/// use lyric_emotion::{apply_rules, Emotion, EmotionVector, EngineConfig};
/// let tokens: Vec<String> = ["very", "sad"].iter().map(|s| s.to_string()).collect();
/// let base = vec![EmotionVector::zeros(), EmotionVector::one_hot(Emotion::Sadness, 0.5)];
/// let adjusted = apply_rules(&tokens, &base, &EngineConfig::default());
/// assert!((adjusted[1][Emotion::Sadness] - 0.9).abs() < 1e-12);
/// ```
pub fn apply_rules(
    tokens: &[String],
    base: &[EmotionVector],
    config: &EngineConfig,
) -> Vec<EmotionVector> {
    debug_assert_eq!(tokens.len(), base.len());
    let mut adjusted = base.to_vec();
    for adj in adjustments(tokens, config) {
        let Some(next) = adjusted.get(adj.target).map(|v| v.scaled(adj.factor)) else {
            continue;
        };
        adjusted[adj.target] = next;
    }
    adjusted
}
