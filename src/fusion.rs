//! Fusion of lexicon and classifier signal into one distribution per token.

use crate::emotion::{EMOTIONS, EmotionVector};

/// Combines a token's adjusted lexicon vector with its segment's classifier
/// probabilities and normalizes the result.
///
/// Each component is `max(0, lambda * lexicon + (1 - lambda) * segment)`.
/// The output sums to 1, or is all-zero when no emotion has positive support.
///
/// # Example
/// ```
/// use lyric_emotion::{fuse, Emotion, EmotionVector};
/// let lexicon = EmotionVector::one_hot(Emotion::Joy, 1.0);
/// let segment = EmotionVector::one_hot(Emotion::Joy, 1.0);
/// let fused = fuse(&lexicon, &segment, 0.7);
/// assert_eq!(fused, EmotionVector::one_hot(Emotion::Joy, 1.0));
/// ```
pub fn fuse(adjusted: &EmotionVector, segment: &EmotionVector, lambda: f64) -> EmotionVector {
    let mut combined = EmotionVector::zeros();
    for e in EMOTIONS {
        combined[e] = (lambda * adjusted[e] + (1.0 - lambda) * segment[e]).max(0.0);
    }
    normalize(&combined)
}

/// Scales a non-negative vector to sum to 1. A zero-sum vector comes back all-zero.
pub fn normalize(v: &EmotionVector) -> EmotionVector {
    let v = v.clamped_non_negative();
    let total = v.sum();
    if total == 0.0 {
        return EmotionVector::zeros();
    }
    v.map(|x| x / total)
}

/// Fuses every token of one segment against the segment's probabilities.
pub fn fuse_segment(
    adjusted: &[EmotionVector],
    segment: &EmotionVector,
    lambda: f64,
) -> Vec<EmotionVector> {
    adjusted.iter().map(|v| fuse(v, segment, lambda)).collect()
}
