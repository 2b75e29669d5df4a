//! Argmax decoding of sequence-model output into a sentence.
//!
//! Pure and stateless: a function of (vocabulary, probabilities) only.
//! Words within a window are joined with single spaces; when chunking
//! produced multiple windows, the per-window sentences are concatenated
//! with a single space, in window order.

use ndarray::{ArrayView1, ArrayView3};

use crate::decoding::vocabulary::Vocabulary;

pub struct Decoder {
    vocabulary: Vocabulary,
}

impl Decoder {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Decodes `(num_windows, timesteps, num_classes)` probabilities into
    /// one space-joined sentence.
    pub fn decode(&self, probs: ArrayView3<'_, f32>) -> String {
        let mut words: Vec<&str> = Vec::with_capacity(probs.shape()[0] * probs.shape()[1]);
        for window in probs.outer_iter() {
            for timestep in window.outer_iter() {
                words.push(self.vocabulary.word(argmax(timestep)));
            }
        }
        words.join(" ")
    }
}

/// Index of the maximum value; ties break to the lowest index.
fn argmax(probs: ArrayView1<'_, f32>) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (i, &v) in probs.iter().enumerate() {
        if v > best_val {
            best = i;
            best_val = v;
        }
    }
    best
}
