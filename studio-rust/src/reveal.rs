//! Cosmetic progressive display of an already complete response.

use async_stream::stream;
use futures::Stream;
use std::time::Duration;

/// The text shown so far. The last frame of a reveal carries the full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    pub text: String,
    pub is_final: bool,
}

/// Reveal `text` one space-separated word at a time, waiting `cadence` before
/// each frame.
///
/// The stream is lazy and finite: it yields exactly one frame per word, and
/// joining the words back with single spaces reproduces `text` byte for byte,
/// so the final frame always equals the input.
pub fn reveal(text: String, cadence: Duration) -> impl Stream<Item = RevealFrame> + Send {
    stream! {
        let words: Vec<&str> = text.split(' ').collect();
        let last = words.len() - 1;
        let mut shown = String::with_capacity(text.len());

        for (index, word) in words.iter().enumerate() {
            if !cadence.is_zero() {
                tokio::time::sleep(cadence).await;
            }
            if index > 0 {
                shown.push(' ');
            }
            shown.push_str(word);
            yield RevealFrame {
                text: shown.clone(),
                is_final: index == last,
            };
        }
    }
}

/// Number of frames [`reveal`] yields for `text`.
#[must_use]
pub fn frame_count(text: &str) -> usize {
    text.split(' ').count()
}
