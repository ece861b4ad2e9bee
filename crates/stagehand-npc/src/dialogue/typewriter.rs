//! Typewriter text reveal — characters appear over time, skippable

use unicode_segmentation::UnicodeSegmentation;

/// Rate meaning "reveal the whole text immediately".
pub const TYPE_SPEED_INSTANT: f32 = -1.0;

/// Characters revealed per second when nothing else is configured.
pub const DEFAULT_TYPE_SPEED: f32 = 30.0;

/// Incrementally reveals a string at a fixed characters-per-second rate.
///
/// "Characters" are grapheme clusters, so a reveal boundary never splits a
/// combining sequence and the revealed prefix is always valid UTF-8. Reveal
/// progress is monotonic; once complete, further advances are no-ops.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset of the end of each grapheme, in order.
    boundaries: Vec<usize>,
    rate: f32,
    /// Fractional characters accumulated so far.
    progress: f32,
    /// Whole characters currently revealed.
    revealed: usize,
}

impl Typewriter {
    /// Start revealing `text` at `rate` characters per second.
    /// [`TYPE_SPEED_INSTANT`] completes immediately; other non-positive rates
    /// fall back to [`DEFAULT_TYPE_SPEED`].
    pub fn new(text: impl Into<String>, rate: f32) -> Self {
        let text = text.into();
        let boundaries: Vec<usize> = text
            .grapheme_indices(true)
            .map(|(offset, grapheme)| offset + grapheme.len())
            .collect();
        let total = boundaries.len();

        let instant = rate == TYPE_SPEED_INSTANT;
        let (progress, revealed) = if instant {
            (total as f32, total)
        } else {
            (0.0, 0)
        };

        Self {
            text,
            boundaries,
            rate: if rate > 0.0 { rate } else { DEFAULT_TYPE_SPEED },
            progress,
            revealed,
        }
    }

    /// Advance the reveal by `delta` seconds and return the revealed prefix.
    pub fn advance(&mut self, delta: f32) -> &str {
        if !self.is_complete() {
            let total = self.boundaries.len() as f32;
            self.progress = (self.progress + self.rate * delta.max(0.0)).min(total);
            self.revealed = self.progress as usize;
        }
        self.revealed()
    }

    /// Reveal everything and return the full text. Idempotent.
    pub fn skip(&mut self) -> &str {
        self.revealed = self.boundaries.len();
        self.progress = self.revealed as f32;
        &self.text
    }

    /// The currently revealed prefix.
    pub fn revealed(&self) -> &str {
        if self.revealed == 0 {
            ""
        } else {
            &self.text[..self.boundaries[self.revealed - 1]]
        }
    }

    /// Characters revealed so far.
    pub fn revealed_len(&self) -> usize {
        self.revealed
    }

    /// Total characters in the text.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.boundaries.len()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
