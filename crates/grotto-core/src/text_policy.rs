//! Shared text rules for wrapping and narration classification.

/// Punctuation allowed to hang one column past the wrap width.
pub const NO_BREAK_PUNCTUATION: &[char] = &['。', '、'];

/// Character that always opens a new scrollback line.
pub const LINE_BREAK: char = '\n';

#[inline]
pub fn is_no_break(c: char, no_break: &[char]) -> bool {
    no_break.contains(&c)
}

/// How a narrator reply ends the current turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NarrationVerdict {
    /// The victory phrase appeared.
    Victory,
    /// No numbered choices were offered.
    NoChoices,
    /// Choices were offered; wait for the player.
    Choices,
}

/// Classifies a narrator reply. The victory phrase wins over choice markers.
pub fn classify_narration(text: &str, victory_phrase: &str, first_choice: char) -> NarrationVerdict {
    if !victory_phrase.is_empty() && text.contains(victory_phrase) {
        NarrationVerdict::Victory
    } else if !text.contains(first_choice) {
        NarrationVerdict::NoChoices
    } else {
        NarrationVerdict::Choices
    }
}
