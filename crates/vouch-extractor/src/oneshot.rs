//! Worked example embedded in extraction prompts
//!
//! The prompt carries one complete input/output pair so the model sees
//! the index convention applied to real text. The expected offsets are
//! derived here by locating anchor substrings in the bundled letter,
//! which keeps the JSON in the prompt consistent with the letter even
//! when the letter text is edited.

use tracing::warn;

/// The cover letter used for the worked example
const EXAMPLE_LETTER: &str = include_str!("example_cover_letter.txt");

/// Anchors for the example passages: title, first and last
/// substring of the span, and the score shown for it.
const EXAMPLE_PASSAGES: [(&str, &str, &str, f64); 3] = [
    (
        "operator of a one-person brand",
        "As the operator of a one-person brand",
        "taking the headline numbers at face value.",
        0.65,
    ),
    (
        "produced social media content",
        "I worked as a content team intern",
        "behind seemingly spontaneous content.",
        0.75,
    ),
    (
        "launched a print brand",
        "After the internship ended I launched a print brand",
        "grew its sales month over month.",
        0.85,
    ),
];

/// A worked extraction example rendered into every prompt
#[derive(Debug, Clone)]
pub struct OneShotExample {
    letter: String,
    passages: Vec<ExamplePassage>,
}

#[derive(Debug, Clone)]
struct ExamplePassage {
    title: &'static str,
    start_idx: usize,
    end_idx: usize,
    rank_score: f64,
}

impl OneShotExample {
    /// Derive the bundled worked example
    ///
    /// Returns `None` when an anchor cannot be located; the caller then
    /// omits the example from its prompts rather than failing.
    pub fn bundled() -> Option<Self> {
        Self::from_letter(EXAMPLE_LETTER)
    }

    fn from_letter(letter: &str) -> Option<Self> {
        let letter = letter.trim_end();
        let mut passages = Vec::with_capacity(EXAMPLE_PASSAGES.len());

        for (title, start_anchor, end_anchor, rank_score) in EXAMPLE_PASSAGES {
            match anchored_range(letter, start_anchor, end_anchor) {
                Some((start_idx, end_idx)) => passages.push(ExamplePassage {
                    title,
                    start_idx,
                    end_idx,
                    rank_score,
                }),
                None => {
                    warn!("Worked example anchor not found, omitting example: {}", start_anchor);
                    return None;
                }
            }
        }

        Some(Self {
            letter: letter.to_string(),
            passages,
        })
    }

    /// Render the example as a prompt section
    pub fn render(&self) -> String {
        let mut section = String::new();
        section.push_str("[Worked example]\n");
        section.push_str(
            "The following shows one input cover letter and the exact output expected for it. \
             Apply the same format and index convention to the real input.\n\n",
        );
        section.push_str("[Example cover letter]\n");
        section.push_str(&self.letter);
        section.push_str("\n\n[Example output]\n[\n");

        for (i, passage) in self.passages.iter().enumerate() {
            section.push_str(&format!(
                "  {{\"title\": \"{}\", \"startIdx\": {}, \"endIdx\": {}, \"rankScore\": {}}}{}\n",
                passage.title,
                passage.start_idx,
                passage.end_idx,
                passage.rank_score,
                if i + 1 < self.passages.len() { "," } else { "" }
            ));
        }

        section.push_str("]\n");
        section
    }
}

/// Locate `[start of start_anchor, end of end_anchor)` as character
/// offsets, searching for the end anchor after the start anchor
fn anchored_range(text: &str, start_anchor: &str, end_anchor: &str) -> Option<(usize, usize)> {
    let start_byte = text.find(start_anchor)?;
    let end_anchor_byte = text[start_byte..]
        .find(end_anchor)
        .map(|offset| start_byte + offset)?;
    let end_byte = end_anchor_byte + end_anchor.len();

    // Offsets in the prompt are character counts, not byte counts.
    let start_idx = text[..start_byte].chars().count();
    let end_idx = text[..end_byte].chars().count();
    Some((start_idx, end_idx))
}
