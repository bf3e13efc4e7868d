//! Prompt construction for experience extraction

use crate::oneshot::OneShotExample;

/// Fixed system framing sent with every extraction request
const SYSTEM_PROMPT: &str = "You are an information extractor that outputs JSON only. \
Locate experience passages in the user's input text and return a JSON array in the requested schema. \
Never add explanations.";

const TASK_DESCRIPTION: &str = r#"[Task description]
You are a recruiting evaluation assistant. From the full cover letter text given as input, semantically locate passages describing experiences worth verifying, and score each one by how complete, concrete, and outcome-oriented it is.

Rules:
- An experience is a contiguous text span in which the applicant personally acted and a result (quantitative or qualitative) is visible.
- Set experience boundaries by meaning, not by sentence or paragraph breaks. The span must still be a contiguous substring of the original text.
- Index convention: 0-based character indexes. endIdx is the position one past the last character of the span, so that slicing the original text with [startIdx, endIdx) reproduces it exactly.
- Output exactly one JSON array and nothing else. Never include code fences (```), prose, markdown, or comments."#;

const TASK_REQUEST: &str = r#"[Task]
Find up to 3 experiences in the [Input cover letter] below and return them as a JSON array.
- rankScore is between 0.0 and 1.0
- Sort the array by rankScore in descending order
- title is a short phrase excerpted verbatim from the original text
- The [Output JSON schema] below describes the format only. Do not copy its values."#;

const OUTPUT_SCHEMA: &str = r#"[Output JSON schema]
[
  {
    "title": "verbatim excerpt",
    "startIdx": 0,
    "endIdx": 0,
    "rankScore": 0.0
  }
]"#;

/// Builds the prompt pair for one extraction call
///
/// The user prompt is assembled from a fixed task description, an
/// optional worked example, the task request, the input letter, and the
/// output schema, in that order.
pub struct PromptBuilder {
    cover_letter_text: String,
    one_shot: Option<OneShotExample>,
}

impl PromptBuilder {
    /// Create a builder for the given cover letter text
    pub fn new(cover_letter_text: String) -> Self {
        Self {
            cover_letter_text,
            one_shot: None,
        }
    }

    /// Include a worked example section in the prompt
    pub fn with_one_shot(mut self, example: OneShotExample) -> Self {
        self.one_shot = Some(example);
        self
    }

    /// The system framing, identical for every request
    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Build the complete user prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(TASK_DESCRIPTION);
        prompt.push_str("\n\n");

        if let Some(example) = &self.one_shot {
            prompt.push_str(&example.render());
            prompt.push('\n');
        }

        prompt.push_str(TASK_REQUEST);
        prompt.push_str("\n\n[Input cover letter]\n");
        prompt.push_str(&self.cover_letter_text);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_SCHEMA);

        prompt
    }
}
