//! Parsing and sanitization of provider output
//!
//! The provider reply is untrusted: records can be missing fields, have
//! wrong types, or carry offsets and scores outside the letter. Each
//! record is parsed field by field and then clamped into the invariants
//! the rest of the system relies on. A bad record is dropped with a
//! warning; only a reply that is not a JSON array at all fails the
//! whole batch.

use crate::error::ExtractionError;
use serde_json::Value;
use tracing::warn;
use vouch_domain::ExperienceDraft;

/// Parse a provider reply into sanitized candidate drafts
///
/// `cover_letter_text` must be the exact text the offsets refer to.
/// The result preserves record order; ranking happens in the caller.
pub fn parse_response(
    cover_letter_text: &str,
    content: &str,
) -> Result<Vec<ExperienceDraft>, ExtractionError> {
    let json_str = strip_code_fence(content);

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractionError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let records = json
        .as_array()
        .ok_or_else(|| ExtractionError::InvalidFormat("Expected a JSON array".to_string()))?;

    let text_len = cover_letter_text.chars().count();
    if text_len == 0 {
        return Ok(Vec::new());
    }

    let mut drafts = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match parse_experience_json(record) {
            Ok(raw) => drafts.push(raw.clamp(text_len)),
            Err(e) => {
                warn!("Dropping experience record {}: {}", index, e);
            }
        }
    }

    Ok(drafts)
}

/// Strip an optional markdown code fence from provider output
fn strip_code_fence(content: &str) -> &str {
    let mut s = content.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    }
    if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// One record as the provider returned it, before sanitization
struct RawExperience {
    title: String,
    start_idx: i64,
    end_idx: i64,
    rank_score: f64,
}

impl RawExperience {
    /// Force offsets and score into range against a letter of
    /// `text_len` characters
    ///
    /// Guarantees `0 <= start_idx < end_idx <= text_len` and a score in
    /// `[0.0, 1.0]`. The span is never widened past the letter and
    /// never collapses to empty. Requires `text_len > 0`.
    fn clamp(self, text_len: usize) -> ExperienceDraft {
        let len = text_len as i64;
        let start_idx = self.start_idx.max(0).min(len - 1);
        let end_idx = self.end_idx.min(len).max(start_idx + 1);

        ExperienceDraft {
            title: self.title,
            start_idx: start_idx as usize,
            end_idx: end_idx as usize,
            rank_score: self.rank_score.clamp(0.0, 1.0),
        }
    }
}

/// Parse a single record from untrusted JSON
fn parse_experience_json(json: &Value) -> Result<RawExperience, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Record is not a JSON object".to_string())?;

    let title = obj
        .get("title")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'title' field".to_string())?
        .to_string();
    if title.is_empty() {
        return Err("Empty 'title' field".to_string());
    }

    let start_idx = obj
        .get("startIdx")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| "Missing or invalid 'startIdx' field".to_string())?;

    let end_idx = obj
        .get("endIdx")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| "Missing or invalid 'endIdx' field".to_string())?;

    let rank_score = obj
        .get("rankScore")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| "Missing or invalid 'rankScore' field".to_string())?;

    Ok(RawExperience {
        title,
        start_idx,
        end_idx,
        rank_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = "Hello world, I led a project and improved sales by 20%.";

    #[test]
    fn test_parse_valid_record() {
        let content = r#"[{"title": "led a project", "startIdx": 12, "endIdx": 25, "rankScore": 0.9}]"#;
        let drafts = parse_response(LETTER, content).unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "led a project");
        assert_eq!(drafts[0].start_idx, 12);
        assert_eq!(drafts[0].end_idx, 25);
        assert_eq!(drafts[0].rank_score, 0.9);
    }

    #[test]
    fn test_parse_with_json_code_fence() {
        let content = "```json\n[{\"title\": \"led a project\", \"startIdx\": 12, \"endIdx\": 25, \"rankScore\": 0.9}]\n```";
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn test_parse_with_bare_code_fence() {
        let content = "```\n[{\"title\": \"led a project\", \"startIdx\": 12, \"endIdx\": 25, \"rankScore\": 0.9}]\n```";
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn test_parse_multiple_records_preserves_order() {
        let content = r#"[
            {"title": "led a project", "startIdx": 15, "endIdx": 28, "rankScore": 0.7},
            {"title": "improved sales", "startIdx": 33, "endIdx": 47, "rankScore": 0.9}
        ]"#;
        let drafts = parse_response(LETTER, content).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "led a project");
        assert_eq!(drafts[1].title, "improved sales");
    }

    #[test]
    fn test_parse_invalid_json_is_an_error() {
        let result = parse_response(LETTER, "not json at all");
        assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_non_array_is_an_error() {
        let result = parse_response(LETTER, r#"{"title": "led a project"}"#);
        assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
    }

    #[test]
    fn test_record_with_missing_field_is_dropped() {
        let content = r#"[{"title": "led a project", "startIdx": 12, "rankScore": 0.9}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_record_with_wrong_type_is_dropped() {
        let content = r#"[{"title": "led a project", "startIdx": "12", "endIdx": 25, "rankScore": 0.9}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_record_with_empty_title_is_dropped() {
        let content = r#"[{"title": "", "startIdx": 12, "endIdx": 25, "rankScore": 0.9}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_bad_record_does_not_abort_the_batch() {
        let content = r#"[
            {"title": "led a project", "startIdx": 15, "endIdx": 28, "rankScore": 0.9},
            {"not": "an experience"},
            {"title": "improved sales", "startIdx": 33, "endIdx": 47, "rankScore": 0.8}
        ]"#;
        let drafts = parse_response(LETTER, content).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "led a project");
        assert_eq!(drafts[1].title, "improved sales");
    }

    #[test]
    fn test_empty_array_yields_no_drafts() {
        let drafts = parse_response(LETTER, "[]").unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_offsets_are_clamped_into_the_letter() {
        let len = LETTER.chars().count();

        // End past the letter is pulled back to the letter length.
        let content = r#"[{"title": "x", "startIdx": 12, "endIdx": 9999, "rankScore": 0.5}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts[0].end_idx, len);

        // Negative start is pulled up to zero.
        let content = r#"[{"title": "x", "startIdx": -5, "endIdx": 10, "rankScore": 0.5}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts[0].start_idx, 0);
        assert_eq!(drafts[0].end_idx, 10);

        // An inverted span still comes out non-empty.
        let content = r#"[{"title": "x", "startIdx": 20, "endIdx": 10, "rankScore": 0.5}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts[0].start_idx, 20);
        assert_eq!(drafts[0].end_idx, 21);

        // A start past the letter leaves the final character as the span.
        let content = r#"[{"title": "x", "startIdx": 9999, "endIdx": 9999, "rankScore": 0.5}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts[0].start_idx, len - 1);
        assert_eq!(drafts[0].end_idx, len);
    }

    #[test]
    fn test_scores_are_clamped_into_unit_range() {
        let content = r#"[
            {"title": "a", "startIdx": 0, "endIdx": 5, "rankScore": 1.7},
            {"title": "b", "startIdx": 0, "endIdx": 5, "rankScore": -0.3}
        ]"#;
        let drafts = parse_response(LETTER, content).unwrap();

        assert_eq!(drafts[0].rank_score, 1.0);
        assert_eq!(drafts[1].rank_score, 0.0);
    }

    #[test]
    fn test_integer_score_is_accepted() {
        let content = r#"[{"title": "x", "startIdx": 0, "endIdx": 5, "rankScore": 1}]"#;
        let drafts = parse_response(LETTER, content).unwrap();
        assert_eq!(drafts[0].rank_score, 1.0);
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        // Four characters, seven bytes before the span.
        let letter = "αβγ led a project here";
        let content = r#"[{"title": "led a project", "startIdx": 4, "endIdx": 17, "rankScore": 0.9}]"#;
        let drafts = parse_response(letter, content).unwrap();

        let chars: Vec<char> = letter.chars().collect();
        let span: String = chars[drafts[0].start_idx..drafts[0].end_idx].iter().collect();
        assert_eq!(span, "led a project");
    }

    #[test]
    fn test_empty_letter_yields_no_drafts() {
        let content = r#"[{"title": "x", "startIdx": 0, "endIdx": 5, "rankScore": 0.5}]"#;
        let drafts = parse_response("", content).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("[]"), "[]");
        assert_eq!(strip_code_fence("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  ```json\n[1, 2]\n```  "), "[1, 2]");
        assert_eq!(strip_code_fence("```json[]```"), "[]");
    }
}
