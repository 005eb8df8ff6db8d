//! JSON extraction utilities for parsing LLM responses.
//!
//! Models asked for "only a JSON array" still sometimes wrap it in a markdown
//! code fence. This module recognizes exactly that convention: a reply whose
//! first non-blank characters are a triple-backtick fence. It is not a markdown
//! parser; any other shape is passed through untouched and left for the JSON
//! parser to accept or reject.
//!
//! # Example
//!
//! ```
//! use quizforge::utils::json_extraction::extract_json_payload;
//!
//! let reply = "```json\n[{\"question\": \"Q ?\"}]\n```";
//! assert_eq!(extract_json_payload(reply), "[{\"question\": \"Q ?\"}]");
//!
//! let bare = "[1, 2, 3]";
//! assert_eq!(extract_json_payload(bare), bare);
//! ```

/// The code fence delimiter.
pub const FENCE: &str = "```";

/// Returns true if the text, ignoring surrounding whitespace, opens with a fence.
pub fn is_fenced(content: &str) -> bool {
    content.trim_start().starts_with(FENCE)
}

/// Extracts the JSON text from a model reply.
///
/// When the reply opens with a fence line (` ``` ` or ` ```json `), that line is
/// dropped and the following lines are kept up to, not including, the next line
/// that starts with a fence. Anything after the closing fence is discarded. If
/// there is no closing fence, every line after the opening fence is kept.
///
/// A reply that does not open with a fence is returned unchanged, which makes
/// the function idempotent on fence-free input.
pub fn extract_json_payload(content: &str) -> String {
    if !is_fenced(content) {
        return content.to_string();
    }

    content
        .trim()
        .lines()
        .skip(1)
        .take_while(|line| !line.starts_with(FENCE))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns at most `max_chars` characters from the start of `content`.
///
/// Cuts on character boundaries, so accented text never splits mid-codepoint.
pub fn preview(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfenced_passthrough() {
        let input = "[{\"question\": \"Q ?\"}]";
        assert_eq!(extract_json_payload(input), input);

        let with_prose = "Voici les questions : [1]";
        assert_eq!(extract_json_payload(with_prose), with_prose);
    }

    #[test]
    fn test_json_fence_is_stripped() {
        let input = "```json\n[\n  {\"a\": 1}\n]\n```";
        assert_eq!(extract_json_payload(input), "[\n  {\"a\": 1}\n]");
    }

    #[test]
    fn test_generic_fence_is_stripped() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(extract_json_payload(input), "[1, 2]");
    }

    #[test]
    fn test_trailing_content_after_close_is_dropped() {
        let input = "```json\n[1]\n```\nJ'espère que ces questions vous plairont !";
        assert_eq!(extract_json_payload(input), "[1]");
    }

    #[test]
    fn test_missing_close_fence_keeps_remaining_lines() {
        let input = "```json\n[1,\n 2]";
        assert_eq!(extract_json_payload(input), "[1,\n 2]");
    }

    #[test]
    fn test_leading_whitespace_before_fence() {
        let input = "\n  ```json\n[1]\n```\n";
        assert_eq!(extract_json_payload(input), "[1]");
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "```json\r\n[1]\r\n```\r\n";
        assert_eq!(extract_json_payload(input), "[1]");
    }

    #[test]
    fn test_idempotent_on_unfenced_input() {
        let samples = [
            "[1, 2, 3]",
            "  [\n {\"question\": \"Qui ?\"}\n]  ",
            "plain text",
            "",
        ];
        for sample in samples {
            let once = extract_json_payload(sample);
            assert_eq!(extract_json_payload(&once), once);
        }
    }

    #[test]
    fn test_extracted_fenced_payload_is_stable() {
        let once = extract_json_payload("```json\n[1]\n```");
        assert_eq!(extract_json_payload(&once), once);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("éèàùç", 3), "éèà");
        assert_eq!(preview("abc", 10), "abc");
        assert_eq!(preview("", 5), "");
    }
}
