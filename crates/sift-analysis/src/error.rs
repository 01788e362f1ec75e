use sift_core::llm::ProviderError;

/// Longest slice of offending content kept in a [`ParseError`].
pub const SNIPPET_LEN: usize = 200;

/// An LLM response that did not decode into the expected shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} (content: {snippet:?})")]
pub struct ParseError {
    pub message: String,
    /// Up to [`SNIPPET_LEN`] characters of the content that failed to parse.
    pub snippet: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, content: &str) -> Self {
        Self {
            message: message.into(),
            snippet: crate::text::truncate_chars(content, SNIPPET_LEN).to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("LLM call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Unparseable LLM response: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_is_capped() {
        let content = "x".repeat(500);
        let err = ParseError::new("bad", &content);
        assert_eq!(err.snippet.chars().count(), SNIPPET_LEN);
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let content = "é".repeat(300);
        let err = ParseError::new("bad", &content);
        assert_eq!(err.snippet.chars().count(), SNIPPET_LEN);
        assert!(err.to_string().starts_with("bad"));
    }
}
