// ---------------------------------------------------------------------------
// LineKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Progress,
    Error,
}

// ---------------------------------------------------------------------------
// LineClassifier
// ---------------------------------------------------------------------------

/// Lexical classifier over migration progress text.
///
/// The move backend only reports free-text lines, so success and failure
/// are decided from wording alone. Keeping the predicate behind a trait lets
/// the message format change without touching the retry loop.
pub trait LineClassifier {
    fn classify(&self, line: &str) -> LineKind;

    /// True when `line`, as the final line of a stream, reports completion.
    fn is_success(&self, line: &str) -> bool;
}

// ---------------------------------------------------------------------------
// MarkerClassifier
// ---------------------------------------------------------------------------

/// Substring markers, case-sensitive.
///
/// Any line mentioning `Error` counts as an error, including legitimate
/// messages that merely contain the word.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    pub error_marker: String,
    pub success_marker: String,
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self {
            error_marker: "Error".to_string(),
            success_marker: "moved successfully".to_string(),
        }
    }
}

impl LineClassifier for MarkerClassifier {
    fn classify(&self, line: &str) -> LineKind {
        if line.contains(&self.error_marker) {
            LineKind::Error
        } else {
            LineKind::Progress
        }
    }

    fn is_success(&self, line: &str) -> bool {
        line.contains(&self.success_marker)
    }
}
