use std::fmt;

#[derive(Debug)]
pub enum PerceptionError {
    /// A node handle does not refer to an element in the page tree
    MissingElement { context: String },

    /// A selector string could not be parsed
    SelectorParse { selector: String, reason: String },

    /// A selector expected to match exactly one element matched zero or many
    SelectorNotUnique { selector: String, matches: usize },

    /// Reading a page capture from disk failed
    CaptureIo { path: String, source: std::io::Error },

    /// A page capture did not deserialize into the expected structure
    CaptureFormat { context: String, source: serde_json::Error },
}

impl fmt::Display for PerceptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerceptionError::MissingElement { context } => {
                write!(f, "Node is not an element in this page tree: {}", context)
            }
            PerceptionError::SelectorParse { selector, reason } => {
                write!(f, "Cannot parse selector '{}': {}", selector, reason)
            }
            PerceptionError::SelectorNotUnique { selector, matches } => {
                write!(
                    f,
                    "Selector '{}' expected exactly one match, found {}",
                    selector, matches
                )
            }
            PerceptionError::CaptureIo { path, source } => {
                write!(f, "Failed to read page capture '{}': {}", path, source)
            }
            PerceptionError::CaptureFormat { context, source } => {
                write!(f, "Malformed page capture ({}): {}", context, source)
            }
        }
    }
}

impl std::error::Error for PerceptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PerceptionError::CaptureIo { source, .. } => Some(source),
            PerceptionError::CaptureFormat { source, .. } => Some(source),
            _ => None,
        }
    }
}
