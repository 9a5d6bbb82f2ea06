//! Input validation errors.

use thiserror::Error;

/// The export could not be turned into a report.
///
/// Every variant is fatal: the report is aborted before anything is printed.
#[derive(Debug, Error)]
pub enum MalformedInput {
    /// No blank line separates the header from the entry array.
    #[error("missing blank line between header and entries")]
    MissingSeparator,

    /// The entry section is not a JSON array of objects.
    #[error("entries are not a valid JSON array: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// An entry lacks the required `start` field.
    #[error("entry {index} has no start time")]
    MissingStart { index: usize },

    /// An entry timestamp could not be parsed.
    #[error("invalid {field} timestamp '{value}' in entry {index}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        index: usize,
    },

    /// A header directive carries an unparseable timestamp.
    #[error("invalid timestamp '{value}' for {directive}")]
    InvalidDirective {
        directive: &'static str,
        value: String,
    },

    /// An entry ends before it starts.
    #[error("entry {index} ends before it starts")]
    EndBeforeStart { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_error_mentions_entry() {
        let err = MalformedInput::InvalidTimestamp {
            field: "end",
            value: "yesterday".to_string(),
            index: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid end timestamp 'yesterday' in entry 3"
        );
    }

    #[test]
    fn directive_error_names_directive() {
        let err = MalformedInput::InvalidDirective {
            directive: "temp.report.start",
            value: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid timestamp 'soon' for temp.report.start"
        );
    }
}
