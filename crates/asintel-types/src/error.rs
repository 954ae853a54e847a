use thiserror::Error;

/// Errors from identifier extraction.
///
/// Malformed rows are deliberately not an error: the extractor skips
/// them and counts them into the batch's rejected-row total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no valid identifiers found in the input")]
    EmptyInput,
}

/// Errors from conversation session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("message is empty after trimming")]
    EmptyMessage,
}

/// Errors from command dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no identifier batch available yet")]
    NoBatchAvailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_display() {
        assert_eq!(
            ExtractError::EmptyInput.to_string(),
            "no valid identifiers found in the input"
        );
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(
            SessionError::EmptyMessage.to_string(),
            "message is empty after trimming"
        );
    }

    #[test]
    fn test_dispatch_error_display() {
        assert_eq!(
            DispatchError::NoBatchAvailable.to_string(),
            "no identifier batch available yet"
        );
    }
}
