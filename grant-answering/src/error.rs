use crate::parse::ParseError;
use llm_service::LlmError;
use profile_store::StoreError;
use thiserror::Error;

/// Everything that can go wrong while answering a question.
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AnswerError {
    /// Systemic misconfiguration that would fail identically for every
    /// question. Fatal errors abort the batch; anything else degrades to a
    /// placeholder answer for the one affected question.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnswerError::Store(StoreError::VectorSizeMismatch { .. })
                | AnswerError::Store(StoreError::Config(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_is_fatal() {
        let err = AnswerError::Store(StoreError::VectorSizeMismatch { got: 384, want: 1536 });
        assert!(err.is_fatal());
    }

    #[test]
    fn transport_failures_are_not_fatal() {
        let err = AnswerError::Store(StoreError::Qdrant("connection refused".into()));
        assert!(!err.is_fatal());
        let err = AnswerError::Parse(ParseError::MissingFence("markdown"));
        assert!(!err.is_fatal());
    }
}
