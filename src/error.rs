use thiserror::Error;

/// Errors raised by score aggregation.
///
/// Aggregation is total over numeric input; the only way it can fail is
/// being asked to score a category the rubric table does not know.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("unsupported category: {0}")]
    UnknownCategory(String),
}

/// Errors raised when checking a submitted evaluation against its rubric.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("criterion {0} has no score")]
    MissingCriterion(String),

    #[error("criterion {0} is not part of this rubric")]
    UnexpectedCriterion(String),

    #[error("{value} is not an allowed score for criterion {key}")]
    ValueNotAllowed { key: String, value: f64 },
}
