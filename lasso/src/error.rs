use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LassoError {
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("index {index} out of range for {len} selections")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid permutation: {0:?}")]
    InvalidPermutation(Vec<usize>),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl LassoError {
    /// Stable snake_case code for result envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            LassoError::InvalidPolygon(_) => "invalid_polygon",
            LassoError::LengthMismatch { .. } => "length_mismatch",
            LassoError::IndexOutOfRange { .. } => "index_out_of_range",
            LassoError::NotFound(_) => "not_found",
            LassoError::InvalidPermutation(_) => "invalid_permutation",
            LassoError::InvalidSnapshot(_) => "invalid_snapshot",
        }
    }
}

pub type Result<T> = std::result::Result<T, LassoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_messages() {
        let e = LassoError::LengthMismatch { expected: 5, got: 4 };
        assert_eq!(e.code(), "length_mismatch");
        assert_eq!(e.to_string(), "length mismatch: expected 5, got 4");
        assert_eq!(LassoError::InvalidPermutation(vec![0, 0]).code(), "invalid_permutation");
    }
}
