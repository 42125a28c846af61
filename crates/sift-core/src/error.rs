use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("phrase index {index} out of range (phrase bank has {len} entries)")]
    PhraseIndexOutOfRange { index: usize, len: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,
}

impl Error {
    /// Returns `true` for unknown ids and out-of-range phrase indices.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PhraseIndexOutOfRange { .. })
    }

    /// Returns `true` when the caller supplied an unusable request.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` for failures raised while loading data files.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Serialization(_) | Self::InvalidData(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let unknown = Error::NotFound {
            entity: "track",
            id: "42".to_string(),
        };
        let out_of_range = Error::PhraseIndexOutOfRange { index: 9, len: 3 };

        assert!(unknown.is_not_found());
        assert!(out_of_range.is_not_found());
        assert!(!Error::DegenerateVector.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = Error::DimensionMismatch {
            expected: 512,
            actual: 4,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 512, got 4");

        let err = Error::NotFound {
            entity: "track",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "not found: track with id abc");
    }

    #[test]
    fn test_load_error_classification() {
        assert!(Error::InvalidData("bad".to_string()).is_load_error());
        assert!(!Error::InvalidArgument("bad".to_string()).is_load_error());
        assert!(Error::InvalidArgument("bad".to_string()).is_invalid_argument());
    }
}
