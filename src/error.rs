//! Error types for network construction, loss evaluation and training.

use std::fmt;

/// Result type alias for network operations
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Debug, Clone, PartialEq)]
pub enum NetError {
    /// A constructor argument or hyperparameter is outside its valid range
    InvalidConfiguration {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Input shape does not agree with the stored parameters or with its labels
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// A label does not index a valid class
    LabelOutOfRange {
        index: usize,
        label: usize,
        num_classes: usize,
    },

    /// A dataset or batch has no rows
    EmptyDataset { dataset: String },

    /// A row of class probabilities contains NaN, usually after divergent training
    NonFiniteScores { row: usize },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => write!(
                f,
                "Invalid configuration: {} = {} ({})",
                parameter, value, reason
            ),
            NetError::DimensionMismatch {
                expected,
                got,
                context,
            } => write!(
                f,
                "Dimension mismatch in {}: expected {}, got {}",
                context, expected, got
            ),
            NetError::LabelOutOfRange {
                index,
                label,
                num_classes,
            } => write!(
                f,
                "Label {} at row {} is out of range for {} classes",
                label, index, num_classes
            ),
            NetError::EmptyDataset { dataset } => write!(f, "Empty dataset: {}", dataset),
            NetError::NonFiniteScores { row } => {
                write!(f, "Non-finite class scores at row {}", row)
            }
        }
    }
}

impl std::error::Error for NetError {}

impl NetError {
    pub(crate) fn invalid_config(
        parameter: &str,
        value: impl fmt::Display,
        reason: &str,
    ) -> Self {
        NetError::InvalidConfiguration {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn dimension_mismatch(expected: usize, got: usize, context: &str) -> Self {
        NetError::DimensionMismatch {
            expected,
            got,
            context: context.to_string(),
        }
    }

    pub(crate) fn empty(dataset: &str) -> Self {
        NetError::EmptyDataset {
            dataset: dataset.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = NetError::invalid_config("hidden_size", 0, "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: hidden_size = 0 (must be positive)"
        );

        let err = NetError::LabelOutOfRange {
            index: 3,
            label: 7,
            num_classes: 3,
        };
        assert_eq!(
            err.to_string(),
            "Label 7 at row 3 is out of range for 3 classes"
        );

        let err = NetError::dimension_mismatch(4, 5, "input features");
        assert!(err.to_string().contains("expected 4, got 5"));
    }
}
