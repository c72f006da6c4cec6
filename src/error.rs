//! Configuration errors raised while constructing terms.
//!
//! Evaluation never fails: once a term is built, residual, Jacobian, and
//! auxiliary evaluations always return a number. Everything that can be
//! wrong with a term is caught here, eagerly, at construction.

use thiserror::Error;

/// Error type for term configuration and construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A required parameter was not supplied.
    #[error("{object}: missing required parameter '{parameter}'")]
    MissingParameter {
        object: &'static str,
        parameter: &'static str,
    },

    /// Parallel list parameters have different lengths.
    #[error("{object}: list lengths must match ('{left}' has {left_len}, '{right}' has {right_len})")]
    LengthMismatch {
        object: &'static str,
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// A scalar parameter is outside its admissible range.
    #[error("{object}: parameter '{parameter}' = {value} is out of range ({expected})")]
    OutOfRange {
        object: &'static str,
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A coupled field name is not known to the host.
    #[error("{object}: unknown field '{name}'")]
    UnknownField { object: &'static str, name: String },

    /// A postprocessor name is not known to the host.
    #[error("{object}: unknown postprocessor '{name}'")]
    UnknownPostprocessor { object: &'static str, name: String },

    /// Any other violated construction invariant.
    #[error("{object}: {message}")]
    Invalid {
        object: &'static str,
        message: String,
    },

    /// The configuration record itself could not be decoded.
    #[error("failed to decode configuration: {0}")]
    Deserialize(String),
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::Invalid`].
    pub fn invalid(object: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            object,
            message: message.into(),
        }
    }

    /// The object (term type) that rejected its configuration, if known.
    pub fn object(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter { object, .. }
            | Self::LengthMismatch { object, .. }
            | Self::OutOfRange { object, .. }
            | Self::UnknownField { object, .. }
            | Self::UnknownPostprocessor { object, .. }
            | Self::Invalid { object, .. } => Some(object),
            Self::Deserialize(_) => None,
        }
    }
}

/// Result alias for construction-time operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = ConfigurationError::LengthMismatch {
            object: "ElectrolyteConductivity",
            left: "ion_conc",
            left_len: 3,
            right: "ion_valence",
            right_len: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("list lengths must match"));
        assert!(msg.contains("ion_conc"));
        assert_eq!(err.object(), Some("ElectrolyteConductivity"));
    }

    #[test]
    fn test_deserialize_has_no_object() {
        let err = ConfigurationError::Deserialize("bad".into());
        assert_eq!(err.object(), None);
    }
}
