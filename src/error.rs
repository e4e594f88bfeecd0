//! Error types for unparsing and profile construction.
//!
//! Every failure falls into one of three categories:
//!
//! - [`UnparseError::UnsupportedEmulation`]: the target dialect has neither
//!   native syntax nor an emulation rule for a call.
//! - [`UnparseError::Configuration`]: an unknown product, version or profile
//!   override was requested.
//! - [`UnparseError::InternalConsistency`]: the engine itself misbehaved
//!   (unbalanced frames, a claimed rule that is missing). Never caused by
//!   user input.

use std::fmt;

/// Error returned by [`crate::unparse`] and friends.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnparseError {
    #[error("{operator} is not supported by {dialect}: {reason}")]
    UnsupportedEmulation {
        operator: String,
        dialect: &'static str,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

impl UnparseError {
    /// Build an [`UnparseError::UnsupportedEmulation`].
    pub fn unsupported(
        operator: impl Into<String>,
        dialect: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        UnparseError::UnsupportedEmulation {
            operator: operator.into(),
            dialect,
            reason: reason.into(),
        }
    }

    /// Build an [`UnparseError::InternalConsistency`].
    pub fn internal(msg: impl Into<String>) -> Self {
        UnparseError::InternalConsistency(msg.into())
    }

    /// Which of the three error categories this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            UnparseError::UnsupportedEmulation { .. } => ErrorCategory::UnsupportedEmulation,
            UnparseError::Configuration(_) => ErrorCategory::Configuration,
            UnparseError::InternalConsistency(_) => ErrorCategory::InternalConsistency,
        }
    }
}

/// Coarse error category, for callers that only branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    UnsupportedEmulation,
    Configuration,
    InternalConsistency,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::UnsupportedEmulation => "unsupported emulation",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::InternalConsistency => "internal consistency",
        };
        f.write_str(s)
    }
}

/// Error raised while constructing a [`crate::DialectProfile`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown database product: {0}")]
    UnknownProduct(String),

    #[error("invalid version {0:?} (expected MAJOR or MAJOR.MINOR)")]
    InvalidVersion(String),

    #[error("{product} {version} is older than the oldest supported version {minimum}")]
    UnsupportedVersion {
        product: &'static str,
        version: String,
        minimum: String,
    },

    #[error("invalid identifier quote: {0:?}")]
    InvalidQuote(String),

    #[error("invalid identifier casing: {0:?}")]
    InvalidCasing(String),

    #[error("invalid null collation: {0:?}")]
    InvalidNullCollation(String),

    #[error("unknown data type: {0:?}")]
    UnknownType(String),

    #[error("unknown feature: {0:?}")]
    UnknownFeature(String),

    #[error("invalid numeric scale range: min {min} is greater than max {max}")]
    InvalidScaleRange { min: i64, max: i64 },
}
