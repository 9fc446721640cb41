//! Error types for parsing and value access.

use thiserror::Error;

/// The first validation failure of a parse pass.
///
/// Parsing stops at the first failure; there is no multi-error accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A value-taking flag was the last token on the command line.
    #[error("must set value for {flag}")]
    MissingValue { flag: String },

    /// Non-flag tokens were given but none are expected.
    #[error("unknown arguments")]
    UnknownArguments,

    /// The number of non-flag tokens differs from the declared count.
    #[error("unknown arguments or exactly {expected} non-flags required")]
    NonFlagCount { expected: usize },

    /// A value-taking flag was given with an empty value (`--name=`).
    #[error("must specify value for {flag}")]
    EmptyValue { flag: String },

    /// A required flag was not given under either spelling.
    #[error("must specify {flag}")]
    MissingRequired { flag: String },
}

impl ParseError {
    /// The flag spelling the error refers to, if any.
    pub fn flag(&self) -> Option<&str> {
        match self {
            Self::MissingValue { flag }
            | Self::EmptyValue { flag }
            | Self::MissingRequired { flag } => Some(flag.as_str()),
            Self::UnknownArguments | Self::NonFlagCount { .. } => None,
        }
    }
}

/// Errors returned by the typed accessors on [`crate::Args`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The requested flag name was empty.
    #[error("flag query empty")]
    EmptyQuery,

    /// Nothing is stored under the requested spelling.
    #[error("{flag} was not specified")]
    NotFound { flag: String },

    /// The stored number does not fit the requested type.
    #[error("{flag} value {value} is out of range for {target}")]
    Range {
        flag: String,
        value: String,
        target: &'static str,
    },

    /// The stored text is not a number of the requested kind.
    #[error("could not convert {flag} value '{value}' to {target}")]
    Conversion {
        flag: String,
        value: String,
        target: &'static str,
    },

    /// A non-flag index past the end of the collected non-flags.
    #[error("non-flag index {index} out of range ({len} collected)")]
    PositionalOutOfRange { index: usize, len: usize },
}

pub type AccessResult<T> = Result<T, AccessError>;
