//! Domain error types.
//!
//! Every component validates its inputs at the boundary and reports failures
//! with one of these variants. Generation is pure given a seed, so none of
//! them is worth retrying.

use thiserror::Error;

/// Errors raised by the probability model, the generator and the adaptive
/// simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrtError {
    /// The model tag was not one of `1PL`, `2PL`, `3PL`.
    #[error("invalid model kind '{0}', expected one of 1PL, 2PL, 3PL")]
    InvalidModelKind(String),

    /// A count or item parameter was out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The adaptive loop asked for more items than the pool holds.
    #[error("item pool exhausted: {requested} item(s) requested, {available} available")]
    PoolExhausted { requested: usize, available: usize },
}

impl IrtError {
    /// Shorthand for building an [`IrtError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        IrtError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, IrtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let e = IrtError::invalid("n_items", "must be greater than zero");
        assert_eq!(
            e.to_string(),
            "invalid parameter `n_items`: must be greater than zero"
        );

        let e = IrtError::InvalidModelKind("4PL".into());
        assert!(e.to_string().contains("'4PL'"));

        let e = IrtError::PoolExhausted {
            requested: 25,
            available: 20,
        };
        assert!(e.to_string().contains("25 item(s) requested, 20 available"));
    }
}
