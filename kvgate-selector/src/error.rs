//! Selector errors.

use thiserror::Error;

/// Errors from parsing or resolving a selector.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector is not a valid expression.
    #[error("invalid selector `{selector}`: {message}")]
    Parse {
        /// The selector as given.
        selector: String,
        /// What is wrong with it.
        message: String,
    },

    /// The selector matched nothing in the payload.
    #[error(
        "unable to retrieve result for {selector}: no match data was found, double check the key or selector"
    )]
    NotFound {
        /// The selector as given.
        selector: String,
    },
}
