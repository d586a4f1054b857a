//! Error types.
//!
//! A single `thiserror`-derived enum covers every failure the workspace can
//! raise.  Caller bugs (`InvalidArgument`, `InvalidTenor`) and queries outside
//! a structure's domain (`OutOfRange`) are kept apart so that callers can
//! recover from the latter by enabling extrapolation.  Optimisation outcomes
//! are never errors; they are reported through `EndCriteriaType`.

use thiserror::Error;

/// The top-level error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Malformed input: negative lengths, undecidable tenor comparisons,
    /// mismatched vector sizes.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A query fell outside the validity domain of a structure and
    /// extrapolation was not permitted.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// A tenor did not produce an end date strictly after its start.
    #[error("invalid tenor: {0}")]
    InvalidTenor(String),

    /// Date-related error.
    #[error("date error: {0}")]
    Date(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// Not implemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_carries_payload() {
        let e = Error::OutOfRange("strike (0.5) is outside the curve domain [1, 2]".into());
        assert_eq!(
            e.to_string(),
            "out of range: strike (0.5) is outside the curve domain [1, 2]"
        );
    }

    #[test]
    fn ensure_maps_to_precondition() {
        fn check(x: i32) -> Result<()> {
            ensure!(x > 0, "x ({x}) must be positive");
            Ok(())
        }
        assert_eq!(
            check(-3),
            Err(Error::Precondition("x (-3) must be positive".into()))
        );
    }
}
