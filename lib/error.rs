//! Error type shared by all basis, operator, and many-body constructions.

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Returned when two operands are defined over incompatible bases, e.g.
    /// composing operators whose inner bases differ or projecting with a
    /// subspace that was built from a different parent.
    #[error("basis mismatch in {0}")]
    BasisMismatch(&'static str),

    /// Returned when the shape of a raw array does not agree with the
    /// dimension(s) of the basis it is meant to be indexed by.
    #[error("error in {context}: array shape {found:?} does not match basis dimensions {expected:?}")]
    IncompatibleShape {
        context: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Returned for requests that are inconsistent with themselves, e.g. an
    /// occupation list whose entries do not sum to the declared particle
    /// number.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Returned when an underlying LAPACK routine fails.
    #[error("linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    /// Returned when a parameter file cannot be parsed.
    #[error("error reading parameters: {0}")]
    Config(#[from] toml::de::Error),

    /// Returned when a parameter or output file cannot be opened.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when output arrays cannot be written.
    #[error("error writing arrays: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),
}
pub use SimError::*;
pub type SimResult<T> = Result<T, SimError>;

/// Shorthand for a [`SimError::Configuration`] with a formatted message.
macro_rules! config_err {
    ( $($arg:tt)* ) => {
        $crate::error::SimError::Configuration(format!($($arg)*))
    }
}
pub(crate) use config_err;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn io_message() {
        let err: SimError
            = std::io::Error::new(std::io::ErrorKind::NotFound, "output.npz").into();
        assert!(matches!(err, SimError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: output.npz");
    }
}
