// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for key extraction, value resolution, and the sensor tree.
//!
//! All errors use `thiserror`. No error defined here is ever downgraded to a
//! default value inside the crate; substituting a declared default on
//! [`ConfigError::ValueNotFound`] is an explicit caller-side policy (see
//! [`ConfigKey::extract_value_or_default`](crate::domain::ConfigKey::extract_value_or_default)).

use thiserror::Error;

/// The main error type for key extraction and sensor tree operations.
///
/// Marked `#[non_exhaustive]` to allow future additions without breaking
/// backwards compatibility.
///
/// # Examples
///
/// ```
/// use keytree::domain::ConfigError;
///
/// let err = ConfigError::ValueNotFound {
///     key: "server.port".to_string(),
/// };
/// assert_eq!(err.to_string(), "value not found for key: server.port");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required key had no entry in the value table and extraction was
    /// asked for it without a fallback.
    #[error("value not found for key: {key}")]
    ValueNotFound {
        /// The full dotted name of the missing key.
        key: String,
    },

    /// Resolution unwrapped more chained pending/deferred computations than
    /// the configured ceiling allows. Chains of that length are almost always
    /// a value that resolves back into itself.
    #[error("resolution exceeded the maximum depth of {limit} chained computations")]
    ResolutionDepthExceeded {
        /// The configured depth ceiling that was exceeded.
        limit: usize,
    },

    /// A pending computation failed. Execution contexts surface the failure
    /// through this variant and the resolver propagates it unchanged.
    #[error("pending task '{name}' failed: {message}")]
    TaskFailed {
        /// The name of the failed task.
        name: String,
        /// A description of the failure, as reported by the execution context.
        message: String,
    },

    /// A resolved value did not have the type the key declares.
    #[error("type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The key being decoded.
        key: String,
        /// The type the key declares.
        expected: &'static str,
        /// The kind of value actually found.
        found: &'static str,
    },

    /// A sensor tree lookup failed: the path was empty, contained an empty
    /// segment, or some segment had no entry.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The dotted form of the failing path.
        path: String,
    },
}

/// A specialized Result type for this crate's operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
