// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! A lookup miss is not an error: it is reported as [`Resource::Unset`] or as
//! `Ok(None)`. [`ResourceError`] covers bad arguments, malformed trees, and
//! converter failures.
//!
//! [`Resource::Unset`]: crate::Resource::Unset

use alloc::string::String;

use crate::key::ResourceKey;

/// Errors reported by resource lookups and resource streams.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// An entry point was given an argument it cannot work with, such as an
    /// empty resource key or an empty theme identity.
    ///
    /// Reported before any traversal begins.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the rejected argument.
        argument: &'static str,
        /// Why the argument was rejected.
        reason: &'static str,
    },
    /// The styling-parent chain loops back on itself.
    ///
    /// Only the lookup that hit the cycle fails.
    #[error("styling parent cycle detected after visiting {visited} nodes")]
    CycleDetected {
        /// Number of distinct nodes visited before the cycle closed.
        visited: usize,
    },
    /// A stream converter rejected a resolved value.
    #[error("converter failed for resource `{key}`")]
    ConverterFailure {
        /// Key of the stream whose converter failed.
        key: ResourceKey,
        /// The converter's own error.
        source: ConvertError,
    },
}

/// Error returned by a stream converter.
///
/// ```rust
/// use understory_resource::ConvertError;
///
/// let err = ConvertError::new("expected a color");
/// assert_eq!(err.message(), "expected a color");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    /// Creates a converter error with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
