//! Error taxonomy carried by the `Error` event of every stream.
//!
//! Streams in this crate share a single error type, [`RxError`]. Causes
//! produced by sources or by fallible user functions are wrapped in
//! [`RxError::Upstream`]; the remaining variants are raised by the engine
//! itself.
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! let err = RxError::msg("connection reset");
//! assert!(err.is_upstream());
//! assert_eq!(err.to_string(), "upstream failure: connection reset");
//! ```
use std::{fmt::Display, sync::Arc};

/// Errors that can terminate a stream.
///
/// `RxError` is cheap to clone so that hubs can retain a terminal error and
/// replay it to every observer that attaches afterwards.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RxError {
  /// Opaque failure raised by a source or by a user supplied function.
  #[error("upstream failure: {0}")]
  Upstream(Arc<anyhow::Error>),

  /// A single-element expectation completed without seeing any element.
  #[error("sequence contains no elements")]
  EmptySequence,

  /// A single-element expectation saw a second element.
  #[error("sequence contains more than one element")]
  TooManyElements,

  /// `element_at` asked for an index past the end of the sequence.
  #[error("argument out of range: no element at index {0}")]
  ElementOutOfRange(usize),

  /// The operation is not allowed on the target, e.g. ending a relay.
  #[error("invalid operation: {0}")]
  InvalidOperation(String),
}

pub type Result<T, E = RxError> = std::result::Result<T, E>;

impl RxError {
  /// Wrap any error as an upstream failure.
  pub fn upstream(cause: impl Into<anyhow::Error>) -> Self { Self::Upstream(Arc::new(cause.into())) }

  /// Build an upstream failure from a plain message.
  pub fn msg<M>(message: M) -> Self
  where
    M: Display + std::fmt::Debug + Send + Sync + 'static,
  {
    Self::Upstream(Arc::new(anyhow::Error::msg(message)))
  }

  pub fn invalid_operation(reason: impl Into<String>) -> Self {
    Self::InvalidOperation(reason.into())
  }

  pub fn is_upstream(&self) -> bool { matches!(self, Self::Upstream(_)) }

  /// The wrapped cause of an upstream failure.
  pub fn cause(&self) -> Option<&anyhow::Error> {
    match self {
      Self::Upstream(cause) => Some(cause),
      _ => None,
    }
  }
}

// Upstream causes are opaque, two of them are considered equal when they
// render the same message.
impl PartialEq for RxError {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Upstream(a), Self::Upstream(b)) => Arc::ptr_eq(a, b) || a.to_string() == b.to_string(),
      (Self::EmptySequence, Self::EmptySequence) => true,
      (Self::TooManyElements, Self::TooManyElements) => true,
      (Self::ElementOutOfRange(a), Self::ElementOutOfRange(b)) => a == b,
      (Self::InvalidOperation(a), Self::InvalidOperation(b)) => a == b,
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("disk full")]
  struct DiskFull;

  #[test]
  fn upstream_wraps_foreign_errors() {
    let err = RxError::upstream(DiskFull);
    assert!(err.is_upstream());
    assert_eq!(err.to_string(), "upstream failure: disk full");
    assert!(err.cause().is_some_and(|c| c.downcast_ref::<DiskFull>().is_some()));
  }

  #[test]
  fn equality_by_variant_and_message() {
    assert_eq!(RxError::msg("boom"), RxError::msg("boom"));
    assert_ne!(RxError::msg("boom"), RxError::msg("bang"));
    assert_eq!(RxError::EmptySequence, RxError::EmptySequence);
    assert_ne!(RxError::EmptySequence, RxError::TooManyElements);
    assert_eq!(RxError::ElementOutOfRange(3), RxError::ElementOutOfRange(3));
  }

  #[test]
  fn clones_share_the_cause() {
    let err = RxError::msg("shared");
    let copy = err.clone();
    match (&err, &copy) {
      (RxError::Upstream(a), RxError::Upstream(b)) => assert!(Arc::ptr_eq(a, b)),
      _ => unreachable!(),
    }
  }
}
