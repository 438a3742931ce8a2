// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The error taxonomy shared by all keymint crates.

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T, E = Error> = ::core::result::Result<T, E>;

/// This type represents all possible errors that can occur in the library.
///
/// Every failure falls into one of four categories, mirroring the taxonomy
/// exposed to callers: argument errors, unsupported algorithm or table
/// entries, semantically disallowed operations, and primitive-level failures.
/// [`Error::name`] returns the stable category tag.
#[derive(Debug, thiserror::Error, strum::IntoStaticStr)]
pub enum Error {
  /// An algorithm name, hash function or multicodec entry is not in the
  /// relevant allow-list.
  #[error("{0}")]
  #[strum(serialize = "NotSupportedError")]
  NotSupported(String),
  /// A correctly typed input that is semantically disallowed, such as the
  /// wrong key type for an operation or a disallowed key operation.
  #[error("{0}")]
  #[strum(serialize = "InvalidAccessError")]
  InvalidAccess(String),
  /// A primitive-level failure, such as an AEAD tag mismatch or an
  /// out-of-bounds derivation length.
  #[error("{0}")]
  #[strum(serialize = "OperationError")]
  Operation(String),
  /// A missing required parameter, a wrong runtime type, or a value outside
  /// the allowed set or numeric range.
  #[error("{0}")]
  #[strum(serialize = "TypeError")]
  Type(String),
}

impl Error {
  /// Creates a [`Error::NotSupported`] error.
  pub fn not_supported(message: impl Into<String>) -> Self {
    Self::NotSupported(message.into())
  }

  /// Creates a [`Error::InvalidAccess`] error.
  pub fn invalid_access(message: impl Into<String>) -> Self {
    Self::InvalidAccess(message.into())
  }

  /// Creates a [`Error::Operation`] error.
  pub fn operation(message: impl Into<String>) -> Self {
    Self::Operation(message.into())
  }

  /// Creates a [`Error::Type`] error.
  pub fn type_error(message: impl Into<String>) -> Self {
    Self::Type(message.into())
  }

  /// Returns the stable name of the error category.
  ///
  /// One of `NotSupportedError`, `InvalidAccessError`, `OperationError` or
  /// `TypeError`.
  pub fn name(&self) -> &'static str {
    self.into()
  }
}

#[cfg(test)]
mod tests {
  use super::Error;

  #[test]
  fn test_error_names() {
    assert_eq!(Error::not_supported("x").name(), "NotSupportedError");
    assert_eq!(Error::invalid_access("x").name(), "InvalidAccessError");
    assert_eq!(Error::operation("x").name(), "OperationError");
    assert_eq!(Error::type_error("x").name(), "TypeError");
  }

  #[test]
  fn test_error_message_passthrough() {
    let error: Error = Error::operation("Wrong tag");
    assert_eq!(error.to_string(), "Wrong tag");
  }
}
