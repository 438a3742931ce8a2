// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Supported values for the JSON Web Key `key_ops` property.
///
/// [More Info](https://www.rfc-editor.org/rfc/rfc7517.html#section-4.3)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum JwkOperation {
  /// Compute digital signature or MAC.
  #[serde(rename = "sign")]
  Sign,
  /// Verify digital signature or MAC.
  #[serde(rename = "verify")]
  Verify,
  /// Encrypt content.
  #[serde(rename = "encrypt")]
  Encrypt,
  /// Decrypt content and validate decryption, if applicable.
  #[serde(rename = "decrypt")]
  Decrypt,
  /// Encrypt key.
  #[serde(rename = "wrapKey")]
  WrapKey,
  /// Decrypt key and validate decryption, if applicable.
  #[serde(rename = "unwrapKey")]
  UnwrapKey,
  /// Derive key.
  #[serde(rename = "deriveKey")]
  DeriveKey,
  /// Derive bits not to be used as a key.
  #[serde(rename = "deriveBits")]
  DeriveBits,
}

impl JwkOperation {
  /// Returns the key operation as a `str` slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Sign => "sign",
      Self::Verify => "verify",
      Self::Encrypt => "encrypt",
      Self::Decrypt => "decrypt",
      Self::WrapKey => "wrapKey",
      Self::UnwrapKey => "unwrapKey",
      Self::DeriveKey => "deriveKey",
      Self::DeriveBits => "deriveBits",
    }
  }
}

impl Display for JwkOperation {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
