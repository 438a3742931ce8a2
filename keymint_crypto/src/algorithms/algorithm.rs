// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;
use core::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use keymint_core::Error;
use keymint_core::Result;

/// The supported algorithm names in canonical form.
///
/// Lookups are case-insensitive at the API surface; names fold to the
/// canonical casing before any table access.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize, strum::EnumString, strum::IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Algorithm {
  /// ECDSA over secp256k1.
  #[serde(rename = "ECDSA")]
  #[strum(serialize = "ECDSA")]
  Ecdsa,
  /// The JOSE name of ECDSA over secp256k1 with SHA-256.
  #[serde(rename = "ES256K")]
  #[strum(serialize = "ES256K")]
  Es256K,
  /// The Edwards-curve digital signature algorithm.
  #[serde(rename = "EdDSA")]
  #[strum(serialize = "EdDSA")]
  EdDsa,
  /// Elliptic-curve Diffie-Hellman key agreement.
  #[serde(rename = "ECDH")]
  #[strum(serialize = "ECDH")]
  Ecdh,
  /// AES in counter mode with an unspecified key length.
  #[serde(rename = "AES-CTR")]
  #[strum(serialize = "AES-CTR")]
  AesCtr,
  /// AES-128 in counter mode.
  #[serde(rename = "A128CTR")]
  #[strum(serialize = "A128CTR")]
  A128Ctr,
  /// AES-192 in counter mode.
  #[serde(rename = "A192CTR")]
  #[strum(serialize = "A192CTR")]
  A192Ctr,
  /// AES-256 in counter mode.
  #[serde(rename = "A256CTR")]
  #[strum(serialize = "A256CTR")]
  A256Ctr,
  /// PBKDF2 key derivation.
  #[serde(rename = "PBKDF2")]
  #[strum(serialize = "PBKDF2")]
  Pbkdf2,
}

impl Algorithm {
  /// Parses an algorithm name case-insensitively.
  pub fn from_name(name: &str) -> Result<Self> {
    Self::from_str(name).map_err(|_| Error::not_supported(format!("Algorithm not supported: '{name}'")))
  }

  /// Returns the canonical name of the algorithm.
  pub fn name(self) -> &'static str {
    self.into()
  }
}

impl Display for Algorithm {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
