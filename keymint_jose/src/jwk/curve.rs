// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Display;
use core::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Supported Elliptic Curves.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-key-elliptic-curve)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum EcCurve {
  /// P-256 Curve.
  #[serde(rename = "P-256")]
  P256,
  /// P-384 Curve.
  #[serde(rename = "P-384")]
  P384,
  /// P-521 Curve.
  #[serde(rename = "P-521")]
  P521,
  /// SECG secp256k1 curve.
  #[serde(rename = "secp256k1")]
  Secp256K1,
}

impl EcCurve {
  /// Returns the name of the curve as a string slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::P256 => "P-256",
      Self::P384 => "P-384",
      Self::P521 => "P-521",
      Self::Secp256K1 => "secp256k1",
    }
  }
}

impl Display for EcCurve {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

/// Supported Edwards-curve digital signature algorithm curves.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum EdCurve {
  /// Ed25519 signature algorithm key pairs.
  Ed25519,
  /// Ed448 signature algorithm key pairs.
  Ed448,
}

impl EdCurve {
  /// Returns the name of the curve as a string slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Ed25519 => "Ed25519",
      Self::Ed448 => "Ed448",
    }
  }
}

impl Display for EdCurve {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

/// Supported Diffie-Hellman key agreement curves.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum EcxCurve {
  /// X25519 function key pairs.
  X25519,
  /// X448 function key pairs.
  X448,
}

impl EcxCurve {
  /// Returns the name of the curve as a string slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::X25519 => "X25519",
      Self::X448 => "X448",
    }
  }
}

impl Display for EcxCurve {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}
