// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! SHA-2 digests.

use crypto::hashes::sha::Sha256;
use crypto::hashes::sha::Sha384;
use crypto::hashes::sha::Sha512;
use crypto::hashes::Digest;

use keymint_core::Error;
use keymint_core::Result;

/// The supported digest algorithms.
///
/// SHA-1 is deliberately absent: it is disallowed at every hash
/// allow-list in the library.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Sha2 {
  /// SHA-256.
  Sha256,
  /// SHA-384.
  Sha384,
  /// SHA-512.
  Sha512,
}

impl Sha2 {
  /// The JOSE names of all supported digest algorithms.
  pub const NAMES: &'static [&'static str] = &["SHA-256", "SHA-384", "SHA-512"];

  /// Parses a JOSE hash name, rejecting anything outside the allow-list.
  pub fn try_from_name(name: &str) -> Result<Self> {
    match name {
      "SHA-256" => Ok(Self::Sha256),
      "SHA-384" => Ok(Self::Sha384),
      "SHA-512" => Ok(Self::Sha512),
      _ => Err(Error::type_error(format!(
        "Out of range: 'hash' must be one of: {}",
        Self::NAMES.join(", ")
      ))),
    }
  }

  /// Returns the JOSE name of the algorithm.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Sha256 => "SHA-256",
      Self::Sha384 => "SHA-384",
      Self::Sha512 => "SHA-512",
    }
  }

  /// Returns the digest length in bytes.
  pub const fn output_size(self) -> usize {
    match self {
      Self::Sha256 => 32,
      Self::Sha384 => 48,
      Self::Sha512 => 64,
    }
  }

  /// Computes the digest of `data`.
  pub fn digest(self, data: &[u8]) -> Vec<u8> {
    match self {
      Self::Sha256 => Sha256::digest(data).to_vec(),
      Self::Sha384 => Sha384::digest(data).to_vec(),
      Self::Sha512 => Sha512::digest(data).to_vec(),
    }
  }
}
