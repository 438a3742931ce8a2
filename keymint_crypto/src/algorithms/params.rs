// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_jose::jwk::JwkOperation;
use keymint_jose::Jwk;

use crate::algorithms::Algorithm;

/// Options for key generation.
#[derive(Clone, Debug)]
pub struct KeyGenParams {
  /// The algorithm to generate a key for.
  pub algorithm: Algorithm,
  /// The curve of the key, for elliptic-curve algorithms.
  pub curve: Option<String>,
  /// The key length in bits, for symmetric algorithms named without one.
  pub length: Option<usize>,
  /// Whether derived SEC1 public keys use the compressed form.
  pub compressed_public_key: Option<bool>,
  /// The key operations recorded on the generated key.
  pub key_operations: Option<Vec<JwkOperation>>,
}

impl KeyGenParams {
  /// Creates new parameters for the given algorithm, with all options
  /// unset.
  pub fn new(algorithm: Algorithm) -> Self {
    Self {
      algorithm,
      curve: None,
      length: None,
      compressed_public_key: None,
      key_operations: None,
    }
  }
}

/// Parameters of a signing operation.
#[derive(Clone, Copy, Debug)]
pub struct SignParams<'a> {
  /// The private key to sign with.
  pub key: &'a Jwk,
  /// The data to sign.
  pub data: &'a [u8],
}

/// Parameters of a signature verification.
#[derive(Clone, Copy, Debug)]
pub struct VerifyParams<'a> {
  /// The public key to verify with.
  pub key: &'a Jwk,
  /// The signature to verify.
  pub signature: &'a [u8],
  /// The signed data.
  pub data: &'a [u8],
}

/// Parameters of an encryption or decryption operation.
#[derive(Clone, Copy, Debug)]
pub struct CipherParams<'a> {
  /// The symmetric key.
  pub key: &'a Jwk,
  /// The data to transform.
  pub data: &'a [u8],
  /// The initial counter block.
  pub counter: &'a [u8],
  /// The number of rightmost counter bits that increment.
  pub length: usize,
}

/// The algorithm-specific inputs of a bit derivation.
#[derive(Clone, Debug)]
pub enum DeriveBitsOptions {
  /// Elliptic-curve Diffie-Hellman against the other party's public key.
  Ecdh {
    /// The other party's public key.
    public_key: Jwk,
  },
  /// PBKDF2 with the given pseudorandom function and cost.
  Pbkdf2 {
    /// The JOSE name of the hash function.
    hash: String,
    /// The salt.
    salt: Vec<u8>,
    /// The iteration count.
    iterations: usize,
  },
}

/// Parameters of a bit derivation.
#[derive(Clone, Debug)]
pub struct DeriveBitsParams<'a> {
  /// The algorithm-specific inputs.
  pub algorithm: DeriveBitsOptions,
  /// The key the derivation starts from.
  pub base_key: &'a Jwk,
  /// The number of bits to derive. Defaults to the full derived secret.
  pub length: Option<usize>,
}
