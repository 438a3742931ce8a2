// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkType;

use crate::algorithms::aes_ctr::expand_oct_jwk;
use crate::algorithms::ensure_output;
use crate::algorithms::validator;
use crate::algorithms::CryptoAlgorithm;
use crate::algorithms::DeriveBitsOptions;
use crate::algorithms::DeriveBitsParams;
use crate::primitives::pbkdf2;
use crate::primitives::sha::Sha2;

/// PBKDF2 key derivation, answering to `PBKDF2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pbkdf2Algorithm;

impl Pbkdf2Algorithm {
  /// The algorithm names this provider answers to.
  pub const NAMES: &'static [&'static str] = &["PBKDF2"];

  /// The supported pseudorandom functions.
  pub const HASH_ALGORITHMS: &'static [&'static str] = Sha2::NAMES;
}

impl CryptoAlgorithm for Pbkdf2Algorithm {
  fn names(&self) -> &'static [&'static str] {
    Self::NAMES
  }

  fn derive_bits(&self, params: &DeriveBitsParams<'_>) -> Result<Vec<u8>> {
    let DeriveBitsOptions::Pbkdf2 { hash, salt, iterations } = &params.algorithm else {
      return Err(Error::type_error("'algorithm' is not of type Pbkdf2Options."));
    };

    // The hash allow-list check runs before anything else so the error is
    // independent of key material.
    Sha2::try_from_name(hash)?;

    validator::check_key_type(params.base_key, &[JwkType::Oct])?;
    validator::check_key_operations(params.base_key, JwkOperation::DeriveBits)?;

    let length: usize = params
      .length
      .ok_or_else(|| Error::type_error("Required parameter was missing: 'length'"))?;

    let password: Vec<u8> = expand_oct_jwk(params.base_key)?;
    let derived: Vec<u8> = pbkdf2::derive_key(hash, &password, salt, *iterations, length)?;
    ensure_output(derived, "deriveBits")
  }
}

#[cfg(test)]
mod tests {
  use keymint_jose::Jwk;

  use super::*;
  use crate::algorithms::encode_oct_jwk;
  use crate::algorithms::VerifyParams;

  fn derive(base_key: &Jwk, hash: &str, iterations: usize, length: Option<usize>) -> keymint_core::Result<Vec<u8>> {
    Pbkdf2Algorithm.derive_bits(&DeriveBitsParams {
      algorithm: DeriveBitsOptions::Pbkdf2 {
        hash: hash.to_owned(),
        salt: b"salt".to_vec(),
        iterations,
      },
      base_key,
      length,
    })
  }

  #[test]
  fn test_derive_bits() {
    let base_key: Jwk = encode_oct_jwk(b"password");
    let derived: Vec<u8> = derive(&base_key, "SHA-256", 1, Some(256)).unwrap();
    assert_eq!(derived.len(), 32);
    assert_eq!(
      keymint_core::convert::BaseEncoding::encode_hex(&derived),
      "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
    );
  }

  #[test]
  fn test_length_must_be_multiple_of_8() {
    let base_key: Jwk = encode_oct_jwk(b"password");
    let error = derive(&base_key, "SHA-256", 1, Some(12)).unwrap_err();
    assert_eq!(error.name(), "OperationError");
    assert!(error.to_string().contains("'length' must be a multiple of 8"));
  }

  #[test]
  fn test_sha1_is_out_of_range() {
    let base_key: Jwk = encode_oct_jwk(b"password");
    let error = derive(&base_key, "SHA-1", 1, Some(256)).unwrap_err();
    assert_eq!(error.name(), "TypeError");
    assert!(error.to_string().contains("Out of range"));
  }

  #[test]
  fn test_non_oct_base_key_is_rejected() {
    let okp: Jwk = serde_json::from_str(
      r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#,
    )
    .unwrap();
    let error = derive(&okp, "SHA-256", 1, Some(256)).unwrap_err();
    assert!(error.to_string().contains("Key type of the provided key must be 'oct'"));
  }

  #[test]
  fn test_verify_is_not_valid_for_pbkdf2() {
    let base_key: Jwk = encode_oct_jwk(b"password");
    let error = Pbkdf2Algorithm
      .verify(&VerifyParams {
        key: &base_key,
        signature: &[0; 64],
        data: b"x",
      })
      .unwrap_err();
    assert_eq!(error.name(), "InvalidAccessError");
    assert!(error.to_string().contains("'verify' is not valid for PBKDF2"));
  }
}
