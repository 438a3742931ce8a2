// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkParamsOct;
use keymint_jose::jwk::JwkType;
use keymint_jose::jwu;
use keymint_jose::Jwk;

use crate::algorithms::validator;
use crate::algorithms::Algorithm;
use crate::algorithms::CipherParams;
use crate::algorithms::CryptoAlgorithm;
use crate::algorithms::KeyGenParams;
use crate::primitives::aes_ctr;

/// AES counter-mode encryption, answering to `A128CTR`, `A192CTR` and
/// `A256CTR`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AesCtrAlgorithm;

impl AesCtrAlgorithm {
  /// The algorithm names this provider answers to.
  pub const NAMES: &'static [&'static str] = &["A128CTR", "A192CTR", "A256CTR"];

  const KEY_OPERATIONS: &'static [JwkOperation] = &[JwkOperation::Encrypt, JwkOperation::Decrypt];

  /// Resolves the key length in bits from the algorithm name, falling
  /// back to the `length` option for the generic `AES-CTR` name.
  fn key_length(params: &KeyGenParams) -> Result<usize> {
    match params.algorithm {
      Algorithm::A128Ctr => Ok(128),
      Algorithm::A192Ctr => Ok(192),
      Algorithm::A256Ctr => Ok(256),
      Algorithm::AesCtr => {
        let length: usize = params
          .length
          .ok_or_else(|| Error::type_error("Required parameter was missing: 'length'"))?;
        if !matches!(length, 128 | 192 | 256) {
          return Err(Error::type_error("Out of range: 'length' must be one of: 128, 192, 256"));
        }
        Ok(length)
      }
      other => Err(Error::not_supported(format!("Algorithm not supported: '{other}'"))),
    }
  }

  fn check_cipher_params(&self, params: &CipherParams<'_>, operation: JwkOperation) -> Result<Vec<u8>> {
    validator::check_key_algorithm(params.key, Self::NAMES[0], Self::NAMES)?;
    validator::check_key_type(params.key, &[JwkType::Oct])?;
    validator::check_key_operations(params.key, operation)?;

    let oct: &JwkParamsOct = params.key.try_oct_params()?;
    jwu::decode_b64(&oct.k)
  }
}

impl CryptoAlgorithm for AesCtrAlgorithm {
  fn names(&self) -> &'static [&'static str] {
    Self::NAMES
  }

  fn check_generate_key_options(&self, params: &KeyGenParams) -> Result<()> {
    Self::key_length(params)?;
    if let Some(operations) = &params.key_operations {
      validator::check_requested_operations(operations, Self::KEY_OPERATIONS, Self::NAMES)?;
    }
    Ok(())
  }

  fn generate_key(&self, params: &KeyGenParams) -> Result<Jwk> {
    self.check_generate_key_options(params)?;

    let length: usize = Self::key_length(params)?;
    let key: Vec<u8> = aes_ctr::generate_key(length)?;
    let mut jwk: Jwk = encode_oct_jwk(&key);

    let kid: String = jwk.thumbprint_sha256_b64();
    jwk.set_alg(format!("A{length}CTR"));
    jwk.set_kid(kid);
    jwk.set_key_ops(
      params
        .key_operations
        .clone()
        .unwrap_or_else(|| Self::KEY_OPERATIONS.to_vec()),
    );

    Ok(jwk)
  }

  fn encrypt(&self, params: &CipherParams<'_>) -> Result<Vec<u8>> {
    let key: Vec<u8> = self.check_cipher_params(params, JwkOperation::Encrypt)?;
    let ciphertext: Vec<u8> = aes_ctr::encrypt(params.counter, params.length, &key, params.data)?;

    if ciphertext.len() != params.data.len() {
      return Err(Error::operation("Operation failed: encrypt"));
    }
    Ok(ciphertext)
  }

  fn decrypt(&self, params: &CipherParams<'_>) -> Result<Vec<u8>> {
    let key: Vec<u8> = self.check_cipher_params(params, JwkOperation::Decrypt)?;
    let plaintext: Vec<u8> = aes_ctr::decrypt(params.counter, params.length, &key, params.data)?;

    if plaintext.len() != params.data.len() {
      return Err(Error::operation("Operation failed: decrypt"));
    }
    Ok(plaintext)
  }
}

/// Encodes raw symmetric key bytes as an `oct` JWK.
pub fn encode_oct_jwk(key: &[u8]) -> Jwk {
  Jwk::from_params(JwkParamsOct {
    k: jwu::encode_b64(key),
  })
}

/// Extracts the raw key bytes of an `oct` JWK.
pub fn expand_oct_jwk(jwk: &Jwk) -> Result<Vec<u8>> {
  jwu::decode_b64(&jwk.try_oct_params()?.k)
}
