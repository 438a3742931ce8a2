// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkParamsOkp;
use keymint_jose::jwk::JwkType;
use keymint_jose::jwu;
use keymint_jose::Jwk;

use crate::algorithms::ensure_output;
use crate::algorithms::validator;
use crate::algorithms::CryptoAlgorithm;
use crate::algorithms::KeyGenParams;
use crate::algorithms::SignParams;
use crate::algorithms::VerifyParams;
use crate::primitives::ed25519;

/// Edwards-curve signatures over Ed25519, answering to `EdDSA`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EddsaAlgorithm;

impl EddsaAlgorithm {
  /// The algorithm names this provider answers to.
  pub const NAMES: &'static [&'static str] = &["EdDSA"];

  /// The supported curves.
  pub const CURVES: &'static [&'static str] = &["Ed25519"];

  const KEY_OPERATIONS: &'static [JwkOperation] = &[JwkOperation::Sign, JwkOperation::Verify];

  fn check_okp_key(&self, key: &Jwk) -> Result<()> {
    if key.kty() != JwkType::Okp {
      return Err(Error::invalid_access(format!(
        "Requested operation is only valid for OKP keys, but '{}' was given.",
        key.kty()
      )));
    }
    validator::check_curve(&key.try_okp_params()?.crv, Self::CURVES)
  }
}

impl CryptoAlgorithm for EddsaAlgorithm {
  fn names(&self) -> &'static [&'static str] {
    Self::NAMES
  }

  fn check_generate_key_options(&self, params: &KeyGenParams) -> Result<()> {
    validator::check_algorithm_name(params.algorithm.name(), Self::NAMES)?;
    if let Some(curve) = &params.curve {
      validator::check_curve(curve, Self::CURVES)?;
    }
    if let Some(operations) = &params.key_operations {
      validator::check_requested_operations(operations, Self::KEY_OPERATIONS, Self::NAMES)?;
    }
    Ok(())
  }

  fn generate_key(&self, params: &KeyGenParams) -> Result<Jwk> {
    self.check_generate_key_options(params)?;

    let private_key: Vec<u8> = ed25519::generate_key()?;
    let mut jwk: Jwk = encode_ed25519_private_jwk(&private_key)?;

    let kid: String = jwk.thumbprint_sha256_b64();
    jwk.set_alg("EdDSA");
    jwk.set_kid(kid);
    jwk.set_key_ops(
      params
        .key_operations
        .clone()
        .unwrap_or_else(|| Self::KEY_OPERATIONS.to_vec()),
    );

    Ok(jwk)
  }

  fn sign(&self, params: &SignParams<'_>) -> Result<Vec<u8>> {
    validator::check_key_algorithm(params.key, Self::NAMES[0], Self::NAMES)?;
    self.check_okp_key(params.key)?;
    validator::check_key_operations(params.key, JwkOperation::Sign)?;

    if !params.key.is_okp_private() {
      return Err(Error::invalid_access(
        "Requested operation 'sign' is only valid for private keys.",
      ));
    }

    let private_key: Vec<u8> = expand_okp_private_jwk(params.key)?;
    let signature: Vec<u8> = ed25519::sign(&private_key, params.data)?;
    ensure_output(signature, "sign")
  }

  fn verify(&self, params: &VerifyParams<'_>) -> Result<bool> {
    validator::check_key_algorithm(params.key, Self::NAMES[0], Self::NAMES)?;
    self.check_okp_key(params.key)?;
    validator::check_key_operations(params.key, JwkOperation::Verify)?;

    if !params.key.is_okp_public() {
      return Err(Error::invalid_access(
        "Requested operation 'verify' is only valid for public keys.",
      ));
    }

    let public_key: Vec<u8> = expand_ed25519_public_jwk(params.key)?;
    ed25519::verify(&public_key, params.signature, params.data)
  }
}

/// Encodes a raw Ed25519 private key as an `OKP` JWK.
pub fn encode_ed25519_private_jwk(private_key: &[u8]) -> Result<Jwk> {
  let public_key: Vec<u8> = ed25519::get_public_key(private_key)?;

  Ok(Jwk::from_params(JwkParamsOkp {
    crv: "Ed25519".to_owned(),
    x: jwu::encode_b64(public_key),
    d: Some(jwu::encode_b64(private_key)),
  }))
}

/// Encodes a raw Ed25519 public key as an `OKP` JWK.
pub fn encode_ed25519_public_jwk(public_key: &[u8]) -> Jwk {
  Jwk::from_params(JwkParamsOkp {
    crv: "Ed25519".to_owned(),
    x: jwu::encode_b64(public_key),
    d: None,
  })
}

/// Extracts the raw private key of an `OKP` JWK.
pub fn expand_okp_private_jwk(jwk: &Jwk) -> Result<Vec<u8>> {
  let params: &JwkParamsOkp = jwk.try_okp_params()?;
  let d: &String = params
    .d
    .as_ref()
    .ok_or_else(|| Error::invalid_access("The provided key is not a private key."))?;
  jwu::decode_b64(d)
}

/// Extracts the raw public key of an Ed25519 `OKP` JWK.
pub fn expand_ed25519_public_jwk(jwk: &Jwk) -> Result<Vec<u8>> {
  jwu::decode_b64(&jwk.try_okp_params()?.x)
}
