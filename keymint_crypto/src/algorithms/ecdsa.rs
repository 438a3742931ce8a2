// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkParamsEc;
use keymint_jose::jwk::JwkType;
use keymint_jose::jwu;
use keymint_jose::Jwk;

use crate::algorithms::ensure_output;
use crate::algorithms::validator;
use crate::algorithms::CryptoAlgorithm;
use crate::algorithms::KeyGenParams;
use crate::algorithms::SignParams;
use crate::algorithms::VerifyParams;
use crate::primitives::secp256k1;

/// ECDSA signatures over secp256k1, answering to `ES256K` and `ECDSA`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaAlgorithm;

impl EcdsaAlgorithm {
  /// The algorithm names this provider answers to.
  pub const NAMES: &'static [&'static str] = &["ES256K", "ECDSA"];

  /// The supported curves.
  pub const CURVES: &'static [&'static str] = &["secp256k1"];

  const KEY_OPERATIONS: &'static [JwkOperation] = &[JwkOperation::Sign, JwkOperation::Verify];

  fn check_curve_of(&self, key: &Jwk) -> Result<()> {
    validator::check_curve(&key.try_ec_params()?.crv, Self::CURVES)
  }
}

impl CryptoAlgorithm for EcdsaAlgorithm {
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

    let private_key: Vec<u8> = secp256k1::generate_key()?;
    let mut jwk: Jwk = encode_secp256k1_private_jwk(&private_key)?;

    let kid: String = jwk.thumbprint_sha256_b64();
    jwk.set_alg("ES256K");
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
    validator::check_key_type(params.key, &[JwkType::Ec])?;
    validator::check_key_operations(params.key, JwkOperation::Sign)?;
    self.check_curve_of(params.key)?;

    if !params.key.is_ec_private() {
      return Err(Error::invalid_access(
        "Requested operation 'sign' is only valid for private keys.",
      ));
    }

    let private_key: Vec<u8> = expand_secp256k1_private_jwk(params.key)?;
    let signature: Vec<u8> = secp256k1::sign(&private_key, params.data)?;
    ensure_output(signature, "sign")
  }

  fn verify(&self, params: &VerifyParams<'_>) -> Result<bool> {
    validator::check_key_algorithm(params.key, Self::NAMES[0], Self::NAMES)?;
    validator::check_key_type(params.key, &[JwkType::Ec])?;
    validator::check_key_operations(params.key, JwkOperation::Verify)?;
    self.check_curve_of(params.key)?;

    if !params.key.is_ec_public() {
      return Err(Error::invalid_access(
        "Requested operation 'verify' is only valid for public keys.",
      ));
    }

    let public_key: Vec<u8> = expand_secp256k1_public_jwk(params.key, false)?;
    secp256k1::verify(&public_key, params.signature, params.data)
  }
}

/// Encodes a raw secp256k1 private key as an `EC` JWK with both public
/// coordinates set.
pub fn encode_secp256k1_private_jwk(private_key: &[u8]) -> Result<Jwk> {
  let (x, y): (Vec<u8>, Vec<u8>) = secp256k1::get_curve_points(private_key)?;

  Ok(Jwk::from_params(JwkParamsEc {
    crv: "secp256k1".to_owned(),
    x: jwu::encode_b64(x),
    y: jwu::encode_b64(y),
    d: Some(jwu::encode_b64(private_key)),
  }))
}

/// Encodes a SEC1 public key (either form) as an `EC` JWK.
pub fn encode_secp256k1_public_jwk(public_key: &[u8]) -> Result<Jwk> {
  let (x, y): (Vec<u8>, Vec<u8>) = secp256k1::get_curve_points(public_key)?;

  Ok(Jwk::from_params(JwkParamsEc {
    crv: "secp256k1".to_owned(),
    x: jwu::encode_b64(x),
    y: jwu::encode_b64(y),
    d: None,
  }))
}

/// Extracts the raw private scalar of an `EC` JWK.
pub fn expand_secp256k1_private_jwk(jwk: &Jwk) -> Result<Vec<u8>> {
  let params: &JwkParamsEc = jwk.try_ec_params()?;
  let d: &String = params
    .d
    .as_ref()
    .ok_or_else(|| Error::invalid_access("The provided key is not a private key."))?;
  jwu::decode_b64(d)
}

/// Rebuilds the SEC1 encoding of an `EC` JWK's public point.
pub fn expand_secp256k1_public_jwk(jwk: &Jwk, compressed_public_key: bool) -> Result<Vec<u8>> {
  let params: &JwkParamsEc = jwk.try_ec_params()?;

  let mut sec1: Vec<u8> = vec![0x04];
  sec1.extend_from_slice(&jwu::decode_b64(&params.x)?);
  sec1.extend_from_slice(&jwu::decode_b64(&params.y)?);

  // Round-tripping through the point decoder validates the coordinates.
  secp256k1::convert_public_key(&sec1, compressed_public_key)
}

#[cfg(test)]
mod tests {
  use keymint_jose::Jwk;

  use super::*;
  use crate::algorithms::Algorithm;

  fn generate() -> Jwk {
    EcdsaAlgorithm
      .generate_key(&KeyGenParams::new(Algorithm::Es256K))
      .unwrap()
  }

  #[test]
  fn test_generated_key_shape() {
    let jwk: Jwk = generate();
    assert!(jwk.is_ec_private());
    assert_eq!(jwk.alg(), Some("ES256K"));
    assert_eq!(jwk.kid(), Some(&*jwk.thumbprint_sha256_b64()));
    assert_eq!(jwk.key_ops(), Some(&[JwkOperation::Sign, JwkOperation::Verify][..]));
  }

  #[test]
  fn test_sign_verify_roundtrip() {
    let private_jwk: Jwk = generate();
    let public_jwk: Jwk = private_jwk.to_public().unwrap();
    let data: &[u8] = &[51, 52, 53];

    let signature: Vec<u8> = EcdsaAlgorithm
      .sign(&SignParams {
        key: &private_jwk,
        data,
      })
      .unwrap();
    assert_eq!(signature.len(), 64);

    assert!(EcdsaAlgorithm
      .verify(&VerifyParams {
        key: &public_jwk,
        signature: &signature,
        data,
      })
      .unwrap());

    let mut mutated: Vec<u8> = data.to_vec();
    mutated[0] ^= 1;
    assert!(!EcdsaAlgorithm
      .verify(&VerifyParams {
        key: &public_jwk,
        signature: &signature,
        data: &mutated,
      })
      .unwrap());
  }

  #[test]
  fn test_sign_requires_private_key() {
    let public_jwk: Jwk = generate().to_public().unwrap();
    let error = EcdsaAlgorithm
      .sign(&SignParams {
        key: &public_jwk,
        data: b"data",
      })
      .unwrap_err();
    assert_eq!(error.name(), "InvalidAccessError");
  }

  #[test]
  fn test_sign_rejects_foreign_key_algorithm() {
    let mut jwk: Jwk = generate();
    jwk.set_alg("ES256");

    let error = EcdsaAlgorithm.sign(&SignParams { key: &jwk, data: b"x" }).unwrap_err();
    assert_eq!(error.name(), "InvalidAccessError");
    assert!(error.to_string().contains("does not match the provided"));
  }

  #[test]
  fn test_sign_rejects_disallowed_key_ops() {
    let mut jwk: Jwk = generate();
    jwk.set_key_ops([JwkOperation::Verify]);

    let error = EcdsaAlgorithm.sign(&SignParams { key: &jwk, data: b"x" }).unwrap_err();
    assert!(error.to_string().contains("is not valid for the provided key"));
  }

  #[test]
  fn test_unknown_curve_is_out_of_range() {
    let jwk: Jwk = serde_json::from_str(
      r#"{"kty":"EC","crv":"P-256","x":"f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU","y":"x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"}"#,
    )
    .unwrap();

    let error = EcdsaAlgorithm
      .verify(&VerifyParams {
        key: &jwk,
        signature: &[0; 64],
        data: b"x",
      })
      .unwrap_err();
    assert_eq!(error.name(), "TypeError");
    assert!(error.to_string().contains("Out of range"));
  }

  #[test]
  fn test_derive_bits_is_not_valid_for_ecdsa() {
    use crate::algorithms::DeriveBitsOptions;
    use crate::algorithms::DeriveBitsParams;

    let jwk: Jwk = generate();
    let error = EcdsaAlgorithm
      .derive_bits(&DeriveBitsParams {
        algorithm: DeriveBitsOptions::Ecdh {
          public_key: jwk.to_public().unwrap(),
        },
        base_key: &jwk,
        length: None,
      })
      .unwrap_err();

    assert_eq!(error.name(), "InvalidAccessError");
    assert!(error.to_string().contains("is not valid for ES256K, ECDSA"));
  }

  #[test]
  fn test_jwk_expansion_roundtrip() {
    let private_key: Vec<u8> = crate::primitives::secp256k1::generate_key().unwrap();
    let jwk: Jwk = encode_secp256k1_private_jwk(&private_key).unwrap();
    assert_eq!(expand_secp256k1_private_jwk(&jwk).unwrap(), private_key);

    let compressed: Vec<u8> = crate::primitives::secp256k1::get_public_key(&private_key, true).unwrap();
    let public_jwk: Jwk = encode_secp256k1_public_jwk(&compressed).unwrap();
    assert_eq!(expand_secp256k1_public_jwk(&public_jwk, true).unwrap(), compressed);
  }
}
