// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkParams;
use keymint_jose::jwk::JwkParamsOkp;
use keymint_jose::jwu;
use keymint_jose::Jwk;

use crate::algorithms::ensure_output;
use crate::algorithms::validator;
use crate::algorithms::CryptoAlgorithm;
use crate::algorithms::DeriveBitsOptions;
use crate::algorithms::DeriveBitsParams;
use crate::algorithms::KeyGenParams;
use crate::algorithms::ecdsa;
use crate::algorithms::eddsa;
use crate::primitives::secp256k1;
use crate::primitives::x25519;

/// Elliptic-curve Diffie-Hellman key agreement over X25519 and
/// secp256k1, answering to `ECDH`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdhAlgorithm;

impl EcdhAlgorithm {
  /// The algorithm names this provider answers to.
  pub const NAMES: &'static [&'static str] = &["ECDH"];

  /// The supported curves.
  pub const CURVES: &'static [&'static str] = &["X25519", "secp256k1"];

  const KEY_OPERATIONS: &'static [JwkOperation] = &[JwkOperation::DeriveBits, JwkOperation::DeriveKey];

  fn curve_of(key: &Jwk) -> Result<String> {
    let curve: &str = match key.params() {
      JwkParams::Ec(params) => &params.crv,
      JwkParams::Okp(params) => &params.crv,
      _ => {
        return Err(Error::invalid_access(format!(
          "Key type of the provided key must be 'EC' or 'OKP', but '{}' was given.",
          key.kty()
        )))
      }
    };
    validator::check_curve(curve, Self::CURVES)?;
    Ok(curve.to_owned())
  }
}

impl CryptoAlgorithm for EcdhAlgorithm {
  fn names(&self) -> &'static [&'static str] {
    Self::NAMES
  }

  fn check_generate_key_options(&self, params: &KeyGenParams) -> Result<()> {
    validator::check_algorithm_name(params.algorithm.name(), Self::NAMES)?;
    let curve: &String = params
      .curve
      .as_ref()
      .ok_or_else(|| Error::type_error("Required parameter was missing: 'curve'"))?;
    validator::check_curve(curve, Self::CURVES)?;
    if let Some(operations) = &params.key_operations {
      validator::check_requested_operations(operations, Self::KEY_OPERATIONS, Self::NAMES)?;
    }
    Ok(())
  }

  fn generate_key(&self, params: &KeyGenParams) -> Result<Jwk> {
    self.check_generate_key_options(params)?;

    // check_generate_key_options guarantees the curve is present.
    let mut jwk: Jwk = match params.curve.as_deref() {
      Some("X25519") => encode_x25519_private_jwk(&x25519::generate_key()?)?,
      _ => ecdsa::encode_secp256k1_private_jwk(&secp256k1::generate_key()?)?,
    };

    let kid: String = jwk.thumbprint_sha256_b64();
    jwk.set_kid(kid);
    jwk.set_key_ops(
      params
        .key_operations
        .clone()
        .unwrap_or_else(|| Self::KEY_OPERATIONS.to_vec()),
    );

    Ok(jwk)
  }

  fn derive_bits(&self, params: &DeriveBitsParams<'_>) -> Result<Vec<u8>> {
    let DeriveBitsOptions::Ecdh { public_key } = &params.algorithm else {
      return Err(Error::type_error("'algorithm' is not of type EcdhOptions."));
    };

    if !public_key.is_public() {
      return Err(Error::invalid_access("The provided 'publicKey' must be a public key."));
    }
    if !params.base_key.is_private() {
      return Err(Error::invalid_access("The provided 'baseKey' must be a private key."));
    }

    let public_curve: String = Self::curve_of(public_key)?;
    let base_curve: String = Self::curve_of(params.base_key)?;
    if public_key.kty() != params.base_key.kty() || public_curve != base_curve {
      return Err(Error::invalid_access(
        "The 'publicKey' and 'baseKey' must have the same key type and curve.",
      ));
    }

    validator::check_key_operations(public_key, JwkOperation::DeriveBits)?;
    validator::check_key_operations(params.base_key, JwkOperation::DeriveBits)?;

    let shared_secret: Vec<u8> = match &*base_curve {
      "X25519" => {
        let private_key: Vec<u8> = eddsa::expand_okp_private_jwk(params.base_key)?;
        let own_public: Vec<u8> = x25519::get_public_key(&private_key)?;
        let their_public: Vec<u8> = expand_x25519_public_jwk(public_key)?;

        if own_public == their_public {
          return Err(Error::invalid_access(
            "A shared secret cannot be computed from a single key pair.",
          ));
        }

        x25519::shared_secret(&private_key, &their_public)?
      }
      _ => {
        let private_key: Vec<u8> = ecdsa::expand_secp256k1_private_jwk(params.base_key)?;
        let own_public: Vec<u8> = secp256k1::get_public_key(&private_key, false)?;
        let their_public: Vec<u8> = ecdsa::expand_secp256k1_public_jwk(public_key, false)?;

        if own_public == their_public {
          return Err(Error::invalid_access(
            "A shared secret cannot be computed from a single key pair.",
          ));
        }

        secp256k1::shared_secret(&private_key, &their_public)?
      }
    };

    let derived: Vec<u8> = match params.length {
      None => shared_secret,
      Some(length) => {
        if length % 8 != 0 {
          return Err(Error::operation("'length' must be a multiple of 8"));
        }
        if length / 8 > shared_secret.len() {
          return Err(Error::operation(
            "Requested 'length' exceeds the byte length of the derived secret",
          ));
        }
        shared_secret[..length / 8].to_vec()
      }
    };

    ensure_output(derived, "deriveBits")
  }
}

/// Encodes a raw X25519 private key as an `OKP` JWK.
pub fn encode_x25519_private_jwk(private_key: &[u8]) -> Result<Jwk> {
  let public_key: Vec<u8> = x25519::get_public_key(private_key)?;

  Ok(Jwk::from_params(JwkParamsOkp {
    crv: "X25519".to_owned(),
    x: jwu::encode_b64(public_key),
    d: Some(jwu::encode_b64(private_key)),
  }))
}

/// Encodes a raw X25519 public key as an `OKP` JWK.
pub fn encode_x25519_public_jwk(public_key: &[u8]) -> Jwk {
  Jwk::from_params(JwkParamsOkp {
    crv: "X25519".to_owned(),
    x: jwu::encode_b64(public_key),
    d: None,
  })
}

/// Extracts the raw public key of an X25519 `OKP` JWK.
pub fn expand_x25519_public_jwk(jwk: &Jwk) -> Result<Vec<u8>> {
  jwu::decode_b64(&jwk.try_okp_params()?.x)
}

#[cfg(test)]
mod tests {
  use keymint_jose::Jwk;

  use super::*;
  use crate::algorithms::Algorithm;
  use crate::algorithms::SignParams;

  fn generate(curve: &str) -> Jwk {
    let mut params: KeyGenParams = KeyGenParams::new(Algorithm::Ecdh);
    params.curve = Some(curve.to_owned());
    EcdhAlgorithm.generate_key(&params).unwrap()
  }

  fn derive(base_key: &Jwk, public_key: Jwk, length: Option<usize>) -> keymint_core::Result<Vec<u8>> {
    EcdhAlgorithm.derive_bits(&DeriveBitsParams {
      algorithm: DeriveBitsOptions::Ecdh { public_key },
      base_key,
      length,
    })
  }

  #[test]
  fn test_x25519_agreement_is_commutative() {
    let alice: Jwk = generate("X25519");
    let bob: Jwk = generate("X25519");

    let secret_a: Vec<u8> = derive(&alice, bob.to_public().unwrap(), None).unwrap();
    let secret_b: Vec<u8> = derive(&bob, alice.to_public().unwrap(), None).unwrap();

    assert_eq!(secret_a, secret_b);
    assert_eq!(secret_a.len(), 32);
  }

  #[test]
  fn test_secp256k1_agreement_is_commutative() {
    let alice: Jwk = generate("secp256k1");
    let bob: Jwk = generate("secp256k1");

    let secret_a: Vec<u8> = derive(&alice, bob.to_public().unwrap(), None).unwrap();
    let secret_b: Vec<u8> = derive(&bob, alice.to_public().unwrap(), None).unwrap();

    assert_eq!(secret_a, secret_b);
  }

  #[test]
  fn test_single_key_pair_is_rejected() {
    let alice: Jwk = generate("X25519");

    let error = derive(&alice, alice.to_public().unwrap(), None).unwrap_err();
    assert!(error
      .to_string()
      .contains("shared secret cannot be computed from a single key pair"));
  }

  #[test]
  fn test_mismatched_curves_are_rejected() {
    let alice: Jwk = generate("X25519");
    let bob: Jwk = generate("secp256k1");

    let error = derive(&alice, bob.to_public().unwrap(), None).unwrap_err();
    assert_eq!(error.name(), "InvalidAccessError");
  }

  #[test]
  fn test_length_handling() {
    let alice: Jwk = generate("X25519");
    let bob: Jwk = generate("X25519");

    let derived: Vec<u8> = derive(&alice, bob.to_public().unwrap(), Some(128)).unwrap();
    assert_eq!(derived.len(), 16);

    let error = derive(&alice, bob.to_public().unwrap(), Some(12)).unwrap_err();
    assert!(error.to_string().contains("'length' must be a multiple of 8"));

    let error = derive(&alice, bob.to_public().unwrap(), Some(512)).unwrap_err();
    assert!(error
      .to_string()
      .contains("Requested 'length' exceeds the byte length of the derived secret"));
  }

  #[test]
  fn test_key_ops_must_permit_derive_bits() {
    let alice: Jwk = generate("X25519");
    let mut bob_public: Jwk = generate("X25519").to_public().unwrap();
    bob_public.set_key_ops([JwkOperation::Verify]);

    let error = derive(&alice, bob_public, None).unwrap_err();
    assert!(error.to_string().contains("is not valid for the provided key"));
  }

  #[test]
  fn test_sign_is_not_valid_for_ecdh() {
    let alice: Jwk = generate("X25519");
    let error = EcdhAlgorithm
      .sign(&SignParams {
        key: &alice,
        data: b"x",
      })
      .unwrap_err();

    assert_eq!(error.name(), "InvalidAccessError");
    assert!(error.to_string().contains("'sign' is not valid for ECDH"));
  }

  #[test]
  fn test_generate_requires_curve() {
    let error = EcdhAlgorithm.generate_key(&KeyGenParams::new(Algorithm::Ecdh)).unwrap_err();
    assert_eq!(error.name(), "TypeError");
    assert!(error.to_string().contains("Required parameter was missing"));
  }
}
