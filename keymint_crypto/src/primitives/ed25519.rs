// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Ed25519 signatures and conversions to X25519.

use crypto::hashes::sha::Sha512;
use crypto::hashes::Digest;
use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::Verifier;
use ed25519_dalek::VerifyingKey;
use rand::rngs::OsRng;

use keymint_core::Error;
use keymint_core::Result;

/// The length of an Ed25519 private or public key in bytes.
pub const KEY_LENGTH: usize = 32;

/// The length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Generates a new 32-byte private key.
pub fn generate_key() -> Result<Vec<u8>> {
  let signing_key: SigningKey = SigningKey::generate(&mut OsRng);
  Ok(signing_key.to_bytes().to_vec())
}

/// Derives the 32-byte public key of `private_key`.
pub fn get_public_key(private_key: &[u8]) -> Result<Vec<u8>> {
  let signing_key: SigningKey = decode_private_key(private_key)?;
  Ok(signing_key.verifying_key().to_bytes().to_vec())
}

/// Signs `data`, returning a 64-byte signature.
pub fn sign(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
  let signing_key: SigningKey = decode_private_key(key)?;
  let signature: Signature = signing_key.sign(data);
  Ok(signature.to_bytes().to_vec())
}

/// Verifies a signature over `data`.
///
/// Fails for a malformed public key; a malformed or mismatched signature
/// yields `false`.
pub fn verify(key: &[u8], signature: &[u8], data: &[u8]) -> Result<bool> {
  let verifying_key: VerifyingKey = decode_public_key(key)?;

  let signature: Signature = match Signature::from_slice(signature) {
    Ok(signature) => signature,
    Err(_) => return Ok(false),
  };

  Ok(verifying_key.verify(data, &signature).is_ok())
}

/// Returns `true` if `key` decodes as a point on the Edwards curve.
///
/// Byte strings that are not the encoding of a curve point, private
/// keys included, yield `false` when they fail to decompress.
pub fn validate_public_key(key: &[u8]) -> bool {
  decode_public_key(key).is_ok()
}

/// Converts an Ed25519 private key (or any byte string used as one) to an
/// X25519 scalar by hashing and clamping.
pub fn convert_private_key_to_x25519(private_key: &[u8]) -> Result<Vec<u8>> {
  let digest: [u8; 64] = Sha512::digest(private_key).into();

  let mut scalar: [u8; KEY_LENGTH] = digest[..KEY_LENGTH].try_into().expect("digest is 64 bytes");
  scalar[0] &= 248;
  scalar[31] &= 127;
  scalar[31] |= 64;

  Ok(scalar.to_vec())
}

/// Maps an Ed25519 public key to its X25519 (Montgomery) form.
pub fn convert_public_key_to_x25519(public_key: &[u8]) -> Result<Vec<u8>> {
  let verifying_key: VerifyingKey = decode_public_key(public_key)?;
  Ok(verifying_key.to_montgomery().to_bytes().to_vec())
}

fn decode_private_key(key: &[u8]) -> Result<SigningKey> {
  let bytes: [u8; KEY_LENGTH] = key
    .try_into()
    .map_err(|_| Error::operation("Invalid private key"))?;
  Ok(SigningKey::from_bytes(&bytes))
}

fn decode_public_key(key: &[u8]) -> Result<VerifyingKey> {
  let bytes: [u8; KEY_LENGTH] = key.try_into().map_err(|_| Error::operation("Invalid public key"))?;
  VerifyingKey::from_bytes(&bytes).map_err(|_| Error::operation("Invalid public key"))
}

#[cfg(test)]
mod tests {
  use keymint_core::convert::BaseEncoding;

  use super::*;

  #[test]
  fn test_rfc8032_test_1_vector() {
    // RFC 8032 Section 7.1, TEST 1 (empty message).
    let private_key: Vec<u8> =
      BaseEncoding::decode_hex("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60").unwrap();
    let public_key: Vec<u8> =
      BaseEncoding::decode_hex("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a").unwrap();

    assert_eq!(get_public_key(&private_key).unwrap(), public_key);

    let signature: Vec<u8> = sign(&private_key, b"").unwrap();
    assert_eq!(
      BaseEncoding::encode_hex(&signature),
      concat!(
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155",
        "5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
      )
    );

    assert!(verify(&public_key, &signature, b"").unwrap());
  }

  #[test]
  fn test_sign_verify_roundtrip_with_mutation() {
    let private_key: Vec<u8> = generate_key().unwrap();
    let public_key: Vec<u8> = get_public_key(&private_key).unwrap();
    let data: &[u8] = b"message";

    let mut signature: Vec<u8> = sign(&private_key, data).unwrap();
    assert_eq!(signature.len(), SIGNATURE_LENGTH);
    assert!(verify(&public_key, &signature, data).unwrap());

    // A single flipped bit in the message or the signature must not verify.
    assert!(!verify(&public_key, &signature, b"messagf").unwrap());
    signature[0] ^= 1;
    assert!(!verify(&public_key, &signature, data).unwrap());
  }

  #[test]
  fn test_validate_public_key() {
    let private_key: Vec<u8> = generate_key().unwrap();
    let public_key: Vec<u8> = get_public_key(&private_key).unwrap();

    assert!(validate_public_key(&public_key));
    assert!(!validate_public_key(&[0; 31]));
  }

  #[test]
  fn test_convert_keys_to_x25519_agree() {
    // Converted key pairs must still perform a consistent key agreement.
    let alice: Vec<u8> = generate_key().unwrap();
    let bob: Vec<u8> = generate_key().unwrap();

    let alice_x_private: Vec<u8> = convert_private_key_to_x25519(&alice).unwrap();
    let bob_x_private: Vec<u8> = convert_private_key_to_x25519(&bob).unwrap();
    let alice_x_public: Vec<u8> = convert_public_key_to_x25519(&get_public_key(&alice).unwrap()).unwrap();
    let bob_x_public: Vec<u8> = convert_public_key_to_x25519(&get_public_key(&bob).unwrap()).unwrap();

    let secret_a: Vec<u8> = crate::primitives::x25519::shared_secret(&alice_x_private, &bob_x_public).unwrap();
    let secret_b: Vec<u8> = crate::primitives::x25519::shared_secret(&bob_x_private, &alice_x_public).unwrap();
    assert_eq!(secret_a, secret_b);
  }

  #[test]
  fn test_convert_public_key_rejects_invalid_points() {
    // Not every 32-byte string decompresses to an Edwards point.
    let error = convert_public_key_to_x25519(&[0xff; 32]).unwrap_err();
    assert!(error.to_string().contains("Invalid public key"));
  }
}
