// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! secp256k1 signatures, key agreement and point arithmetic.
//!
//! Signatures are 64-byte compact `r || s` with `s` normalized to the low
//! half of the curve order. Public keys are SEC1 encoded, 33 bytes
//! compressed or 65 bytes uncompressed; both forms are accepted wherever a
//! public key is expected.

use k256::ecdsa::signature::Signer;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::Signature;
use k256::ecdsa::SigningKey;
use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::EncodedPoint;
use k256::PublicKey;
use k256::SecretKey;
use rand::rngs::OsRng;

use keymint_core::Error;
use keymint_core::Result;

/// The length of a private key in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// The length of a compact signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Generates a new 32-byte private key.
pub fn generate_key() -> Result<Vec<u8>> {
  let secret: SecretKey = SecretKey::random(&mut OsRng);
  Ok(secret.to_bytes().to_vec())
}

/// Derives the SEC1-encoded public key of `private_key`.
pub fn get_public_key(private_key: &[u8], compressed_public_key: bool) -> Result<Vec<u8>> {
  let secret: SecretKey = decode_private_key(private_key)?;
  Ok(
    secret
      .public_key()
      .to_encoded_point(compressed_public_key)
      .as_bytes()
      .to_vec(),
  )
}

/// Re-encodes a SEC1 public key in the requested form.
pub fn convert_public_key(public_key: &[u8], compressed_public_key: bool) -> Result<Vec<u8>> {
  let public: PublicKey = decode_public_key(public_key)?;
  Ok(public.to_encoded_point(compressed_public_key).as_bytes().to_vec())
}

/// Extracts the affine curve point of a public or private key.
///
/// A 32-byte input is treated as a private key and its public key is
/// derived first. Both coordinates are 32 bytes, left-padded.
pub fn get_curve_points(key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
  let public: PublicKey = if key.len() == PRIVATE_KEY_LENGTH {
    decode_private_key(key)?.public_key()
  } else {
    decode_public_key(key)?
  };

  let point: EncodedPoint = public.to_encoded_point(false);
  let x: Vec<u8> = point.x().ok_or_else(|| Error::operation("Invalid public key"))?.to_vec();
  let y: Vec<u8> = point.y().ok_or_else(|| Error::operation("Invalid public key"))?.to_vec();
  Ok((x, y))
}

/// Computes the compact ECDH shared secret: the 32-byte x-coordinate of
/// the shared curve point.
pub fn shared_secret(private_key: &[u8], public_key: &[u8]) -> Result<Vec<u8>> {
  let secret: SecretKey = decode_private_key(private_key)?;
  let public: PublicKey = decode_public_key(public_key)?;

  let shared = k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
  Ok(shared.raw_secret_bytes().to_vec())
}

/// Signs `data`, returning a 64-byte low-s compact signature.
///
/// The message is digested with SHA-256 before signing.
pub fn sign(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
  let secret: SecretKey = decode_private_key(key)?;
  let signing_key: SigningKey = SigningKey::from(secret);

  let signature: Signature = signing_key.sign(data);
  let signature: Signature = signature.normalize_s().unwrap_or(signature);
  Ok(signature.to_bytes().to_vec())
}

/// Verifies a compact signature over `data` with a SEC1 public key in
/// either form.
pub fn verify(key: &[u8], signature: &[u8], data: &[u8]) -> Result<bool> {
  let verifying_key: VerifyingKey =
    VerifyingKey::from_sec1_bytes(key).map_err(|_| invalid_point_error(key.len()))?;

  let signature: Signature = match Signature::from_slice(signature) {
    Ok(signature) => signature,
    Err(_) => return Ok(false),
  };

  Ok(verifying_key.verify(data, &signature).is_ok())
}

/// Returns `true` if `key` is a valid private scalar.
pub fn validate_private_key(key: &[u8]) -> bool {
  key.len() == PRIVATE_KEY_LENGTH && SecretKey::from_slice(key).is_ok()
}

/// Returns `true` if `key` is a valid SEC1 public key. Private keys are
/// not accepted.
pub fn validate_public_key(key: &[u8]) -> bool {
  key.len() != PRIVATE_KEY_LENGTH && PublicKey::from_sec1_bytes(key).is_ok()
}

fn decode_private_key(key: &[u8]) -> Result<SecretKey> {
  SecretKey::from_slice(key).map_err(|_| Error::operation("Invalid private key"))
}

fn decode_public_key(key: &[u8]) -> Result<PublicKey> {
  PublicKey::from_sec1_bytes(key).map_err(|_| invalid_point_error(key.len()))
}

fn invalid_point_error(length: usize) -> Error {
  Error::operation(format!(
    "Point of length {length} was invalid. Expected 33 compressed bytes or 65 uncompressed bytes"
  ))
}
