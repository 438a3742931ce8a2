// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! X25519 key agreement.

use rand::rngs::OsRng;
use x25519_dalek::PublicKey;
use x25519_dalek::StaticSecret;

use keymint_core::Error;
use keymint_core::Result;

/// The length of an X25519 private or public key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Generates a new 32-byte private key.
pub fn generate_key() -> Result<Vec<u8>> {
  let secret: StaticSecret = StaticSecret::random_from_rng(OsRng);
  Ok(secret.to_bytes().to_vec())
}

/// Derives the 32-byte public key of `private_key`.
pub fn get_public_key(private_key: &[u8]) -> Result<Vec<u8>> {
  let secret: StaticSecret = decode_private_key(private_key)?;
  Ok(PublicKey::from(&secret).to_bytes().to_vec())
}

/// Computes the 32-byte shared secret between a private and a public key.
pub fn shared_secret(private_key: &[u8], public_key: &[u8]) -> Result<Vec<u8>> {
  let secret: StaticSecret = decode_private_key(private_key)?;
  let public: [u8; KEY_LENGTH] = public_key
    .try_into()
    .map_err(|_| Error::operation("Invalid public key"))?;

  Ok(secret.diffie_hellman(&PublicKey::from(public)).to_bytes().to_vec())
}

/// Validation of X25519 public keys is not implemented: any 32-byte
/// string is a valid Montgomery u-coordinate.
pub fn validate_public_key(_key: &[u8]) -> Result<bool> {
  Err(Error::operation("Not implemented."))
}

fn decode_private_key(key: &[u8]) -> Result<StaticSecret> {
  let bytes: [u8; KEY_LENGTH] = key
    .try_into()
    .map_err(|_| Error::operation("Invalid private key"))?;
  Ok(StaticSecret::from(bytes))
}

#[cfg(test)]
mod tests {
  use keymint_core::convert::BaseEncoding;

  use super::*;

  #[test]
  fn test_rfc7748_diffie_hellman_vector() {
    // RFC 7748 Section 6.1.
    let alice_private: Vec<u8> =
      BaseEncoding::decode_hex("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a").unwrap();
    let bob_private: Vec<u8> =
      BaseEncoding::decode_hex("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb").unwrap();

    let alice_public: Vec<u8> = get_public_key(&alice_private).unwrap();
    let bob_public: Vec<u8> = get_public_key(&bob_private).unwrap();

    assert_eq!(
      BaseEncoding::encode_hex(&alice_public),
      "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
    );
    assert_eq!(
      BaseEncoding::encode_hex(&bob_public),
      "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f"
    );

    let shared: Vec<u8> = shared_secret(&alice_private, &bob_public).unwrap();
    assert_eq!(
      BaseEncoding::encode_hex(&shared),
      "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742"
    );
  }

  #[test]
  fn test_key_agreement_commutativity() {
    let alice: Vec<u8> = generate_key().unwrap();
    let bob: Vec<u8> = generate_key().unwrap();

    let alice_public: Vec<u8> = get_public_key(&alice).unwrap();
    let bob_public: Vec<u8> = get_public_key(&bob).unwrap();

    let secret_a: Vec<u8> = shared_secret(&alice, &bob_public).unwrap();
    let secret_b: Vec<u8> = shared_secret(&bob, &alice_public).unwrap();
    assert_eq!(secret_a, secret_b);
    assert_eq!(secret_a.len(), 32);
  }

  #[test]
  fn test_validate_public_key_is_unimplemented() {
    let error = validate_public_key(&[0; 32]).unwrap_err();
    assert_eq!(error.to_string(), "Not implemented.");
  }
}
