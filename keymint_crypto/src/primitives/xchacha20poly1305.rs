// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! XChaCha20-Poly1305 authenticated encryption.
//!
//! Unlike [`crate::primitives::aes_gcm`], ciphertext and tag are returned
//! separately: the tag depends on the additional data while the
//! ciphertext does not.

use chacha20poly1305::aead::AeadInPlace;
use chacha20poly1305::aead::KeyInit;
use chacha20poly1305::Tag;
use chacha20poly1305::XChaCha20Poly1305;
use chacha20poly1305::XNonce;

use keymint_core::Error;
use keymint_core::Result;

/// The length of a key in bytes.
pub const KEY_LENGTH: usize = 32;

/// The length of a nonce in bytes.
pub const NONCE_LENGTH: usize = 24;

/// The length of the Poly1305 tag in bytes.
pub const TAG_LENGTH: usize = 16;

/// Generates a random 32-byte key.
pub fn generate_key() -> Result<Vec<u8>> {
  super::random_bytes(KEY_LENGTH)
}

/// Encrypts `data`, returning the ciphertext and the 16-byte tag.
pub fn encrypt(
  nonce: &[u8],
  key: &[u8],
  data: &[u8],
  additional_data: Option<&[u8]>,
) -> Result<(Vec<u8>, Vec<u8>)> {
  let cipher: XChaCha20Poly1305 = cipher(key)?;
  let nonce: &XNonce = check_nonce(nonce)?;

  let mut buffer: Vec<u8> = data.to_vec();
  let tag: Tag = cipher
    .encrypt_in_place_detached(nonce, additional_data.unwrap_or_default(), &mut buffer)
    .map_err(|_| Error::operation("Encryption failed"))?;

  Ok((buffer, tag.to_vec()))
}

/// Verifies `tag` and returns the plaintext.
pub fn decrypt(
  nonce: &[u8],
  key: &[u8],
  data: &[u8],
  tag: &[u8],
  additional_data: Option<&[u8]>,
) -> Result<Vec<u8>> {
  let cipher: XChaCha20Poly1305 = cipher(key)?;
  let nonce: &XNonce = check_nonce(nonce)?;

  if tag.len() != TAG_LENGTH {
    return Err(Error::operation("Wrong tag"));
  }

  let mut buffer: Vec<u8> = data.to_vec();
  cipher
    .decrypt_in_place_detached(nonce, additional_data.unwrap_or_default(), &mut buffer, Tag::from_slice(tag))
    .map_err(|_| Error::operation("Wrong tag"))?;

  Ok(buffer)
}

fn cipher(key: &[u8]) -> Result<XChaCha20Poly1305> {
  XChaCha20Poly1305::new_from_slice(key)
    .map_err(|_| Error::operation(format!("'key' must have length {KEY_LENGTH}")))
}

fn check_nonce(nonce: &[u8]) -> Result<&XNonce> {
  if nonce.len() != NONCE_LENGTH {
    return Err(Error::operation(format!("'nonce' must have length {NONCE_LENGTH}")));
  }
  Ok(XNonce::from_slice(nonce))
}

#[cfg(test)]
mod tests {
  use super::decrypt;
  use super::encrypt;
  use super::generate_key;
  use super::TAG_LENGTH;

  #[test]
  fn test_roundtrip() {
    let key: Vec<u8> = generate_key().unwrap();
    let nonce: [u8; 24] = [3; 24];
    let data: &[u8] = b"authenticated payload";

    let (ciphertext, tag) = encrypt(&nonce, &key, data, None).unwrap();
    assert_eq!(ciphertext.len(), data.len());
    assert_eq!(tag.len(), TAG_LENGTH);
    assert_eq!(decrypt(&nonce, &key, &ciphertext, &tag, None).unwrap(), data);
  }

  #[test]
  fn test_additional_data_changes_tag_but_not_ciphertext() {
    let key: Vec<u8> = generate_key().unwrap();
    let nonce: [u8; 24] = [4; 24];
    let data: &[u8] = b"the plaintext";

    let (ciphertext_a, tag_a) = encrypt(&nonce, &key, data, Some(b"aad-one")).unwrap();
    let (ciphertext_b, tag_b) = encrypt(&nonce, &key, data, Some(b"aad-two")).unwrap();

    assert_eq!(ciphertext_a, ciphertext_b);
    assert_ne!(tag_a, tag_b);
  }

  #[test]
  fn test_wrong_tag() {
    let key: Vec<u8> = generate_key().unwrap();
    let nonce: [u8; 24] = [5; 24];

    let (ciphertext, mut tag) = encrypt(&nonce, &key, b"data", None).unwrap();
    tag[0] ^= 1;

    let error = decrypt(&nonce, &key, &ciphertext, &tag, None).unwrap_err();
    assert_eq!(error.to_string(), "Wrong tag");
  }

  #[test]
  fn test_wrong_additional_data() {
    let key: Vec<u8> = generate_key().unwrap();
    let nonce: [u8; 24] = [6; 24];

    let (ciphertext, tag) = encrypt(&nonce, &key, b"data", Some(b"aad")).unwrap();
    let error = decrypt(&nonce, &key, &ciphertext, &tag, Some(b"tampered")).unwrap_err();
    assert_eq!(error.to_string(), "Wrong tag");
  }

  #[test]
  fn test_invalid_nonce_length() {
    let key: Vec<u8> = generate_key().unwrap();
    assert!(encrypt(&[0; 12], &key, b"data", None).is_err());
  }
}
