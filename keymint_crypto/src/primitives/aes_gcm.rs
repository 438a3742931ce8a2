// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! AES-GCM authenticated encryption.
//!
//! The ciphertext and the 16-byte authentication tag travel together:
//! `encrypt` returns `ciphertext || tag` and `decrypt` expects the same
//! layout.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::Aead;
use aes_gcm::aead::KeyInit;
use aes_gcm::aead::Payload;
use aes_gcm::Aes128Gcm;
use aes_gcm::Aes256Gcm;
use aes_gcm::AesGcm;
use aes_gcm::Nonce;

use keymint_core::Error;
use keymint_core::Result;

type Aes192Gcm = AesGcm<aes::Aes192, U12>;

/// The length of the authentication tag in bits.
pub const TAG_LENGTH: usize = 128;

/// The length of the initialization vector in bytes.
pub const IV_LENGTH: usize = 12;

/// Generates a random AES key of `length` bits.
pub fn generate_key(length: usize) -> Result<Vec<u8>> {
  if !matches!(length, 128 | 192 | 256) {
    return Err(Error::type_error("Out of range: 'length' must be one of: 128, 192, 256"));
  }
  super::random_bytes(length / 8)
}

/// Encrypts `data`, returning the ciphertext with the tag appended.
///
/// `tag_length` is in bits; only the full 128-bit tag is supported.
pub fn encrypt(
  iv: &[u8],
  key: &[u8],
  data: &[u8],
  tag_length: Option<usize>,
  additional_data: Option<&[u8]>,
) -> Result<Vec<u8>> {
  check_tag_length(tag_length)?;
  check_iv_length(iv)?;

  let payload: Payload<'_, '_> = Payload {
    msg: data,
    aad: additional_data.unwrap_or_default(),
  };
  let nonce: &Nonce<U12> = Nonce::from_slice(iv);

  let result = match key.len() {
    16 => cipher::<Aes128Gcm>(key)?.encrypt(nonce, payload),
    24 => cipher::<Aes192Gcm>(key)?.encrypt(nonce, payload),
    32 => cipher::<Aes256Gcm>(key)?.encrypt(nonce, payload),
    other => return Err(Error::operation(format!("Invalid key length: {other} bytes"))),
  };

  result.map_err(|_| Error::operation("Encryption failed"))
}

/// Verifies the trailing tag and returns the plaintext.
pub fn decrypt(
  iv: &[u8],
  key: &[u8],
  data: &[u8],
  tag_length: Option<usize>,
  additional_data: Option<&[u8]>,
) -> Result<Vec<u8>> {
  check_tag_length(tag_length)?;
  check_iv_length(iv)?;

  if data.len() < TAG_LENGTH / 8 {
    return Err(Error::operation("The provided data is too short to contain a tag"));
  }

  let payload: Payload<'_, '_> = Payload {
    msg: data,
    aad: additional_data.unwrap_or_default(),
  };
  let nonce: &Nonce<U12> = Nonce::from_slice(iv);

  let result = match key.len() {
    16 => cipher::<Aes128Gcm>(key)?.decrypt(nonce, payload),
    24 => cipher::<Aes192Gcm>(key)?.decrypt(nonce, payload),
    32 => cipher::<Aes256Gcm>(key)?.decrypt(nonce, payload),
    other => return Err(Error::operation(format!("Invalid key length: {other} bytes"))),
  };

  result.map_err(|_| Error::operation("Wrong tag"))
}

fn cipher<C: KeyInit>(key: &[u8]) -> Result<C> {
  C::new_from_slice(key).map_err(|_| Error::operation(format!("Invalid key length: {} bytes", key.len())))
}

fn check_tag_length(tag_length: Option<usize>) -> Result<()> {
  match tag_length {
    None | Some(TAG_LENGTH) => Ok(()),
    Some(other) => Err(Error::operation(format!(
      "'tagLength' must be {TAG_LENGTH}, but {other} was requested"
    ))),
  }
}

fn check_iv_length(iv: &[u8]) -> Result<()> {
  if iv.len() != IV_LENGTH {
    return Err(Error::operation(format!("'iv' must have length {IV_LENGTH}")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::decrypt;
  use super::encrypt;
  use super::generate_key;

  #[test]
  fn test_roundtrip_all_key_sizes() {
    let iv: [u8; 12] = [7; 12];
    let data: &[u8] = b"secret payload";

    for length in [128, 192, 256] {
      let key: Vec<u8> = generate_key(length).unwrap();
      let ciphertext: Vec<u8> = encrypt(&iv, &key, data, None, None).unwrap();
      assert_eq!(ciphertext.len(), data.len() + 16);
      assert_eq!(decrypt(&iv, &key, &ciphertext, None, None).unwrap(), data);
    }
  }

  #[test]
  fn test_roundtrip_with_additional_data() {
    let iv: [u8; 12] = [1; 12];
    let key: Vec<u8> = generate_key(256).unwrap();
    let aad: &[u8] = b"header";

    let ciphertext: Vec<u8> = encrypt(&iv, &key, b"data", None, Some(aad)).unwrap();
    assert_eq!(decrypt(&iv, &key, &ciphertext, None, Some(aad)).unwrap(), b"data");

    // Verifying against different additional data must fail.
    let error = decrypt(&iv, &key, &ciphertext, None, Some(b"other")).unwrap_err();
    assert_eq!(error.to_string(), "Wrong tag");
  }

  #[test]
  fn test_tampered_ciphertext_fails() {
    let iv: [u8; 12] = [2; 12];
    let key: Vec<u8> = generate_key(128).unwrap();

    let mut ciphertext: Vec<u8> = encrypt(&iv, &key, b"data", None, None).unwrap();
    ciphertext[0] ^= 1;

    let error = decrypt(&iv, &key, &ciphertext, None, None).unwrap_err();
    assert_eq!(error.to_string(), "Wrong tag");
    assert_eq!(error.name(), "OperationError");
  }

  #[test]
  fn test_unsupported_tag_length() {
    let key: Vec<u8> = generate_key(128).unwrap();
    let error = encrypt(&[0; 12], &key, b"data", Some(96), None).unwrap_err();
    assert!(error.to_string().contains("'tagLength'"));
  }

  #[test]
  fn test_invalid_iv_length() {
    let key: Vec<u8> = generate_key(128).unwrap();
    let error = encrypt(&[0; 16], &key, b"data", None, None).unwrap_err();
    assert!(error.to_string().contains("'iv' must have length 12"));
  }
}
