// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The unauthenticated XChaCha20 stream cipher.

use chacha20::cipher::KeyIvInit;
use chacha20::cipher::StreamCipher;
use chacha20::XChaCha20;

use keymint_core::Error;
use keymint_core::Result;

/// The length of an XChaCha20 key in bytes.
pub const KEY_LENGTH: usize = 32;

/// The length of an XChaCha20 nonce in bytes.
pub const NONCE_LENGTH: usize = 24;

/// Generates a random 32-byte key.
pub fn generate_key() -> Result<Vec<u8>> {
  super::random_bytes(KEY_LENGTH)
}

/// Encrypts `data` with a 24-byte nonce, returning output of the input
/// length. No authentication tag is produced.
pub fn encrypt(nonce: &[u8], key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
  let mut cipher: XChaCha20 = XChaCha20::new_from_slices(key, nonce).map_err(|_| {
    Error::operation(format!(
      "'key' must have length {KEY_LENGTH} and 'nonce' must have length {NONCE_LENGTH}"
    ))
  })?;

  let mut output: Vec<u8> = data.to_vec();
  cipher.apply_keystream(&mut output);
  Ok(output)
}

/// Decrypts `data`; the stream cipher is symmetric.
pub fn decrypt(nonce: &[u8], key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
  encrypt(nonce, key, data)
}
