// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Stateless cryptographic primitives.
//!
//! Every function in this module operates on plain byte slices and holds
//! no state between calls. Input validation is limited to what the
//! primitive itself requires; algorithm-level validation lives in
//! [`crate::algorithms`].

pub mod aes_ctr;
pub mod aes_gcm;
pub mod concat_kdf;
pub mod ed25519;
pub mod pbkdf2;
pub mod secp256k1;
pub mod sha;
pub mod x25519;
pub mod xchacha20;
pub mod xchacha20poly1305;

use keymint_core::Error;
use keymint_core::Result;

/// Fills a new buffer of `length` bytes from the system CSPRNG.
pub(crate) fn random_bytes(length: usize) -> Result<Vec<u8>> {
  let mut bytes: Vec<u8> = vec![0; length];
  crypto::utils::rand::fill(&mut bytes)
    .map_err(|err| Error::operation(format!("Failed to generate random bytes: {err}")))?;
  Ok(bytes)
}
