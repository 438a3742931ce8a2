// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! PBKDF2 key derivation with an HMAC-SHA-2 pseudorandom function.

use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use keymint_core::Error;
use keymint_core::Result;

use crate::primitives::sha::Sha2;

/// Derives `length` bits of key material from a password.
///
/// `length` must be a positive multiple of 8 and `iterations` at least 1.
pub fn derive_key(hash: &str, password: &[u8], salt: &[u8], iterations: usize, length: usize) -> Result<Vec<u8>> {
  let hash: Sha2 = Sha2::try_from_name(hash)?;

  if iterations < 1 {
    return Err(Error::operation("'iterations' must be 1 or greater"));
  }
  if length == 0 {
    return Err(Error::operation("'length' must be greater than 0"));
  }
  if length % 8 != 0 {
    return Err(Error::operation("'length' must be a multiple of 8"));
  }

  let iterations: u32 = u32::try_from(iterations)
    .map_err(|_| Error::operation("'iterations' must not exceed 2^32 - 1"))?;

  let mut output: Vec<u8> = vec![0; length / 8];
  match hash {
    Sha2::Sha256 => pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output),
    Sha2::Sha384 => pbkdf2::pbkdf2_hmac::<Sha384>(password, salt, iterations, &mut output),
    Sha2::Sha512 => pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut output),
  }

  Ok(output)
}
