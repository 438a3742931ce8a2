// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! AES in counter mode with a configurable counter width.
//!
//! The 16-byte counter block is split into a nonce portion and a counter
//! portion: only the rightmost `length` bits increment (and wrap) between
//! blocks, the remaining bits stay fixed for the whole message.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::Block;
use aes::cipher::BlockEncrypt;
use aes::cipher::KeyInit;
use aes::Aes128;
use aes::Aes192;
use aes::Aes256;

use keymint_core::Error;
use keymint_core::Result;

/// The length of the counter block in bytes.
pub const COUNTER_LENGTH: usize = 16;

/// Generates a random AES key of `length` bits.
pub fn generate_key(length: usize) -> Result<Vec<u8>> {
  if !matches!(length, 128 | 192 | 256) {
    return Err(Error::type_error("Out of range: 'length' must be one of: 128, 192, 256"));
  }
  super::random_bytes(length / 8)
}

/// Encrypts `data`, returning a ciphertext of the same length.
///
/// `length` is the number of rightmost counter-block bits that increment,
/// in the range `[1, 128]`.
pub fn encrypt(counter: &[u8], length: usize, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
  let counter: [u8; COUNTER_LENGTH] = counter
    .try_into()
    .map_err(|_| Error::operation(format!("'counter' must have length {COUNTER_LENGTH}")))?;

  if length == 0 || length > 128 {
    return Err(Error::operation("'length' must be in the range [1, 128]"));
  }

  match key.len() {
    16 => Ok(ctr_xor(&Aes128::new(GenericArray::from_slice(key)), counter, length, data)),
    24 => Ok(ctr_xor(&Aes192::new(GenericArray::from_slice(key)), counter, length, data)),
    32 => Ok(ctr_xor(&Aes256::new(GenericArray::from_slice(key)), counter, length, data)),
    other => Err(Error::operation(format!("Invalid key length: {other} bytes"))),
  }
}

/// Decrypts `data`; counter mode is symmetric.
pub fn decrypt(counter: &[u8], length: usize, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
  encrypt(counter, length, key, data)
}

fn ctr_xor<C: BlockEncrypt>(cipher: &C, counter: [u8; COUNTER_LENGTH], length: usize, data: &[u8]) -> Vec<u8> {
  let mut counter: u128 = u128::from_be_bytes(counter);
  let mut output: Vec<u8> = data.to_vec();

  for chunk in output.chunks_mut(COUNTER_LENGTH) {
    let mut block: Block<C> = Default::default();
    block.copy_from_slice(&counter.to_be_bytes());
    cipher.encrypt_block(&mut block);

    for (byte, pad) in chunk.iter_mut().zip(block.iter()) {
      *byte ^= pad;
    }

    counter = increment_rightmost_bits(counter, length);
  }

  output
}

// Increments the rightmost `bits` bits of the counter block, wrapping
// within that field and leaving the nonce bits untouched.
fn increment_rightmost_bits(counter: u128, bits: usize) -> u128 {
  let mask: u128 = if bits == 128 { u128::MAX } else { (1u128 << bits) - 1 };
  (counter & !mask) | (counter.wrapping_add(1) & mask)
}
