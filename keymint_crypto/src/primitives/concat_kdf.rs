// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The single-step Concat KDF (using SHA-256) as defined in Section 5.8.1
//! of NIST.800-56A.

use crypto::hashes::sha::Sha256;
use crypto::hashes::Digest;

use keymint_core::Error;
use keymint_core::Result;

/// One field of the `OtherInfo` input.
///
/// Numbers carry bit lengths and encode as fixed 32-bit big-endian
/// values; strings and bytes are length-prefixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KdfInput {
  /// Raw bytes.
  Bytes(Vec<u8>),
  /// A UTF-8 string, hashed over its byte representation.
  Utf8(String),
  /// A number, such as a bit length.
  Number(u64),
}

impl From<&str> for KdfInput {
  fn from(value: &str) -> Self {
    Self::Utf8(value.to_owned())
  }
}

impl From<Vec<u8>> for KdfInput {
  fn from(value: Vec<u8>) -> Self {
    Self::Bytes(value)
  }
}

impl From<u64> for KdfInput {
  fn from(value: u64) -> Self {
    Self::Number(value)
  }
}

/// The `OtherInfo` fixed-info fields of the derivation
/// ([RFC 7518 §4.6.2](https://www.rfc-editor.org/rfc/rfc7518.html#section-4.6.2)).
#[derive(Clone, Debug)]
pub struct OtherInfo {
  /// The `AlgorithmID` field.
  pub algorithm_id: KdfInput,
  /// The `PartyUInfo` field.
  pub party_u_info: KdfInput,
  /// The `PartyVInfo` field.
  pub party_v_info: KdfInput,
  /// The `SuppPubInfo` field; must be a number of bits.
  pub supp_pub_info: KdfInput,
  /// The optional `SuppPrivInfo` field.
  pub supp_priv_info: Option<KdfInput>,
}

/// Serializes the `OtherInfo` fields into the fixed-info byte string.
///
/// `AlgorithmID`, `PartyUInfo` and `PartyVInfo` are prefixed with their
/// 32-bit big-endian length; `SuppPubInfo` must be a number and encodes
/// as an unprefixed fixed-length value.
pub fn compute_other_info(other_info: &OtherInfo) -> Result<Vec<u8>> {
  let mut output: Vec<u8> = Vec::new();

  append_variable_length(&mut output, &other_info.algorithm_id);
  append_variable_length(&mut output, &other_info.party_u_info);
  append_variable_length(&mut output, &other_info.party_v_info);
  append_fixed_length(&mut output, &other_info.supp_pub_info)?;

  if let Some(supp_priv_info) = &other_info.supp_priv_info {
    append_variable_length(&mut output, supp_priv_info);
  }

  Ok(output)
}

/// Derives `key_data_len` bits of key material from a shared secret.
///
/// Only a single hash round is supported: a `key_data_len` beyond the
/// SHA-256 output length is rejected.
pub fn derive_key(shared_secret: &[u8], key_data_len: usize, other_info: &OtherInfo) -> Result<Vec<u8>> {
  if key_data_len % 8 != 0 {
    return Err(Error::operation("'length' must be a multiple of 8"));
  }
  if key_data_len > 256 {
    return Err(Error::not_supported("rounds not supported"));
  }

  let other_info: Vec<u8> = compute_other_info(other_info)?;

  let mut digest: Sha256 = Sha256::new();
  digest.update(1u32.to_be_bytes());
  digest.update(shared_secret);
  digest.update(&other_info);

  let mut derived_key: Vec<u8> = digest.finalize().to_vec();
  derived_key.truncate(key_data_len / 8);

  Ok(derived_key)
}

fn append_variable_length(output: &mut Vec<u8>, input: &KdfInput) {
  // Numbers take their fixed 32-bit form before the length prefix is
  // applied, so numeric and string inputs are treated uniformly.
  let bytes: Vec<u8> = match input {
    KdfInput::Bytes(bytes) => bytes.clone(),
    KdfInput::Utf8(string) => string.as_bytes().to_vec(),
    KdfInput::Number(value) => (*value as u32).to_be_bytes().to_vec(),
  };

  output.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
  output.extend_from_slice(&bytes);
}

fn append_fixed_length(output: &mut Vec<u8>, input: &KdfInput) -> Result<()> {
  match input {
    KdfInput::Number(value) => {
      output.extend_from_slice(&(*value as u32).to_be_bytes());
      Ok(())
    }
    _ => Err(Error::type_error("Fixed length input must be a number")),
  }
}
