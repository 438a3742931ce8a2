// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Token utilities.

use keymint_core::convert::BaseEncoding;
use keymint_core::Result;

/// Encodes `data` as unpadded URL-safe base64, the encoding of all JWK
/// key material members.
pub fn encode_b64(data: impl AsRef<[u8]>) -> String {
  BaseEncoding::encode_b64(data)
}

/// Decodes unpadded URL-safe base64 `data`.
pub fn decode_b64(data: impl AsRef<str>) -> Result<Vec<u8>> {
  BaseEncoding::decode_b64(data)
}

#[cfg(test)]
mod tests {
  use super::decode_b64;
  use super::encode_b64;

  #[test]
  fn test_b64_roundtrip() {
    let data: Vec<u8> = (0..=255).collect();
    assert_eq!(decode_b64(encode_b64(&data)).unwrap(), data);
  }
}
