// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Conversions between the byte and string representations used at the
//! JOSE boundary.

use multibase::Base;

use crate::error::Error;
use crate::error::Result;

/// Byte-to-string and string-to-byte encodings used throughout the library.
///
/// All base64 is unpadded and URL-safe; hex is lowercase.
pub struct BaseEncoding;

impl BaseEncoding {
  /// Encodes `data` as unpadded URL-safe base64.
  pub fn encode_b64(data: impl AsRef<[u8]>) -> String {
    Base::Base64Url.encode(data)
  }

  /// Decodes unpadded URL-safe base64 `data`.
  pub fn decode_b64(data: impl AsRef<str>) -> Result<Vec<u8>> {
    Base::Base64Url
      .decode(data)
      .map_err(|err| Error::type_error(format!("Invalid base64url input: {err}")))
  }

  /// Encodes `data` as lowercase hex.
  pub fn encode_hex(data: impl AsRef<[u8]>) -> String {
    Base::Base16Lower.encode(data)
  }

  /// Decodes lowercase hex `data`.
  pub fn decode_hex(data: impl AsRef<str>) -> Result<Vec<u8>> {
    Base::Base16Lower
      .decode(data)
      .map_err(|err| Error::type_error(format!("Invalid hex input: {err}")))
  }

  /// Encodes `data` as base58-btc.
  pub fn encode_base58(data: impl AsRef<[u8]>) -> String {
    Base::Base58Btc.encode(data)
  }

  /// Decodes base58-btc `data`.
  pub fn decode_base58(data: impl AsRef<str>) -> Result<Vec<u8>> {
    Base::Base58Btc
      .decode(data)
      .map_err(|err| Error::type_error(format!("Invalid base58 input: {err}")))
  }

  /// Encodes `data` as a multibase string with the base58-btc (`z`) prefix.
  pub fn encode_multibase(data: impl AsRef<[u8]>) -> String {
    multibase::encode(Base::Base58Btc, data)
  }

  /// Decodes a multibase string, accepting any base known to the multibase table.
  pub fn decode_multibase(data: impl AsRef<str>) -> Result<Vec<u8>> {
    multibase::decode(data)
      .map(|(_, bytes)| bytes)
      .map_err(|err| Error::type_error(format!("Invalid multibase input: {err}")))
  }
}

/// A tagged value polymorphic over the representations accepted at the
/// public API boundary.
///
/// Each `to_*` method converts into one target cell of the conversion
/// table; pairs without a defined conversion fail with a [`Error::Type`]
/// naming the unsupported pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Convert {
  /// Raw bytes.
  Bytes(Vec<u8>),
  /// A lowercase hex string.
  Hex(String),
  /// An unpadded URL-safe base64 string.
  Base64Url(String),
  /// A UTF-8 string.
  Utf8(String),
  /// A JSON value.
  Json(serde_json::Value),
}

impl Convert {
  /// Returns the name of the source representation.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Bytes(_) => "Bytes",
      Self::Hex(_) => "Hex",
      Self::Base64Url(_) => "Base64Url",
      Self::Utf8(_) => "Utf8",
      Self::Json(_) => "Json",
    }
  }

  /// Converts into raw bytes.
  ///
  /// Supported from every source representation; JSON values convert via
  /// their canonical serialization.
  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    match self {
      Self::Bytes(bytes) => Ok(bytes.clone()),
      Self::Hex(hex) => BaseEncoding::decode_hex(hex),
      Self::Base64Url(b64) => BaseEncoding::decode_b64(b64),
      Self::Utf8(string) => Ok(string.as_bytes().to_vec()),
      Self::Json(value) => Ok(crate::json::canonicalize(value)?.into_bytes()),
    }
  }

  /// Converts into a lowercase hex string.
  pub fn to_hex(&self) -> Result<String> {
    match self {
      Self::Bytes(bytes) => Ok(BaseEncoding::encode_hex(bytes)),
      Self::Hex(hex) => Ok(hex.clone()),
      Self::Base64Url(b64) => Ok(BaseEncoding::encode_hex(BaseEncoding::decode_b64(b64)?)),
      Self::Utf8(_) | Self::Json(_) => Err(self.unsupported("Hex")),
    }
  }

  /// Converts into an unpadded URL-safe base64 string.
  pub fn to_base64_url(&self) -> Result<String> {
    match self {
      Self::Bytes(bytes) => Ok(BaseEncoding::encode_b64(bytes)),
      Self::Hex(hex) => Ok(BaseEncoding::encode_b64(BaseEncoding::decode_hex(hex)?)),
      Self::Base64Url(b64) => Ok(b64.clone()),
      Self::Utf8(string) => Ok(BaseEncoding::encode_b64(string.as_bytes())),
      Self::Json(value) => Ok(BaseEncoding::encode_b64(crate::json::canonicalize(value)?.as_bytes())),
    }
  }

  /// Converts into a UTF-8 string.
  pub fn to_utf8(&self) -> Result<String> {
    match self {
      Self::Bytes(bytes) => {
        String::from_utf8(bytes.clone()).map_err(|err| Error::type_error(format!("Invalid UTF-8 input: {err}")))
      }
      Self::Base64Url(b64) => {
        let bytes: Vec<u8> = BaseEncoding::decode_b64(b64)?;
        String::from_utf8(bytes).map_err(|err| Error::type_error(format!("Invalid UTF-8 input: {err}")))
      }
      Self::Utf8(string) => Ok(string.clone()),
      Self::Json(value) => crate::json::canonicalize(value),
      Self::Hex(_) => Err(self.unsupported("Utf8")),
    }
  }

  /// Converts into a JSON value, parsing string-like sources.
  pub fn to_json_value(&self) -> Result<serde_json::Value> {
    match self {
      Self::Utf8(string) => {
        serde_json::from_str(string).map_err(|err| Error::type_error(format!("Invalid JSON input: {err}")))
      }
      Self::Base64Url(b64) => {
        let bytes: Vec<u8> = BaseEncoding::decode_b64(b64)?;
        serde_json::from_slice(&bytes).map_err(|err| Error::type_error(format!("Invalid JSON input: {err}")))
      }
      Self::Json(value) => Ok(value.clone()),
      Self::Bytes(_) | Self::Hex(_) => Err(self.unsupported("Json")),
    }
  }

  fn unsupported(&self, target: &str) -> Error {
    Error::type_error(format!("Conversion from {} to {target} is not supported", self.kind()))
  }
}
