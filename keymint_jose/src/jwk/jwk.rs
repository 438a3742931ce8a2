// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::hashes::sha::Sha256;
use crypto::hashes::Digest;
use serde::Deserialize;
use serde::Serialize;
use zeroize::Zeroize;

use keymint_core::Error;
use keymint_core::Result;

use crate::jwk::JwkOperation;
use crate::jwk::JwkParams;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOct;
use crate::jwk::JwkParamsOkp;
use crate::jwk::JwkParamsRsa;
use crate::jwk::JwkType;
use crate::jwu;

/// A JSON Web Key ([RFC 7517](https://www.rfc-editor.org/rfc/rfc7517.html)).
///
/// Key material members are unpadded URL-safe base64 strings. Private
/// components are zeroized on drop. Extra members are tolerated on
/// deserialization but do not influence key identity: the thumbprint is
/// derived solely from the required member set of the key's `kty`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Jwk {
  /// Algorithm intended for use with the key.
  #[serde(skip_serializing_if = "Option::is_none")]
  alg: Option<String>,
  /// Key ID; for managed keys this equals the RFC 7638 thumbprint.
  #[serde(skip_serializing_if = "Option::is_none")]
  kid: Option<String>,
  /// Permitted key operations.
  #[serde(skip_serializing_if = "Option::is_none")]
  key_ops: Option<Vec<JwkOperation>>,
  /// Whether the key is extractable.
  #[serde(skip_serializing_if = "Option::is_none")]
  ext: Option<bool>,
  /// The `kty`-specific parameters.
  #[serde(flatten)]
  params: JwkParams,
}

impl Jwk {
  /// Creates a new `Jwk` from the given parameters.
  pub fn from_params(params: impl Into<JwkParams>) -> Self {
    Self {
      alg: None,
      kid: None,
      key_ops: None,
      ext: None,
      params: params.into(),
    }
  }

  /// Parses a `Jwk` from a JSON value.
  ///
  /// The value must be an object with a supported `kty` and all members
  /// required for that key type present as strings.
  pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
    if !value.is_object() {
      return Err(Error::type_error("Object is not a JSON Web Key"));
    }
    serde_json::from_value(value).map_err(|_| Error::type_error("Object is not a JSON Web Key"))
  }

  /// Returns the key type.
  pub const fn kty(&self) -> JwkType {
    self.params.kty()
  }

  /// Returns the value of the `alg` member.
  pub fn alg(&self) -> Option<&str> {
    self.alg.as_deref()
  }

  /// Sets the value of the `alg` member.
  pub fn set_alg(&mut self, value: impl Into<String>) {
    self.alg = Some(value.into());
  }

  /// Returns the value of the `kid` member.
  pub fn kid(&self) -> Option<&str> {
    self.kid.as_deref()
  }

  /// Sets the value of the `kid` member.
  pub fn set_kid(&mut self, value: impl Into<String>) {
    self.kid = Some(value.into());
  }

  /// Returns the value of the `key_ops` member.
  pub fn key_ops(&self) -> Option<&[JwkOperation]> {
    self.key_ops.as_deref()
  }

  /// Sets the value of the `key_ops` member.
  pub fn set_key_ops(&mut self, value: impl IntoIterator<Item = JwkOperation>) {
    self.key_ops = Some(value.into_iter().collect());
  }

  /// Returns the value of the `ext` member.
  pub fn ext(&self) -> Option<bool> {
    self.ext
  }

  /// Sets the value of the `ext` member.
  pub fn set_ext(&mut self, value: bool) {
    self.ext = Some(value);
  }

  /// Returns a reference to the `kty`-specific parameters.
  pub const fn params(&self) -> &JwkParams {
    &self.params
  }

  /// Returns a mutable reference to the `kty`-specific parameters.
  pub fn params_mut(&mut self) -> &mut JwkParams {
    &mut self.params
  }

  /// Returns the Elliptic Curve parameters, or an error if the key is not
  /// an `EC` key.
  pub fn try_ec_params(&self) -> Result<&JwkParamsEc> {
    match self.params() {
      JwkParams::Ec(params) => Ok(params),
      _ => Err(Error::type_error("Expected parameters for an EC key")),
    }
  }

  /// Returns the Octet Key Pair parameters, or an error if the key is not
  /// an `OKP` key.
  pub fn try_okp_params(&self) -> Result<&JwkParamsOkp> {
    match self.params() {
      JwkParams::Okp(params) => Ok(params),
      _ => Err(Error::type_error("Expected parameters for an OKP key")),
    }
  }

  /// Returns the octet sequence parameters, or an error if the key is not
  /// an `oct` key.
  pub fn try_oct_params(&self) -> Result<&JwkParamsOct> {
    match self.params() {
      JwkParams::Oct(params) => Ok(params),
      _ => Err(Error::type_error("Expected parameters for an oct key")),
    }
  }

  /// Returns the RSA parameters, or an error if the key is not an `RSA` key.
  pub fn try_rsa_params(&self) -> Result<&JwkParamsRsa> {
    match self.params() {
      JwkParams::Rsa(params) => Ok(params),
      _ => Err(Error::type_error("Expected parameters for an RSA key")),
    }
  }

  // ===========================================================================
  // Predicates
  // ===========================================================================

  /// Returns `true` if the key has no private components.
  pub fn is_public(&self) -> bool {
    self.params.is_public()
  }

  /// Returns `true` if the key has private components.
  pub fn is_private(&self) -> bool {
    !self.is_public()
  }

  /// Returns `true` if this is an `EC` key without a private scalar.
  pub fn is_ec_public(&self) -> bool {
    matches!(self.params(), JwkParams::Ec(params) if params.d.is_none())
  }

  /// Returns `true` if this is an `EC` key with a private scalar.
  pub fn is_ec_private(&self) -> bool {
    matches!(self.params(), JwkParams::Ec(params) if params.d.is_some())
  }

  /// Returns `true` if this is an `OKP` key without a private key member.
  pub fn is_okp_public(&self) -> bool {
    matches!(self.params(), JwkParams::Okp(params) if params.d.is_none())
  }

  /// Returns `true` if this is an `OKP` key with a private key member.
  pub fn is_okp_private(&self) -> bool {
    matches!(self.params(), JwkParams::Okp(params) if params.d.is_some())
  }

  /// Returns `true` if this is an `oct` key. Octet sequence keys are always
  /// private.
  pub fn is_oct_private(&self) -> bool {
    matches!(self.params(), JwkParams::Oct(_))
  }

  // ===========================================================================
  // Conversions
  // ===========================================================================

  /// Returns a copy with all private key components unset.
  ///
  /// Returns `None` for key types without a public form (`oct`).
  pub fn to_public(&self) -> Option<Jwk> {
    let mut public: Jwk = Jwk::from_params(self.params.to_public()?);

    if let Some(value) = self.alg() {
      public.set_alg(value);
    }
    if let Some(value) = self.kid() {
      public.set_kid(value);
    }

    Some(public)
  }

  // ===========================================================================
  // Thumbprint
  // ===========================================================================

  /// Returns the JSON string over which the thumbprint is computed.
  ///
  /// Only the members required for the key's `kty` appear, sorted
  /// lexicographically, with no whitespace ([RFC 7638 §3.2](https://www.rfc-editor.org/rfc/rfc7638.html#section-3.2)).
  pub fn thumbprint_hash_input(&self) -> String {
    match self.params() {
      JwkParams::Ec(JwkParamsEc { crv, x, y, .. }) => {
        format!(r#"{{"crv":"{crv}","kty":"EC","x":"{x}","y":"{y}"}}"#)
      }
      JwkParams::Okp(JwkParamsOkp { crv, x, .. }) => {
        format!(r#"{{"crv":"{crv}","kty":"OKP","x":"{x}"}}"#)
      }
      JwkParams::Oct(JwkParamsOct { k }) => {
        format!(r#"{{"k":"{k}","kty":"oct"}}"#)
      }
      JwkParams::Rsa(JwkParamsRsa { n, e, .. }) => {
        format!(r#"{{"e":"{e}","kty":"RSA","n":"{n}"}}"#)
      }
    }
  }

  /// Returns the SHA-256 thumbprint of the key.
  pub fn thumbprint_sha256(&self) -> [u8; 32] {
    let hash_input: String = self.thumbprint_hash_input();
    Sha256::digest(hash_input.as_bytes()).into()
  }

  /// Returns the base64url-encoded SHA-256 thumbprint of the key
  /// ([RFC 7638](https://www.rfc-editor.org/rfc/rfc7638.html)).
  pub fn thumbprint_sha256_b64(&self) -> String {
    jwu::encode_b64(self.thumbprint_sha256())
  }
}

impl Drop for Jwk {
  fn drop(&mut self) {
    self.params.zeroize();
  }
}

impl zeroize::ZeroizeOnDrop for Jwk {}
