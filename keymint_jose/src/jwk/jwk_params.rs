// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use serde::Serialize;
use zeroize::Zeroize;

use keymint_core::Error;
use keymint_core::Result;

use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jwk::JwkType;

/// Algorithm-specific parameters of a JSON Web Key, tagged by `kty`.
///
/// [More Info](https://www.rfc-editor.org/rfc/rfc7518.html#section-6)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Zeroize)]
#[serde(tag = "kty")]
pub enum JwkParams {
  /// Elliptic Curve parameters.
  #[serde(rename = "EC")]
  Ec(JwkParamsEc),
  /// RSA parameters.
  #[serde(rename = "RSA")]
  Rsa(JwkParamsRsa),
  /// Octet sequence parameters.
  #[serde(rename = "oct")]
  Oct(JwkParamsOct),
  /// Octet string key pair parameters.
  #[serde(rename = "OKP")]
  Okp(JwkParamsOkp),
}

impl JwkParams {
  /// Returns the key type of the parameter set.
  pub const fn kty(&self) -> JwkType {
    match self {
      Self::Ec(_) => JwkType::Ec,
      Self::Rsa(_) => JwkType::Rsa,
      Self::Oct(_) => JwkType::Oct,
      Self::Okp(_) => JwkType::Okp,
    }
  }

  /// Returns a copy with all private components unset, or `None` for
  /// parameter sets that are always private.
  pub fn to_public(&self) -> Option<Self> {
    match self {
      Self::Ec(params) => Some(Self::Ec(params.to_public())),
      Self::Rsa(params) => Some(Self::Rsa(params.to_public())),
      Self::Okp(params) => Some(Self::Okp(params.to_public())),
      Self::Oct(_) => None,
    }
  }

  /// Returns `true` if no private components are set.
  pub fn is_public(&self) -> bool {
    match self {
      Self::Ec(params) => params.d.is_none(),
      Self::Rsa(params) => params.d.is_none(),
      Self::Okp(params) => params.d.is_none(),
      Self::Oct(_) => false,
    }
  }
}

/// Parameters for Elliptic Curve Keys.
///
/// [More Info](https://www.rfc-editor.org/rfc/rfc7518.html#section-6.2)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Zeroize)]
pub struct JwkParamsEc {
  /// The name of the curve used with the key.
  pub crv: String,
  /// The base64url-encoded x-coordinate of the curve point.
  pub x: String,
  /// The base64url-encoded y-coordinate of the curve point.
  pub y: String,
  /// The base64url-encoded private key scalar.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
}

impl JwkParamsEc {
  /// Creates new parameters with all members empty.
  pub const fn new() -> Self {
    Self {
      crv: String::new(),
      x: String::new(),
      y: String::new(),
      d: None,
    }
  }

  /// Returns a copy with the private key scalar unset.
  pub fn to_public(&self) -> Self {
    Self {
      crv: self.crv.clone(),
      x: self.x.clone(),
      y: self.y.clone(),
      d: None,
    }
  }

  /// Attempts to parse the `crv` member as a known Elliptic Curve.
  pub fn try_ec_curve(&self) -> Result<EcCurve> {
    match &*self.crv {
      "P-256" => Ok(EcCurve::P256),
      "P-384" => Ok(EcCurve::P384),
      "P-521" => Ok(EcCurve::P521),
      "secp256k1" => Ok(EcCurve::Secp256K1),
      other => Err(Error::type_error(format!("Out of range: unknown EC curve '{other}'"))),
    }
  }
}

impl Default for JwkParamsEc {
  fn default() -> Self {
    Self::new()
  }
}

impl From<JwkParamsEc> for JwkParams {
  fn from(other: JwkParamsEc) -> Self {
    Self::Ec(other)
  }
}

/// Parameters for Octet Key Pairs.
///
/// [More Info](https://www.rfc-editor.org/rfc/rfc8037.html#section-2)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Zeroize)]
pub struct JwkParamsOkp {
  /// The name of the subtype of the key pair.
  pub crv: String,
  /// The base64url-encoded public key.
  pub x: String,
  /// The base64url-encoded private key.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
}

impl JwkParamsOkp {
  /// Creates new parameters with all members empty.
  pub const fn new() -> Self {
    Self {
      crv: String::new(),
      x: String::new(),
      d: None,
    }
  }

  /// Returns a copy with the private key unset.
  pub fn to_public(&self) -> Self {
    Self {
      crv: self.crv.clone(),
      x: self.x.clone(),
      d: None,
    }
  }

  /// Attempts to parse the `crv` member as a known Edwards curve.
  pub fn try_ed_curve(&self) -> Result<EdCurve> {
    match &*self.crv {
      "Ed25519" => Ok(EdCurve::Ed25519),
      "Ed448" => Ok(EdCurve::Ed448),
      other => Err(Error::type_error(format!("Out of range: unknown Edwards curve '{other}'"))),
    }
  }

  /// Attempts to parse the `crv` member as a known key agreement curve.
  pub fn try_ecx_curve(&self) -> Result<EcxCurve> {
    match &*self.crv {
      "X25519" => Ok(EcxCurve::X25519),
      "X448" => Ok(EcxCurve::X448),
      other => Err(Error::type_error(format!(
        "Out of range: unknown key agreement curve '{other}'"
      ))),
    }
  }
}

impl Default for JwkParamsOkp {
  fn default() -> Self {
    Self::new()
  }
}

impl From<JwkParamsOkp> for JwkParams {
  fn from(other: JwkParamsOkp) -> Self {
    Self::Okp(other)
  }
}

/// Parameters for Symmetric Keys.
///
/// [More Info](https://www.rfc-editor.org/rfc/rfc7518.html#section-6.4)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Zeroize)]
pub struct JwkParamsOct {
  /// The base64url-encoded key value.
  pub k: String,
}

impl JwkParamsOct {
  /// Creates new parameters with the key value empty.
  pub const fn new() -> Self {
    Self { k: String::new() }
  }
}

impl Default for JwkParamsOct {
  fn default() -> Self {
    Self::new()
  }
}

impl From<JwkParamsOct> for JwkParams {
  fn from(other: JwkParamsOct) -> Self {
    Self::Oct(other)
  }
}

/// Parameters for RSA Keys.
///
/// Only the members required for thumbprint computation and public-key
/// predicates are modelled; additional prime factors are carried opaquely.
///
/// [More Info](https://www.rfc-editor.org/rfc/rfc7518.html#section-6.3)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Zeroize)]
pub struct JwkParamsRsa {
  /// The base64url-encoded modulus.
  pub n: String,
  /// The base64url-encoded public exponent.
  pub e: String,
  /// The base64url-encoded private exponent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>,
  /// The base64url-encoded first prime factor.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub p: Option<String>,
  /// The base64url-encoded second prime factor.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q: Option<String>,
  /// The base64url-encoded first factor CRT exponent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dp: Option<String>,
  /// The base64url-encoded second factor CRT exponent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dq: Option<String>,
  /// The base64url-encoded first CRT coefficient.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub qi: Option<String>,
}

impl JwkParamsRsa {
  /// Returns a copy with all private components unset.
  pub fn to_public(&self) -> Self {
    Self {
      n: self.n.clone(),
      e: self.e.clone(),
      d: None,
      p: None,
      q: None,
      dp: None,
      dq: None,
      qi: None,
    }
  }
}

impl From<JwkParamsRsa> for JwkParams {
  fn from(other: JwkParamsRsa) -> Self {
    Self::Rsa(other)
  }
}
