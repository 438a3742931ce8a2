// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Stable, content-addressed key identifiers.

use core::fmt::Display;
use core::fmt::Formatter;
use core::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use keymint_core::Error;
use keymint_core::Result;

use crate::jwk::Jwk;

/// A `urn:jwk:` key URI.
///
/// The URI is derived from the RFC 7638 thumbprint of the identified key,
/// so importing the same key material twice always yields the same URI,
/// regardless of member order or non-required members.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct KeyUri(String);

impl KeyUri {
  /// The URN scheme and namespace prefix of all key URIs.
  pub const PREFIX: &'static str = "urn:jwk:";

  /// Computes the key URI of the given key.
  pub fn from_jwk(jwk: &Jwk) -> Self {
    Self(format!("{}{}", Self::PREFIX, jwk.thumbprint_sha256_b64()))
  }

  /// Returns the thumbprint portion of the URI.
  pub fn thumbprint(&self) -> &str {
    &self.0[Self::PREFIX.len()..]
  }

  /// Returns the URI as a string slice.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for KeyUri {
  type Err = Error;

  fn from_str(string: &str) -> Result<Self> {
    if !string.starts_with(Self::PREFIX) {
      return Err(Error::type_error(format!("Invalid key URI: '{string}'")));
    }
    Ok(Self(string.to_owned()))
  }
}

impl Display for KeyUri {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for KeyUri {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

#[cfg(test)]
mod tests {
  use core::str::FromStr;

  use super::KeyUri;
  use crate::jwk::Jwk;

  #[test]
  fn test_key_uri_matches_thumbprint() {
    let jwk: Jwk = serde_json::from_str(
      r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#,
    )
    .unwrap();

    let uri: KeyUri = KeyUri::from_jwk(&jwk);
    assert_eq!(uri.to_string(), format!("urn:jwk:{}", jwk.thumbprint_sha256_b64()));
    assert_eq!(uri.thumbprint(), jwk.thumbprint_sha256_b64());
  }

  #[test]
  fn test_key_uri_determinism() {
    let a: Jwk = serde_json::from_str(
      r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#,
    )
    .unwrap();
    let b: Jwk = serde_json::from_str(
      r#"{"kid":"anything","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo","kty":"OKP","crv":"Ed25519"}"#,
    )
    .unwrap();

    assert_eq!(KeyUri::from_jwk(&a), KeyUri::from_jwk(&b));
  }

  #[test]
  fn test_key_uri_parse() {
    let uri: KeyUri = KeyUri::from_str("urn:jwk:vO8jHDKD8dynDvVp8Ea2szjIRz2V-hCMhtmJYOxO4oY").unwrap();
    assert_eq!(uri.thumbprint(), "vO8jHDKD8dynDvVp8Ea2szjIRz2V-hCMhtmJYOxO4oY");

    assert!(KeyUri::from_str("urn:uuid:not-a-jwk-uri").is_err());
  }
}
