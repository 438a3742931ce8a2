// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The bridge between JOSE key descriptions and the multicodec table.

use keymint_core::convert::BaseEncoding;
use keymint_core::Error;
use keymint_core::Result;

use crate::jwk::Jwk;
use crate::jwk::JwkParams;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOkp;
use crate::jwu;

/// One entry of the multicodec table: a name, a registered code and the
/// varint header bytes prepended to raw key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Multicodec {
  /// The registered multicodec name.
  pub name: &'static str,
  /// The registered multicodec code.
  pub code: u32,
  /// The unsigned-varint encoding of `code`.
  pub header: [u8; 2],
}

/// The multicodec entries with a JOSE counterpart.
///
/// Codes and headers follow the multicodec registry; every entry maps to
/// exactly one (kty, crv, visibility) triple.
pub const MULTICODEC_TABLE: &[Multicodec] = &[
  Multicodec {
    name: "ed25519-pub",
    code: 0xed,
    header: [0xed, 0x01],
  },
  Multicodec {
    name: "ed25519-priv",
    code: 0x1300,
    header: [0x80, 0x26],
  },
  Multicodec {
    name: "x25519-pub",
    code: 0xec,
    header: [0xec, 0x01],
  },
  Multicodec {
    name: "x25519-priv",
    code: 0x1302,
    header: [0x82, 0x26],
  },
  Multicodec {
    name: "secp256k1-pub",
    code: 0xe7,
    header: [0xe7, 0x01],
  },
  Multicodec {
    name: "secp256k1-priv",
    code: 0x1301,
    header: [0x81, 0x26],
  },
];

fn lookup_name(name: &str) -> Option<&'static Multicodec> {
  MULTICODEC_TABLE.iter().find(|entry| entry.name == name)
}

fn lookup_code(code: u32) -> Option<&'static Multicodec> {
  MULTICODEC_TABLE.iter().find(|entry| entry.code == code)
}

/// Returns the multicodec entry describing the given key.
pub fn jwk_to_multicodec(jwk: &Jwk) -> Result<&'static Multicodec> {
  let name: Option<&str> = match jwk.params() {
    JwkParams::Okp(JwkParamsOkp { crv, d, .. }) => match (crv.as_str(), d.is_some()) {
      ("Ed25519", false) => Some("ed25519-pub"),
      ("Ed25519", true) => Some("ed25519-priv"),
      ("X25519", false) => Some("x25519-pub"),
      ("X25519", true) => Some("x25519-priv"),
      _ => None,
    },
    JwkParams::Ec(JwkParamsEc { crv, d, .. }) => match (crv.as_str(), d.is_some()) {
      ("secp256k1", false) => Some("secp256k1-pub"),
      ("secp256k1", true) => Some("secp256k1-priv"),
      _ => None,
    },
    _ => None,
  };

  name.and_then(lookup_name).ok_or_else(|| {
    Error::not_supported(format!(
      "Unsupported JOSE to Multicodec conversion: '{}'",
      jwk.kty()
    ))
  })
}

/// Returns a bare JWK skeleton for a multicodec entry selected by `name`
/// or `code`.
///
/// Exactly one of the two selectors must be given. The skeleton has the
/// appropriate `kty` and `crv` set and empty key material members.
pub fn multicodec_to_jwk(name: Option<&str>, code: Option<u32>) -> Result<Jwk> {
  let entry: &Multicodec = match (name, code) {
    (Some(name), None) => lookup_name(name)
      .ok_or_else(|| Error::not_supported(format!("Unsupported Multicodec to JOSE conversion: '{name}'")))?,
    (None, Some(code)) => lookup_code(code)
      .ok_or_else(|| Error::not_supported(format!("Unsupported Multicodec to JOSE conversion: '0x{code:x}'")))?,
    _ => {
      return Err(Error::type_error(
        "Either 'name' or 'code' must be defined, but not both.",
      ))
    }
  };

  let jwk: Jwk = match entry.name {
    "ed25519-pub" => Jwk::from_params(JwkParamsOkp {
      crv: "Ed25519".to_owned(),
      x: String::new(),
      d: None,
    }),
    "ed25519-priv" => Jwk::from_params(JwkParamsOkp {
      crv: "Ed25519".to_owned(),
      x: String::new(),
      d: Some(String::new()),
    }),
    "x25519-pub" => Jwk::from_params(JwkParamsOkp {
      crv: "X25519".to_owned(),
      x: String::new(),
      d: None,
    }),
    "x25519-priv" => Jwk::from_params(JwkParamsOkp {
      crv: "X25519".to_owned(),
      x: String::new(),
      d: Some(String::new()),
    }),
    "secp256k1-pub" => Jwk::from_params(JwkParamsEc {
      crv: "secp256k1".to_owned(),
      x: String::new(),
      y: String::new(),
      d: None,
    }),
    _ => Jwk::from_params(JwkParamsEc {
      crv: "secp256k1".to_owned(),
      x: String::new(),
      y: String::new(),
      d: Some(String::new()),
    }),
  };

  Ok(jwk)
}

/// Builds the multibase identifier of a public key: `z` followed by the
/// base58-btc encoding of the multicodec header and the raw key material.
///
/// For secp256k1 the key material is the concatenation of the x and y
/// coordinates; for `OKP` keys it is the public key member alone.
pub fn public_key_to_multibase_id(jwk: &Jwk) -> Result<String> {
  let (name, material): (&'static str, Vec<u8>) = match jwk.params() {
    JwkParams::Okp(JwkParamsOkp { crv, x, .. }) => {
      let name: &'static str = match crv.as_str() {
        "Ed25519" => "ed25519-pub",
        "X25519" => "x25519-pub",
        other => return Err(Error::not_supported(format!("Unsupported public key curve: '{other}'"))),
      };
      (name, jwu::decode_b64(x)?)
    }
    JwkParams::Ec(JwkParamsEc { crv, x, y, .. }) => {
      if crv != "secp256k1" {
        return Err(Error::not_supported(format!("Unsupported public key curve: '{crv}'")));
      }
      let mut material: Vec<u8> = jwu::decode_b64(x)?;
      material.extend_from_slice(&jwu::decode_b64(y)?);
      ("secp256k1-pub", material)
    }
    params => {
      return Err(Error::not_supported(format!(
        "Unsupported public key type: '{}'",
        params.kty()
      )))
    }
  };

  // lookup_name cannot fail for table-owned names
  let entry: &Multicodec = lookup_name(name).expect("table entry");

  let mut bytes: Vec<u8> = Vec::with_capacity(entry.header.len() + material.len());
  bytes.extend_from_slice(&entry.header);
  bytes.extend_from_slice(&material);

  Ok(BaseEncoding::encode_multibase(bytes))
}

#[cfg(test)]
mod tests {
  use keymint_core::convert::BaseEncoding;

  use super::jwk_to_multicodec;
  use super::multicodec_to_jwk;
  use super::public_key_to_multibase_id;
  use crate::jwk::Jwk;
  use crate::jwu;

  const ED25519_PUBLIC: &str =
    r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#;

  #[test]
  fn test_jwk_to_multicodec() {
    let jwk: Jwk = serde_json::from_str(ED25519_PUBLIC).unwrap();
    let entry = jwk_to_multicodec(&jwk).unwrap();
    assert_eq!(entry.name, "ed25519-pub");
    assert_eq!(entry.code, 0xed);

    let private: Jwk = serde_json::from_str(
      r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo","d":"nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A"}"#,
    )
    .unwrap();
    assert_eq!(jwk_to_multicodec(&private).unwrap().name, "ed25519-priv");
  }

  #[test]
  fn test_jwk_to_multicodec_unsupported() {
    let oct: Jwk = serde_json::from_str(r#"{"kty":"oct","k":"AAECAwQFBgc"}"#).unwrap();
    let error = jwk_to_multicodec(&oct).unwrap_err();
    assert!(error.to_string().contains("Unsupported JOSE to Multicodec conversion"));
  }

  #[test]
  fn test_multicodec_to_jwk_by_name_and_code() {
    let by_name: Jwk = multicodec_to_jwk(Some("x25519-pub"), None).unwrap();
    let by_code: Jwk = multicodec_to_jwk(None, Some(0xec)).unwrap();
    assert_eq!(by_name, by_code);
    assert_eq!(by_name.try_okp_params().unwrap().crv, "X25519");
  }

  #[test]
  fn test_multicodec_to_jwk_selector_rules() {
    let both = multicodec_to_jwk(Some("ed25519-pub"), Some(0xed)).unwrap_err();
    assert_eq!(
      both.to_string(),
      "Either 'name' or 'code' must be defined, but not both."
    );

    let neither = multicodec_to_jwk(None, None).unwrap_err();
    assert_eq!(neither.name(), "TypeError");

    let unknown = multicodec_to_jwk(Some("p256-pub"), None).unwrap_err();
    assert!(unknown.to_string().contains("Unsupported Multicodec to JOSE conversion"));
  }

  #[test]
  fn test_public_key_to_multibase_id_ed25519() {
    let jwk: Jwk = serde_json::from_str(ED25519_PUBLIC).unwrap();
    let id: String = public_key_to_multibase_id(&jwk).unwrap();

    // All ed25519-pub multibase ids share the "z6Mk" prefix.
    assert!(id.starts_with("z6Mk"), "unexpected prefix: {id}");

    let decoded: Vec<u8> = BaseEncoding::decode_multibase(&id).unwrap();
    assert_eq!(&decoded[..2], &[0xed, 0x01]);
    assert_eq!(
      decoded[2..],
      jwu::decode_b64("11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo").unwrap()
    );
  }

  #[test]
  fn test_public_key_to_multibase_id_secp256k1_concatenates_coordinates() {
    let jwk: Jwk = serde_json::from_str(
      r#"{"kty":"EC","crv":"secp256k1","x":"BBobbZkiC8E4C4EYekPNJkcXFCsMNHhh0AV2USy_xSs","y":"VQcPHjIQClX0b5TLluFl6jpIf9U-norWC0oEvIQRNyU"}"#,
    )
    .unwrap();

    let id: String = public_key_to_multibase_id(&jwk).unwrap();
    let decoded: Vec<u8> = BaseEncoding::decode_multibase(id).unwrap();
    assert_eq!(&decoded[..2], &[0xe7, 0x01]);
    assert_eq!(decoded.len(), 2 + 64);
  }

  #[test]
  fn test_public_key_to_multibase_id_unsupported() {
    let oct: Jwk = serde_json::from_str(r#"{"kty":"oct","k":"AAECAwQFBgc"}"#).unwrap();
    let error = public_key_to_multibase_id(&oct).unwrap_err();
    assert!(error.to_string().contains("Unsupported public key type"));

    let p256: Jwk = serde_json::from_str(
      r#"{"kty":"EC","crv":"P-256","x":"f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU","y":"x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"}"#,
    )
    .unwrap();
    let error = public_key_to_multibase_id(&p256).unwrap_err();
    assert!(error.to_string().contains("Unsupported public key curve"));
  }
}
