// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_jose::jwk::Jwk;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkParams;
use keymint_jose::jwk::JwkParamsOct;
use keymint_jose::jwk::JwkParamsOkp;
use keymint_jose::jwk::JwkType;

fn oct_jwk() -> Jwk {
  let mut params: JwkParamsOct = JwkParamsOct::new();
  params.k = "AAECAwQFBgc".to_owned();
  Jwk::from_params(params)
}

#[test]
fn test_key_getset_alg() {
  let mut jwk: Jwk = oct_jwk();
  assert_eq!(jwk.alg(), None);
  jwk.set_alg("A128CTR");
  assert_eq!(jwk.alg(), Some("A128CTR"));
}

#[test]
fn test_key_getset_kid() {
  let mut jwk: Jwk = oct_jwk();
  assert_eq!(jwk.kid(), None);
  jwk.set_kid("key id");
  assert_eq!(jwk.kid(), Some("key id"));
}

#[test]
fn test_key_getset_key_ops() {
  let mut jwk: Jwk = oct_jwk();
  assert_eq!(jwk.key_ops(), None);
  jwk.set_key_ops([JwkOperation::Encrypt, JwkOperation::Decrypt]);
  assert_eq!(jwk.key_ops(), Some(&[JwkOperation::Encrypt, JwkOperation::Decrypt][..]));
}

#[test]
fn test_key_getset_ext() {
  let mut jwk: Jwk = oct_jwk();
  assert_eq!(jwk.ext(), None);
  jwk.set_ext(true);
  assert_eq!(jwk.ext(), Some(true));
}

#[test]
fn test_key_kty() {
  assert_eq!(oct_jwk().kty(), JwkType::Oct);

  let okp: Jwk = Jwk::from_params(JwkParamsOkp::new());
  assert_eq!(okp.kty(), JwkType::Okp);
  assert!(matches!(okp.params(), JwkParams::Okp(_)));
}

#[test]
fn test_serialization_roundtrip_preserves_members() {
  let jwk: Jwk = serde_json::from_str(
    r#"{"kty":"EC","crv":"secp256k1","x":"BBobbZkiC8E4C4EYekPNJkcXFCsMNHhh0AV2USy_xSs","y":"VQcPHjIQClX0b5TLluFl6jpIf9U-norWC0oEvIQRNyU","alg":"ES256K","kid":"k-1","key_ops":["sign","verify"]}"#,
  )
  .unwrap();

  let json: String = serde_json::to_string(&jwk).unwrap();
  let back: Jwk = serde_json::from_str(&json).unwrap();
  assert_eq!(jwk, back);

  assert!(json.contains(r#""kty":"EC""#));
  assert!(json.contains(r#""crv":"secp256k1""#));
  assert!(json.contains(r#""alg":"ES256K""#));
}

#[test]
fn test_extra_members_are_tolerated() {
  let jwk: Jwk = serde_json::from_str(
    r#"{"kty":"oct","k":"AAECAwQFBgc","use":"enc","custom":{"nested":true}}"#,
  )
  .unwrap();
  assert_eq!(jwk.kty(), JwkType::Oct);
}

#[test]
fn test_missing_required_members_are_rejected() {
  // An EC key without its y coordinate is not a JWK of any supported kty.
  assert!(serde_json::from_str::<Jwk>(r#"{"kty":"EC","crv":"secp256k1","x":"AQ"}"#).is_err());
  // An OKP key without x.
  assert!(serde_json::from_str::<Jwk>(r#"{"kty":"OKP","crv":"Ed25519"}"#).is_err());
  // An unknown kty.
  assert!(serde_json::from_str::<Jwk>(r#"{"kty":"PQC","pk":"AQ"}"#).is_err());
}
