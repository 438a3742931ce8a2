// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use keymint_core::convert::BaseEncoding;
use keymint_crypto::algorithms::Algorithm;
use keymint_crypto::algorithms::DeriveBitsOptions;
use keymint_jose::Jwk;
use keymint_storage::public_key_to_jwk;
use keymint_storage::EncryptionOptions;
use keymint_storage::GenerateKeyParams;
use keymint_storage::KeyAlgorithm;
use keymint_storage::KeyClass;
use keymint_storage::KeyManager;
use keymint_storage::KeyState;
use keymint_storage::ManagedKey;
use keymint_storage::ManagedKeyOrPair;

fn secret_key(algorithm: KeyAlgorithm, material: &[u8]) -> ManagedKeyOrPair {
  ManagedKeyOrPair::Key(ManagedKey {
    id: String::new(),
    alias: None,
    algorithm,
    kms: String::new(),
    r#type: KeyClass::Secret,
    key_ops: Vec::new(),
    extractable: true,
    state: KeyState::Enabled,
    material: Some(material.to_vec()),
  })
}

#[tokio::test]
async fn test_secp256k1_sign_verify() {
  let manager: KeyManager = KeyManager::in_memory();

  let entry: ManagedKeyOrPair = manager
    .generate_key(GenerateKeyParams::new(KeyAlgorithm::new(Algorithm::Es256K)), None)
    .await
    .unwrap();
  let uri: String = manager.get_key_uri(entry.id()).await.unwrap().to_string();

  let data: Vec<u8> = vec![51, 52, 53];
  let signature: Vec<u8> = manager.sign(&uri, &data).await.unwrap();
  assert_eq!(signature.len(), 64);
  assert!(manager.verify(&uri, &signature, &data).await.unwrap());

  let mut mutated: Vec<u8> = data.clone();
  mutated[0] ^= 1;
  assert!(!manager.verify(&uri, &signature, &mutated).await.unwrap());
}

#[tokio::test]
async fn test_x25519_key_agreement() {
  let manager: KeyManager = KeyManager::in_memory();
  let params = || GenerateKeyParams::new(KeyAlgorithm::new(Algorithm::Ecdh).with_curve("X25519"));

  let alice: ManagedKeyOrPair = manager.generate_key(params(), None).await.unwrap();
  let bob: ManagedKeyOrPair = manager.generate_key(params(), None).await.unwrap();

  let alice_public: Jwk = public_key_to_jwk(&manager.get_public_key(alice.id()).await.unwrap()).unwrap();
  let bob_public: Jwk = public_key_to_jwk(&manager.get_public_key(bob.id()).await.unwrap()).unwrap();

  let secret_a: Vec<u8> = manager
    .derive_bits(alice.id(), DeriveBitsOptions::Ecdh { public_key: bob_public }, None)
    .await
    .unwrap();
  let secret_b: Vec<u8> = manager
    .derive_bits(bob.id(), DeriveBitsOptions::Ecdh { public_key: alice_public }, None)
    .await
    .unwrap();

  assert_eq!(secret_a, secret_b);
  assert_eq!(secret_a.len(), 32);
}

#[tokio::test]
async fn test_aes_ctr_known_answer() {
  // NIST SP 800-38A F.5.1, first block, via the full facade.
  let manager: KeyManager = KeyManager::in_memory();

  let key: Vec<u8> = BaseEncoding::decode_hex("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
  let counter: Vec<u8> = BaseEncoding::decode_hex("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff").unwrap();
  let plaintext: Vec<u8> = BaseEncoding::decode_hex("6bc1bee22e409f96e93d7e117393172a").unwrap();

  let entry: ManagedKeyOrPair = manager
    .import_key(secret_key(KeyAlgorithm::new(Algorithm::A128Ctr), &key), None)
    .await
    .unwrap();

  let options = || EncryptionOptions::AesCtr {
    counter: counter.clone(),
    length: 128,
  };

  let ciphertext: Vec<u8> = manager.encrypt(entry.id(), &plaintext, options()).await.unwrap();
  assert_eq!(BaseEncoding::encode_hex(&ciphertext), "874d6191b620e3261bef6864990db6ce");
  assert_eq!(manager.decrypt(entry.id(), &ciphertext, options()).await.unwrap(), plaintext);
}

#[tokio::test]
async fn test_pbkdf2_derivation_and_failure_modes() {
  let manager: KeyManager = KeyManager::in_memory();

  let entry: ManagedKeyOrPair = manager
    .import_key(secret_key(KeyAlgorithm::new(Algorithm::Pbkdf2), b"password"), None)
    .await
    .unwrap();

  let options = |hash: &str| DeriveBitsOptions::Pbkdf2 {
    hash: hash.to_owned(),
    salt: b"salt".to_vec(),
    iterations: 1,
  };

  let derived: Vec<u8> = manager
    .derive_bits(entry.id(), options("SHA-256"), Some(256))
    .await
    .unwrap();
  assert_eq!(derived.len(), 32);
  assert_eq!(
    BaseEncoding::encode_hex(&derived),
    "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
  );

  let error = manager
    .derive_bits(entry.id(), options("SHA-256"), Some(12))
    .await
    .unwrap_err();
  assert_eq!(error.name(), "OperationError");
  assert!(error.to_string().contains("'length' must be a multiple of 8"));

  let error = manager
    .derive_bits(entry.id(), options("SHA-1"), Some(256))
    .await
    .unwrap_err();
  assert_eq!(error.name(), "TypeError");
  assert!(error.to_string().contains("Out of range"));
}

#[tokio::test]
async fn test_cross_algorithm_misuse() {
  let manager: KeyManager = KeyManager::in_memory();

  let ecdh: ManagedKeyOrPair = manager
    .generate_key(
      GenerateKeyParams::new(KeyAlgorithm::new(Algorithm::Ecdh).with_curve("X25519")),
      None,
    )
    .await
    .unwrap();
  let error = manager.sign(ecdh.id(), b"data").await.unwrap_err();
  assert_eq!(error.name(), "InvalidAccessError");
  assert!(error.to_string().contains("is not valid for ECDH"));

  let ecdsa: ManagedKeyOrPair = manager
    .generate_key(GenerateKeyParams::new(KeyAlgorithm::new(Algorithm::Es256K)), None)
    .await
    .unwrap();
  let public_key: Jwk = public_key_to_jwk(&manager.get_public_key(ecdh.id()).await.unwrap()).unwrap();
  let error = manager
    .derive_bits(ecdsa.id(), DeriveBitsOptions::Ecdh { public_key }, None)
    .await
    .unwrap_err();
  assert!(error.to_string().contains("is not valid for"));
}

#[tokio::test]
async fn test_import_idempotent_uri() {
  let manager: KeyManager = KeyManager::in_memory();

  let mut params = GenerateKeyParams::new(KeyAlgorithm::new(Algorithm::EdDsa));
  params.extractable = Some(true);
  let entry: ManagedKeyOrPair = manager.generate_key(params, None).await.unwrap();
  let exported: ManagedKeyOrPair = manager.export_key(entry.id()).await.unwrap();

  let first: ManagedKeyOrPair = manager.import_key(exported.clone(), None).await.unwrap();
  let second: ManagedKeyOrPair = manager.import_key(exported, None).await.unwrap();

  assert_ne!(first.id(), second.id());
  assert_eq!(
    manager.get_key_uri(first.id()).await.unwrap(),
    manager.get_key_uri(second.id()).await.unwrap()
  );
  assert_eq!(
    manager.get_key_uri(first.id()).await.unwrap(),
    manager.get_key_uri(entry.id()).await.unwrap()
  );
}
