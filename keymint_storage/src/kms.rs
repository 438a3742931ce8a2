// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The key management system interface.

use core::fmt::Debug;

use async_trait::async_trait;

use keymint_core::Result;
use keymint_crypto::algorithms::DeriveBitsOptions;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::KeyUri;

use crate::types::KeyAlgorithm;
use crate::types::ManagedKey;
use crate::types::ManagedKeyOrPair;

/// Options for generating a key inside a KMS.
#[derive(Clone, Debug)]
pub struct GenerateKeyParams {
  /// The algorithm (and its options) to generate a key for.
  pub algorithm: KeyAlgorithm,
  /// The key operations recorded on the generated key.
  pub key_operations: Option<Vec<JwkOperation>>,
  /// Whether private material may later be exported.
  pub extractable: Option<bool>,
}

impl GenerateKeyParams {
  /// Creates new parameters for the given algorithm.
  pub fn new(algorithm: KeyAlgorithm) -> Self {
    Self {
      algorithm,
      key_operations: None,
      extractable: None,
    }
  }
}

/// Algorithm options of a symmetric encryption or decryption.
#[derive(Clone, Debug)]
pub enum EncryptionOptions {
  /// AES in counter mode.
  AesCtr {
    /// The 16-byte initial counter block.
    counter: Vec<u8>,
    /// The number of rightmost counter bits that increment.
    length: usize,
  },
}

/// An interface for key management system implementations.
///
/// A KMS owns the stored key material exclusively: operations take key
/// references and resolve them internally, and private material only
/// leaves through [`Kms::export_key`] on extractable keys.
///
/// See [`LocalKms`][crate::local_kms::LocalKms] for the in-memory
/// reference implementation.
#[async_trait]
pub trait Kms: Debug + Send + Sync {
  /// Returns the name under which this KMS registers.
  fn kms_name(&self) -> &str;

  /// Generates a new key or key pair and stores it.
  async fn generate_key(&self, params: GenerateKeyParams) -> Result<ManagedKeyOrPair>;

  /// Imports external key material, assigning a fresh id.
  async fn import_key(&self, key: ManagedKeyOrPair) -> Result<ManagedKeyOrPair>;

  /// Exports a key including its private material, honoring the
  /// `extractable` flag.
  async fn export_key(&self, key_ref: &str) -> Result<ManagedKeyOrPair>;

  /// Returns the metadata stored under the given reference, if any.
  async fn get_key(&self, key_ref: &str) -> Result<Option<ManagedKeyOrPair>>;

  /// Returns the public half of a key pair.
  async fn get_public_key(&self, key_ref: &str) -> Result<ManagedKey>;

  /// Returns the stable `urn:jwk:` URI of a key.
  async fn get_key_uri(&self, key_ref: &str) -> Result<KeyUri>;

  /// Deletes a key: private material first, metadata second.
  async fn delete_key(&self, key_ref: &str) -> Result<bool>;

  /// Signs `data` with the referenced private key.
  async fn sign(&self, key_ref: &str, data: &[u8]) -> Result<Vec<u8>>;

  /// Verifies a signature with the referenced public key.
  async fn verify(&self, key_ref: &str, signature: &[u8], data: &[u8]) -> Result<bool>;

  /// Encrypts `data` with the referenced secret key.
  async fn encrypt(&self, key_ref: &str, data: &[u8], options: EncryptionOptions) -> Result<Vec<u8>>;

  /// Decrypts `data` with the referenced secret key.
  async fn decrypt(&self, key_ref: &str, data: &[u8], options: EncryptionOptions) -> Result<Vec<u8>>;

  /// Derives raw bits from the referenced base key.
  async fn derive_bits(
    &self,
    base_key_ref: &str,
    algorithm: DeriveBitsOptions,
    length: Option<usize>,
  ) -> Result<Vec<u8>>;

  /// Computes a digest over `data`.
  async fn digest(&self, hash: &str, data: &[u8]) -> Result<Vec<u8>>;
}
