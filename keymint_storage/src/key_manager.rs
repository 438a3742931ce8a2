// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The key manager facade.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use keymint_core::Error;
use keymint_core::Result;
use keymint_crypto::algorithms::DeriveBitsOptions;
use keymint_jose::KeyUri;

use crate::key_store::KeyStore;
use crate::key_store::KmsKeyStore;
use crate::kms::EncryptionOptions;
use crate::kms::GenerateKeyParams;
use crate::kms::Kms;
use crate::local_kms::LocalKms;
use crate::types::ManagedKey;
use crate::types::ManagedKeyOrPair;

/// Construction options of a [`KeyManager`].
#[derive(Default)]
pub struct KeyManagerOptions {
  /// The metadata store of the manager. Required.
  pub store: Option<Box<dyn KeyStore>>,
  /// The named KMS instances to register. Defaults to a single local
  /// KMS on in-memory stores.
  pub kms: Option<BTreeMap<String, Arc<dyn Kms>>>,
}

impl KeyManagerOptions {
  /// Creates options with the given store and the default KMS set.
  pub fn new(store: Box<dyn KeyStore>) -> Self {
    Self {
      store: Some(store),
      kms: None,
    }
  }

  /// Registers a KMS under its own name.
  pub fn with_kms(mut self, kms: Arc<dyn Kms>) -> Self {
    self
      .kms
      .get_or_insert_with(BTreeMap::new)
      .insert(kms.kms_name().to_owned(), kms);
    self
  }
}

/// Routes key operations to the KMS owning the referenced key.
///
/// The manager keeps its own metadata store of every key it has handed
/// out, mapping ids and `urn:jwk:` URIs back to the owning KMS. The
/// store is internal: it is not part of the public surface.
#[derive(Debug)]
pub struct KeyManager {
  store: Box<dyn KeyStore>,
  kms: BTreeMap<String, Arc<dyn Kms>>,
}

impl KeyManager {
  /// Creates a new manager.
  ///
  /// A missing `store` is an error; a missing `kms` map registers a
  /// default [`LocalKms`] under its own name.
  pub fn new(options: KeyManagerOptions) -> Result<Self> {
    let store: Box<dyn KeyStore> = options
      .store
      .ok_or_else(|| Error::type_error("Required parameter was missing: 'store'"))?;

    let kms: BTreeMap<String, Arc<dyn Kms>> = match options.kms {
      Some(kms) if !kms.is_empty() => kms,
      _ => {
        let mut registry: BTreeMap<String, Arc<dyn Kms>> = BTreeMap::new();
        registry.insert(LocalKms::DEFAULT_NAME.to_owned(), Arc::new(LocalKms::new()));
        registry
      }
    };

    Ok(Self { store, kms })
  }

  /// Creates a manager on a fresh in-memory store and the default KMS.
  pub fn in_memory() -> Self {
    // new() cannot fail when a store is supplied
    Self::new(KeyManagerOptions::new(Box::new(KmsKeyStore::new()))).expect("store is set")
  }

  /// Returns the names of all registered KMS instances.
  pub fn list_kms(&self) -> Vec<String> {
    self.kms.keys().cloned().collect()
  }

  /// Resolves the target KMS: by name when given, otherwise the sole
  /// registered instance.
  fn get_kms(&self, kms_name: Option<&str>) -> Result<&Arc<dyn Kms>> {
    match kms_name {
      Some(name) => self.kms.get(name),
      None if self.kms.len() == 1 => self.kms.values().next(),
      None => None,
    }
    .ok_or_else(|| {
      Error::not_supported(format!(
        "Unknown key management system: '{}'",
        kms_name.unwrap_or_default()
      ))
    })
  }

  /// Resolves a key reference in the manager's store.
  async fn find_key(&self, key_ref: &str) -> Result<ManagedKeyOrPair> {
    if let Some(entry) = self.store.get_key(key_ref).await? {
      return Ok(entry);
    }

    if key_ref.starts_with(KeyUri::PREFIX) {
      for entry in self.store.list_keys().await? {
        if entry.alias() == Some(key_ref) {
          return Ok(entry);
        }
      }
    }

    Err(Error::operation("Key not found"))
  }

  /// Resolves a key reference together with the KMS owning the key.
  async fn find_key_and_kms(&self, key_ref: &str) -> Result<(ManagedKeyOrPair, &Arc<dyn Kms>)> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;
    let kms: &Arc<dyn Kms> = self.get_kms(Some(entry.kms()))?;
    Ok((entry, kms))
  }

  /// Generates a key in the target KMS and records it.
  pub async fn generate_key(&self, params: GenerateKeyParams, kms: Option<&str>) -> Result<ManagedKeyOrPair> {
    let kms: &Arc<dyn Kms> = self.get_kms(kms)?;
    let entry: ManagedKeyOrPair = kms.generate_key(params).await?;
    self.store.import_key(entry.clone()).await?;
    debug!(kms = %entry.kms(), id = %entry.id(), "generated key");
    Ok(entry)
  }

  /// Imports key material into the target KMS and records it.
  pub async fn import_key(&self, key: ManagedKeyOrPair, kms: Option<&str>) -> Result<ManagedKeyOrPair> {
    let kms: &Arc<dyn Kms> = self.get_kms(kms)?;
    let entry: ManagedKeyOrPair = kms.import_key(key).await?;
    self.store.import_key(entry.clone()).await?;
    debug!(kms = %entry.kms(), id = %entry.id(), "imported key");
    Ok(entry)
  }

  /// Returns the metadata of a key reference, if known.
  pub async fn get_key(&self, key_ref: &str) -> Result<Option<ManagedKeyOrPair>> {
    match self.find_key(key_ref).await {
      Ok(entry) => Ok(Some(entry)),
      Err(_) => Ok(None),
    }
  }

  /// Exports a key, including private material when extractable.
  pub async fn export_key(&self, key_ref: &str) -> Result<ManagedKeyOrPair> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.export_key(entry.id()).await
  }

  /// Returns the public half of a key pair.
  pub async fn get_public_key(&self, key_ref: &str) -> Result<ManagedKey> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.get_public_key(entry.id()).await
  }

  /// Returns the stable `urn:jwk:` URI of a key.
  pub async fn get_key_uri(&self, key_ref: &str) -> Result<KeyUri> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.get_key_uri(entry.id()).await
  }

  /// Signs `data` with the referenced private key.
  pub async fn sign(&self, key_ref: &str, data: &[u8]) -> Result<Vec<u8>> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.sign(entry.id(), data).await
  }

  /// Verifies a signature with the referenced public key.
  pub async fn verify(&self, key_ref: &str, signature: &[u8], data: &[u8]) -> Result<bool> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.verify(entry.id(), signature, data).await
  }

  /// Encrypts `data` with the referenced secret key.
  pub async fn encrypt(&self, key_ref: &str, data: &[u8], options: EncryptionOptions) -> Result<Vec<u8>> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.encrypt(entry.id(), data, options).await
  }

  /// Decrypts `data` with the referenced secret key.
  pub async fn decrypt(&self, key_ref: &str, data: &[u8], options: EncryptionOptions) -> Result<Vec<u8>> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    kms.decrypt(entry.id(), data, options).await
  }

  /// Derives raw bits from the referenced base key.
  pub async fn derive_bits(
    &self,
    base_key_ref: &str,
    algorithm: DeriveBitsOptions,
    length: Option<usize>,
  ) -> Result<Vec<u8>> {
    let (entry, kms) = self.find_key_and_kms(base_key_ref).await?;
    kms.derive_bits(entry.id(), algorithm, length).await
  }

  /// Computes a digest over `data` in the target KMS.
  pub async fn digest(&self, hash: &str, data: &[u8], kms: Option<&str>) -> Result<Vec<u8>> {
    self.get_kms(kms)?.digest(hash, data).await
  }

  /// Deletes a key from the owning KMS and the manager's records.
  pub async fn delete_key(&self, key_ref: &str) -> Result<bool> {
    let (entry, kms) = self.find_key_and_kms(key_ref).await?;
    let deleted: bool = kms.delete_key(entry.id()).await?;
    self.store.delete_key(entry.id()).await?;
    Ok(deleted)
  }
}

impl core::fmt::Debug for KeyManagerOptions {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("KeyManagerOptions")
      .field("store", &self.store.is_some())
      .field("kms", &self.kms.as_ref().map(|kms| kms.keys().collect::<Vec<_>>()))
      .finish()
  }
}
