// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The private-material store.

use core::fmt::Debug;

use async_trait::async_trait;
use indexmap::IndexMap;

use keymint_core::Error;
use keymint_core::Result;

use crate::types::KeyClass;
use crate::types::ManagedPrivateKey;
use crate::utils::Shared;

/// An interface for private-material store implementations.
///
/// Import takes ownership of the caller's buffer: the material is moved
/// into the store and the caller retains no live reference to it.
#[async_trait]
pub trait PrivateKeyStore: Debug + Send + Sync {
  /// Stores private material under the given class and returns the
  /// assigned id.
  async fn import_key(&self, material: Vec<u8>, r#type: KeyClass) -> Result<String>;

  /// Returns the record stored under `id`, if any.
  async fn get_key(&self, id: &str) -> Result<Option<ManagedPrivateKey>>;

  /// Deletes the record stored under `id`, reporting whether a record
  /// was actually removed.
  async fn delete_key(&self, id: &str) -> Result<bool>;
}

/// The in-memory reference implementation of [`PrivateKeyStore`].
#[derive(Debug, Default)]
pub struct KmsPrivateKeyStore {
  keys: Shared<IndexMap<String, ManagedPrivateKey>>,
}

impl KmsPrivateKeyStore {
  /// Creates a new, empty store.
  pub fn new() -> Self {
    Self {
      keys: Shared::new(IndexMap::new()),
    }
  }
}

#[async_trait]
impl PrivateKeyStore for KmsPrivateKeyStore {
  async fn import_key(&self, material: Vec<u8>, r#type: KeyClass) -> Result<String> {
    if material.is_empty() {
      return Err(Error::type_error("One or more required arguments missing: 'material'"));
    }
    if r#type != KeyClass::Private {
      return Err(Error::type_error("Private key store entries must have type 'private'."));
    }

    let id: String = uuid::Uuid::new_v4().to_string();
    let key: ManagedPrivateKey = ManagedPrivateKey {
      id: id.clone(),
      r#type,
      material,
    };

    self.keys.write()?.insert(id.clone(), key);
    Ok(id)
  }

  async fn get_key(&self, id: &str) -> Result<Option<ManagedPrivateKey>> {
    Ok(self.keys.read()?.get(id).cloned())
  }

  async fn delete_key(&self, id: &str) -> Result<bool> {
    Ok(self.keys.write()?.shift_remove(id).is_some())
  }
}

#[cfg(test)]
mod tests {
  use super::KmsPrivateKeyStore;
  use super::PrivateKeyStore;
  use crate::types::KeyClass;

  #[tokio::test]
  async fn test_import_moves_material() {
    let store: KmsPrivateKeyStore = KmsPrivateKeyStore::new();
    let material: Vec<u8> = vec![1, 2, 3, 4];

    let id: String = store.import_key(material, KeyClass::Private).await.unwrap();

    let stored = store.get_key(&id).await.unwrap().unwrap();
    assert_eq!(stored.material, [1, 2, 3, 4]);
    assert_eq!(stored.r#type, KeyClass::Private);
    assert_eq!(stored.id, id);
  }

  #[tokio::test]
  async fn test_empty_material_fails() {
    let store: KmsPrivateKeyStore = KmsPrivateKeyStore::new();
    let error = store.import_key(Vec::new(), KeyClass::Private).await.unwrap_err();
    assert_eq!(error.name(), "TypeError");
    assert!(error.to_string().contains("required arguments missing"));
  }

  #[tokio::test]
  async fn test_delete() {
    let store: KmsPrivateKeyStore = KmsPrivateKeyStore::new();
    let id: String = store.import_key(vec![9; 32], KeyClass::Private).await.unwrap();

    assert!(store.delete_key(&id).await.unwrap());
    assert!(!store.delete_key(&id).await.unwrap());
    assert!(store.get_key(&id).await.unwrap().is_none());
  }
}
