// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The key-metadata store.

use core::fmt::Debug;

use async_trait::async_trait;
use indexmap::IndexMap;

use keymint_core::Error;
use keymint_core::Result;

use crate::types::ManagedKeyOrPair;
use crate::utils::Shared;

/// An interface for key-metadata store implementations.
///
/// Stores map ids to [`ManagedKeyOrPair`] records. Operations on the
/// same id are serialized by the store; listing preserves insertion
/// order.
#[async_trait]
pub trait KeyStore: Debug + Send + Sync {
  /// Inserts a key entry, assigning a fresh UUID when the entry carries
  /// an empty id. Fails if the id is already present.
  async fn import_key(&self, key: ManagedKeyOrPair) -> Result<String>;

  /// Returns the entry stored under `id`, if any.
  async fn get_key(&self, id: &str) -> Result<Option<ManagedKeyOrPair>>;

  /// Deletes the entry stored under `id`, reporting whether an entry was
  /// actually removed.
  async fn delete_key(&self, id: &str) -> Result<bool>;

  /// Returns all entries in insertion order.
  async fn list_keys(&self) -> Result<Vec<ManagedKeyOrPair>>;
}

/// The in-memory reference implementation of [`KeyStore`].
#[derive(Debug, Default)]
pub struct KmsKeyStore {
  keys: Shared<IndexMap<String, ManagedKeyOrPair>>,
}

impl KmsKeyStore {
  /// Creates a new, empty store.
  pub fn new() -> Self {
    Self {
      keys: Shared::new(IndexMap::new()),
    }
  }
}

#[async_trait]
impl KeyStore for KmsKeyStore {
  async fn import_key(&self, mut key: ManagedKeyOrPair) -> Result<String> {
    let id: String = if key.id().is_empty() {
      let id: String = uuid::Uuid::new_v4().to_string();
      match &mut key {
        ManagedKeyOrPair::Key(key) => key.id = id.clone(),
        ManagedKeyOrPair::Pair(pair) => {
          pair.public_key.id = id.clone();
          pair.private_key.id = id.clone();
        }
      }
      id
    } else {
      key.id().to_owned()
    };

    let mut keys = self.keys.write()?;
    if keys.contains_key(&id) {
      return Err(Error::invalid_access(format!("Key with ID '{id}' already exists.")));
    }
    keys.insert(id.clone(), key);

    Ok(id)
  }

  async fn get_key(&self, id: &str) -> Result<Option<ManagedKeyOrPair>> {
    Ok(self.keys.read()?.get(id).cloned())
  }

  async fn delete_key(&self, id: &str) -> Result<bool> {
    // shift_remove keeps the remaining entries in insertion order.
    Ok(self.keys.write()?.shift_remove(id).is_some())
  }

  async fn list_keys(&self) -> Result<Vec<ManagedKeyOrPair>> {
    Ok(self.keys.read()?.values().cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use keymint_crypto::algorithms::Algorithm;

  use super::KeyStore;
  use super::KmsKeyStore;
  use crate::types::KeyAlgorithm;
  use crate::types::KeyClass;
  use crate::types::KeyState;
  use crate::types::ManagedKey;
  use crate::types::ManagedKeyOrPair;

  fn test_key(id: &str) -> ManagedKeyOrPair {
    ManagedKeyOrPair::Key(ManagedKey {
      id: id.to_owned(),
      alias: None,
      algorithm: KeyAlgorithm::new(Algorithm::A128Ctr),
      kms: "local".to_owned(),
      r#type: KeyClass::Secret,
      key_ops: Vec::new(),
      extractable: false,
      state: KeyState::Enabled,
      material: None,
    })
  }

  #[tokio::test]
  async fn test_import_get_delete() {
    let store: KmsKeyStore = KmsKeyStore::new();

    let id: String = store.import_key(test_key("key-1")).await.unwrap();
    assert_eq!(id, "key-1");
    assert!(store.get_key("key-1").await.unwrap().is_some());
    assert!(store.get_key("missing").await.unwrap().is_none());

    assert!(store.delete_key("key-1").await.unwrap());
    assert!(!store.delete_key("key-1").await.unwrap());
  }

  #[tokio::test]
  async fn test_duplicate_id_fails() {
    let store: KmsKeyStore = KmsKeyStore::new();
    store.import_key(test_key("key-1")).await.unwrap();

    let error = store.import_key(test_key("key-1")).await.unwrap_err();
    assert!(error.to_string().contains("already exists"));
  }

  #[tokio::test]
  async fn test_auto_id_is_a_uuid() {
    let store: KmsKeyStore = KmsKeyStore::new();
    let id: String = store.import_key(test_key("")).await.unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);
  }

  #[tokio::test]
  async fn test_list_keys_preserves_insertion_order() {
    let store: KmsKeyStore = KmsKeyStore::new();
    for id in ["c", "a", "b"] {
      store.import_key(test_key(id)).await.unwrap();
    }

    let ids: Vec<String> = store
      .list_keys()
      .await
      .unwrap()
      .iter()
      .map(|entry| entry.id().to_owned())
      .collect();
    assert_eq!(ids, ["c", "a", "b"]);
  }
}
