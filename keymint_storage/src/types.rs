// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The managed-key data model.

use core::fmt::Display;
use core::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use zeroize::Zeroize;

use keymint_crypto::algorithms::Algorithm;
use keymint_jose::jwk::JwkOperation;

/// Whether a managed key is the public or private half of a pair, or a
/// symmetric secret.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum KeyClass {
  /// The public half of an asymmetric pair.
  #[serde(rename = "public")]
  Public,
  /// The private half of an asymmetric pair.
  #[serde(rename = "private")]
  Private,
  /// A symmetric secret key.
  #[serde(rename = "secret")]
  Secret,
}

impl KeyClass {
  /// Returns the key class as a `str` slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Public => "public",
      Self::Private => "private",
      Self::Secret => "secret",
    }
  }
}

impl Display for KeyClass {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

/// The lifecycle state of a managed key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum KeyState {
  /// The key may be used for its declared operations.
  Enabled,
  /// The key is retained but must not be used.
  Disabled,
}

/// The algorithm description recorded on a managed key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyAlgorithm {
  /// The canonical algorithm name.
  pub name: Algorithm,
  /// The curve, for elliptic-curve algorithms.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub curve: Option<String>,
  /// The key length in bits, for symmetric algorithms.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub length: Option<usize>,
  /// Whether SEC1 public keys are kept in compressed form.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub compressed_public_key: Option<bool>,
}

impl KeyAlgorithm {
  /// Creates a new algorithm description with all options unset.
  pub fn new(name: Algorithm) -> Self {
    Self {
      name,
      curve: None,
      length: None,
      compressed_public_key: None,
    }
  }

  /// Sets the curve.
  pub fn with_curve(mut self, curve: impl Into<String>) -> Self {
    self.curve = Some(curve.into());
    self
  }

  /// Sets the key length in bits.
  pub fn with_length(mut self, length: usize) -> Self {
    self.length = Some(length);
    self
  }
}

/// The metadata record of a key under management.
///
/// Only public material is ever held here; private bytes live
/// exclusively in the private-material store under the same `id`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManagedKey {
  /// The store-assigned identifier.
  pub id: String,
  /// A stable secondary reference, the `urn:jwk:` URI of the key.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alias: Option<String>,
  /// The algorithm the key belongs to.
  pub algorithm: KeyAlgorithm,
  /// The name of the KMS owning the key.
  pub kms: String,
  /// The key class.
  #[serde(rename = "type")]
  pub r#type: KeyClass,
  /// The operations the key may perform.
  pub key_ops: Vec<JwkOperation>,
  /// Whether private material may leave the KMS via export.
  pub extractable: bool,
  /// The lifecycle state.
  pub state: KeyState,
  /// Raw key material; set for public keys only.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub material: Option<Vec<u8>>,
}

/// A matched pair of managed public and private key metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManagedKeyPair {
  /// The public half, including its material.
  pub public_key: ManagedKey,
  /// The private half; its material lives in the private-material store.
  pub private_key: ManagedKey,
}

/// Either a single managed key or a managed key pair.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ManagedKeyOrPair {
  /// A single key, public or secret.
  Key(ManagedKey),
  /// An asymmetric pair.
  Pair(ManagedKeyPair),
}

impl ManagedKeyOrPair {
  /// Returns the store identifier of the entry.
  pub fn id(&self) -> &str {
    match self {
      Self::Key(key) => &key.id,
      Self::Pair(pair) => &pair.private_key.id,
    }
  }

  /// Returns the alias of the entry, if one is set.
  pub fn alias(&self) -> Option<&str> {
    match self {
      Self::Key(key) => key.alias.as_deref(),
      Self::Pair(pair) => pair.public_key.alias.as_deref().or(pair.private_key.alias.as_deref()),
    }
  }

  /// Returns the name of the KMS owning the entry.
  pub fn kms(&self) -> &str {
    match self {
      Self::Key(key) => &key.kms,
      Self::Pair(pair) => &pair.private_key.kms,
    }
  }

  /// Returns the algorithm description of the entry.
  pub fn algorithm(&self) -> &KeyAlgorithm {
    match self {
      Self::Key(key) => &key.algorithm,
      Self::Pair(pair) => &pair.private_key.algorithm,
    }
  }
}

impl From<ManagedKey> for ManagedKeyOrPair {
  fn from(key: ManagedKey) -> Self {
    Self::Key(key)
  }
}

impl From<ManagedKeyPair> for ManagedKeyOrPair {
  fn from(pair: ManagedKeyPair) -> Self {
    Self::Pair(pair)
  }
}

/// A private-material record.
///
/// The material buffer is moved in on import and zeroized when the
/// record is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManagedPrivateKey {
  /// The store-assigned identifier.
  pub id: String,
  /// Always [`KeyClass::Private`] for records in the private store.
  #[serde(rename = "type")]
  pub r#type: KeyClass,
  /// The raw private key bytes.
  pub material: Vec<u8>,
}

impl Drop for ManagedPrivateKey {
  fn drop(&mut self) {
    self.material.zeroize();
  }
}

impl zeroize::ZeroizeOnDrop for ManagedPrivateKey {}
