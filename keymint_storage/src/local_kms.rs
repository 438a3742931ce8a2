// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The in-memory reference KMS.

use core::fmt::Debug;
use core::fmt::Formatter;

use async_trait::async_trait;
use tracing::debug;

use keymint_core::Error;
use keymint_core::Result;
use keymint_crypto::algorithms;
use keymint_crypto::algorithms::algorithm_provider;
use keymint_crypto::algorithms::Algorithm;
use keymint_crypto::algorithms::CipherParams;
use keymint_crypto::algorithms::CryptoAlgorithm;
use keymint_crypto::algorithms::DeriveBitsOptions;
use keymint_crypto::algorithms::DeriveBitsParams;
use keymint_crypto::algorithms::KeyGenParams;
use keymint_crypto::algorithms::SignParams;
use keymint_crypto::algorithms::VerifyParams;
use keymint_crypto::primitives::ed25519;
use keymint_crypto::primitives::secp256k1;
use keymint_crypto::primitives::sha::Sha2;
use keymint_crypto::primitives::x25519;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkParams;
use keymint_jose::Jwk;
use keymint_jose::KeyUri;

use crate::key_store::KeyStore;
use crate::key_store::KmsKeyStore;
use crate::kms::EncryptionOptions;
use crate::kms::GenerateKeyParams;
use crate::kms::Kms;
use crate::private_key_store::KmsPrivateKeyStore;
use crate::private_key_store::PrivateKeyStore;
use crate::types::KeyAlgorithm;
use crate::types::KeyClass;
use crate::types::KeyState;
use crate::types::ManagedKey;
use crate::types::ManagedKeyOrPair;
use crate::types::ManagedKeyPair;
use crate::types::ManagedPrivateKey;

/// The in-memory reference implementation of [`Kms`].
///
/// Key metadata and private material are held in two injected stores;
/// private material is written before metadata, and a failed metadata
/// write rolls the material back out.
pub struct LocalKms {
  kms_name: String,
  key_store: Box<dyn KeyStore>,
  private_key_store: Box<dyn PrivateKeyStore>,
}

impl LocalKms {
  /// The name the default local KMS registers under.
  pub const DEFAULT_NAME: &'static str = "local";

  /// Creates a KMS named [`Self::DEFAULT_NAME`] on fresh in-memory stores.
  pub fn new() -> Self {
    Self::with_stores(
      Self::DEFAULT_NAME,
      Box::new(KmsKeyStore::new()),
      Box::new(KmsPrivateKeyStore::new()),
    )
  }

  /// Creates a KMS on caller-provided stores.
  pub fn with_stores(
    kms_name: impl Into<String>,
    key_store: Box<dyn KeyStore>,
    private_key_store: Box<dyn PrivateKeyStore>,
  ) -> Self {
    Self {
      kms_name: kms_name.into(),
      key_store,
      private_key_store,
    }
  }

  /// Resolves a key reference: first as a store id, then as a
  /// `urn:jwk:` alias.
  async fn find_key(&self, key_ref: &str) -> Result<ManagedKeyOrPair> {
    if let Some(entry) = self.key_store.get_key(key_ref).await? {
      return Ok(entry);
    }

    if key_ref.starts_with(KeyUri::PREFIX) {
      for entry in self.key_store.list_keys().await? {
        if entry.alias() == Some(key_ref) {
          return Ok(entry);
        }
      }
    }

    Err(Error::operation("Key not found"))
  }

  /// Reconstitutes the JWK of a managed key, fetching private material
  /// from the private store when the metadata carries none.
  async fn resolve_jwk(&self, key: &ManagedKey) -> Result<Jwk> {
    if key.material.is_some() {
      return to_jwk(key, None);
    }

    let record: ManagedPrivateKey = self
      .private_key_store
      .get_key(&key.id)
      .await?
      .ok_or_else(|| Error::operation("Required property missing: 'material'"))?;

    to_jwk(key, Some(&record.material))
  }

  /// Returns the JWK used for private-key operations on an entry.
  async fn private_jwk(&self, entry: &ManagedKeyOrPair) -> Result<Jwk> {
    match entry {
      ManagedKeyOrPair::Pair(pair) => self.resolve_jwk(&pair.private_key).await,
      ManagedKeyOrPair::Key(key) => self.resolve_jwk(key).await,
    }
  }

  /// Returns the JWK used for public-key operations on an entry.
  async fn public_jwk(&self, entry: &ManagedKeyOrPair) -> Result<Jwk> {
    match entry {
      ManagedKeyOrPair::Pair(pair) => self.resolve_jwk(&pair.public_key).await,
      ManagedKeyOrPair::Key(key) => self.resolve_jwk(key).await,
    }
  }

  /// Writes metadata after private material, rolling the material back
  /// out when the metadata write fails.
  async fn store_entry(&self, mut entry: ManagedKeyOrPair) -> Result<ManagedKeyOrPair> {
    match self.key_store.import_key(entry.clone()).await {
      Ok(id) => {
        // Adopt the store-assigned id; entries backed by private
        // material already carry it.
        match &mut entry {
          ManagedKeyOrPair::Key(key) => key.id = id,
          ManagedKeyOrPair::Pair(pair) => {
            pair.public_key.id = id.clone();
            pair.private_key.id = id;
          }
        }
        Ok(entry)
      }
      Err(error) => {
        let _ = self.private_key_store.delete_key(entry.id()).await;
        Err(error)
      }
    }
  }

  fn managed_key(
    &self,
    id: String,
    alias: String,
    algorithm: KeyAlgorithm,
    r#type: KeyClass,
    key_ops: Vec<JwkOperation>,
    extractable: bool,
    material: Option<Vec<u8>>,
  ) -> ManagedKey {
    ManagedKey {
      id,
      alias: Some(alias),
      algorithm,
      kms: self.kms_name.clone(),
      r#type,
      key_ops,
      extractable,
      state: KeyState::Enabled,
      material,
    }
  }
}

impl Default for LocalKms {
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for LocalKms {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("LocalKms").field("kms_name", &self.kms_name).finish()
  }
}

#[async_trait]
impl Kms for LocalKms {
  fn kms_name(&self) -> &str {
    &self.kms_name
  }

  async fn generate_key(&self, params: GenerateKeyParams) -> Result<ManagedKeyOrPair> {
    let algorithm: KeyAlgorithm = normalize_algorithm(params.algorithm);
    let provider: &dyn CryptoAlgorithm = algorithm_provider(algorithm.name);

    let mut options: KeyGenParams = KeyGenParams::new(algorithm.name);
    options.curve = algorithm.curve.clone();
    options.length = algorithm.length;
    options.compressed_public_key = algorithm.compressed_public_key;
    options.key_operations = params.key_operations;

    let jwk: Jwk = provider.generate_key(&options)?;
    let alias: String = KeyUri::from_jwk(&jwk).to_string();
    let key_ops: Vec<JwkOperation> = jwk.key_ops().unwrap_or_default().to_vec();
    let extractable: bool = params.extractable.unwrap_or(false);

    let entry: ManagedKeyOrPair = match jwk.params() {
      JwkParams::Oct(_) => {
        let material: Vec<u8> = algorithms::expand_oct_jwk(&jwk)?;
        let id: String = self.private_key_store.import_key(material, KeyClass::Private).await?;
        ManagedKeyOrPair::Key(self.managed_key(id, alias, algorithm.clone(), KeyClass::Secret, key_ops, extractable, None))
      }
      _ => {
        let private_material: Vec<u8> = expand_private_material(&jwk, &algorithm)?;
        let public_material: Vec<u8> = derive_public_material(&algorithm, &private_material)?;

        let id: String = self.private_key_store.import_key(private_material, KeyClass::Private).await?;
        let private_key: ManagedKey = self.managed_key(
          id.clone(),
          alias.clone(),
          algorithm.clone(),
          KeyClass::Private,
          key_ops.clone(),
          extractable,
          None,
        );
        let public_key: ManagedKey = self.managed_key(
          id,
          alias,
          algorithm.clone(),
          KeyClass::Public,
          key_ops,
          true,
          Some(public_material),
        );
        ManagedKeyOrPair::Pair(ManagedKeyPair { public_key, private_key })
      }
    };

    let entry: ManagedKeyOrPair = self.store_entry(entry).await?;
    debug!(kms = %self.kms_name, id = %entry.id(), algorithm = %algorithm.name.name(), "generated key");
    Ok(entry)
  }

  async fn import_key(&self, key: ManagedKeyOrPair) -> Result<ManagedKeyOrPair> {
    let entry: ManagedKeyOrPair = match key {
      ManagedKeyOrPair::Pair(mut pair) => {
        if pair.private_key.r#type != KeyClass::Private || pair.public_key.r#type != KeyClass::Public {
          return Err(Error::type_error(
            "Import failed: key pair 'type' must be 'private, public'.",
          ));
        }

        let private_material: Vec<u8> = pair
          .private_key
          .material
          .take()
          .ok_or_else(|| Error::type_error("One or more required arguments missing: 'material'"))?;
        let public_material: Vec<u8> = pair
          .public_key
          .material
          .clone()
          .ok_or_else(|| Error::type_error("One or more required arguments missing: 'material'"))?;

        let algorithm: KeyAlgorithm = normalize_algorithm(pair.private_key.algorithm.clone());
        check_pair_consistency(&algorithm, &private_material, &public_material)?;

        let alias: String = KeyUri::from_jwk(&public_material_jwk(&algorithm, &public_material)?).to_string();
        let extractable: bool = pair.private_key.extractable;
        let key_ops: Vec<JwkOperation> = pair.private_key.key_ops.clone();

        let id: String = self.private_key_store.import_key(private_material, KeyClass::Private).await?;
        let private_key: ManagedKey = self.managed_key(
          id.clone(),
          alias.clone(),
          algorithm.clone(),
          KeyClass::Private,
          key_ops,
          extractable,
          None,
        );
        let public_key: ManagedKey = self.managed_key(
          id,
          alias,
          algorithm,
          KeyClass::Public,
          pair.public_key.key_ops.clone(),
          true,
          Some(public_material),
        );
        ManagedKeyOrPair::Pair(ManagedKeyPair { public_key, private_key })
      }
      ManagedKeyOrPair::Key(mut key) => {
        let algorithm: KeyAlgorithm = normalize_algorithm(key.algorithm.clone());

        match key.r#type {
          KeyClass::Public => {
            let material: Vec<u8> = key
              .material
              .clone()
              .ok_or_else(|| Error::type_error("One or more required arguments missing: 'material'"))?;
            let alias: String = KeyUri::from_jwk(&public_material_jwk(&algorithm, &material)?).to_string();

            // The metadata store assigns the id for public-only entries.
            let public_key: ManagedKey =
              self.managed_key(String::new(), alias, algorithm, KeyClass::Public, key.key_ops.clone(), true, Some(material));
            ManagedKeyOrPair::Key(public_key)
          }
          KeyClass::Private | KeyClass::Secret => {
            let material: Vec<u8> = key
              .material
              .take()
              .ok_or_else(|| Error::type_error("One or more required arguments missing: 'material'"))?;

            let r#type: KeyClass = key.r#type;
            let stand_in: ManagedKey = ManagedKey {
              material: Some(material.clone()),
              ..key.clone()
            };
            let alias: String = KeyUri::from_jwk(&to_jwk(&stand_in, None)?).to_string();

            let id: String = self.private_key_store.import_key(material, KeyClass::Private).await?;
            ManagedKeyOrPair::Key(self.managed_key(
              id,
              alias,
              algorithm,
              r#type,
              key.key_ops.clone(),
              key.extractable,
              None,
            ))
          }
        }
      }
    };

    let entry: ManagedKeyOrPair = self.store_entry(entry).await?;
    debug!(kms = %self.kms_name, id = %entry.id(), "imported key");
    Ok(entry)
  }

  async fn export_key(&self, key_ref: &str) -> Result<ManagedKeyOrPair> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;

    match entry {
      ManagedKeyOrPair::Key(key) if key.r#type == KeyClass::Public => Ok(ManagedKeyOrPair::Key(key)),
      ManagedKeyOrPair::Key(mut key) => {
        if !key.extractable {
          return Err(Error::invalid_access(format!("Key '{}' is not extractable.", key.id)));
        }
        let record: ManagedPrivateKey = self
          .private_key_store
          .get_key(&key.id)
          .await?
          .ok_or_else(|| Error::operation("Required property missing: 'material'"))?;
        key.material = Some(record.material.clone());
        Ok(ManagedKeyOrPair::Key(key))
      }
      ManagedKeyOrPair::Pair(mut pair) => {
        if !pair.private_key.extractable {
          return Err(Error::invalid_access(format!(
            "Key '{}' is not extractable.",
            pair.private_key.id
          )));
        }
        let record: ManagedPrivateKey = self
          .private_key_store
          .get_key(&pair.private_key.id)
          .await?
          .ok_or_else(|| Error::operation("Required property missing: 'material'"))?;
        pair.private_key.material = Some(record.material.clone());
        Ok(ManagedKeyOrPair::Pair(pair))
      }
    }
  }

  async fn get_key(&self, key_ref: &str) -> Result<Option<ManagedKeyOrPair>> {
    match self.find_key(key_ref).await {
      Ok(entry) => Ok(Some(entry)),
      Err(_) => Ok(None),
    }
  }

  async fn get_public_key(&self, key_ref: &str) -> Result<ManagedKey> {
    match self.find_key(key_ref).await? {
      ManagedKeyOrPair::Pair(pair) => Ok(pair.public_key),
      ManagedKeyOrPair::Key(key) if key.r#type == KeyClass::Public => Ok(key),
      ManagedKeyOrPair::Key(_) => Err(Error::invalid_access("The referenced key has no public key.")),
    }
  }

  async fn get_key_uri(&self, key_ref: &str) -> Result<KeyUri> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;

    if let Some(alias) = entry.alias() {
      return alias.parse();
    }

    let jwk: Jwk = self.public_jwk(&entry).await?;
    Ok(KeyUri::from_jwk(&jwk))
  }

  async fn delete_key(&self, key_ref: &str) -> Result<bool> {
    let entry: ManagedKeyOrPair = match self.find_key(key_ref).await {
      Ok(entry) => entry,
      Err(_) => return Ok(false),
    };

    // Private material goes first so a failure never leaves orphaned
    // material behind deleted metadata.
    self.private_key_store.delete_key(entry.id()).await?;
    let deleted: bool = self.key_store.delete_key(entry.id()).await?;

    debug!(kms = %self.kms_name, id = %entry.id(), "deleted key");
    Ok(deleted)
  }

  async fn sign(&self, key_ref: &str, data: &[u8]) -> Result<Vec<u8>> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;
    let provider: &dyn CryptoAlgorithm = algorithm_provider(entry.algorithm().name);
    let jwk: Jwk = self.private_jwk(&entry).await?;

    provider.sign(&SignParams { key: &jwk, data })
  }

  async fn verify(&self, key_ref: &str, signature: &[u8], data: &[u8]) -> Result<bool> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;
    let provider: &dyn CryptoAlgorithm = algorithm_provider(entry.algorithm().name);
    let jwk: Jwk = self.public_jwk(&entry).await?;

    provider.verify(&VerifyParams {
      key: &jwk,
      signature,
      data,
    })
  }

  async fn encrypt(&self, key_ref: &str, data: &[u8], options: EncryptionOptions) -> Result<Vec<u8>> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;
    let provider: &dyn CryptoAlgorithm = algorithm_provider(entry.algorithm().name);
    let jwk: Jwk = self.private_jwk(&entry).await?;

    let EncryptionOptions::AesCtr { counter, length } = options;
    provider.encrypt(&CipherParams {
      key: &jwk,
      data,
      counter: &counter,
      length,
    })
  }

  async fn decrypt(&self, key_ref: &str, data: &[u8], options: EncryptionOptions) -> Result<Vec<u8>> {
    let entry: ManagedKeyOrPair = self.find_key(key_ref).await?;
    let provider: &dyn CryptoAlgorithm = algorithm_provider(entry.algorithm().name);
    let jwk: Jwk = self.private_jwk(&entry).await?;

    let EncryptionOptions::AesCtr { counter, length } = options;
    provider.decrypt(&CipherParams {
      key: &jwk,
      data,
      counter: &counter,
      length,
    })
  }

  async fn derive_bits(
    &self,
    base_key_ref: &str,
    algorithm: DeriveBitsOptions,
    length: Option<usize>,
  ) -> Result<Vec<u8>> {
    let entry: ManagedKeyOrPair = self.find_key(base_key_ref).await?;
    let provider: &dyn CryptoAlgorithm = algorithm_provider(entry.algorithm().name);
    let base_key: Jwk = self.private_jwk(&entry).await?;

    provider.derive_bits(&DeriveBitsParams {
      algorithm,
      base_key: &base_key,
      length,
    })
  }

  async fn digest(&self, hash: &str, data: &[u8]) -> Result<Vec<u8>> {
    Ok(Sha2::try_from_name(hash)?.digest(data))
  }
}

/// Reconstitutes the JWK of a managed key whose material lives in the
/// metadata record, i.e. a public key.
pub fn public_key_to_jwk(key: &ManagedKey) -> Result<Jwk> {
  to_jwk(key, None)
}

/// Fills in the defaults the algorithm name implies.
fn normalize_algorithm(mut algorithm: KeyAlgorithm) -> KeyAlgorithm {
  match algorithm.name {
    Algorithm::Ecdsa | Algorithm::Es256K => {
      algorithm.curve.get_or_insert_with(|| "secp256k1".to_owned());
      // Compressed SEC1 public keys are the default for secp256k1.
      algorithm.compressed_public_key.get_or_insert(true);
    }
    Algorithm::EdDsa => {
      algorithm.curve.get_or_insert_with(|| "Ed25519".to_owned());
    }
    Algorithm::Ecdh => {
      if algorithm.curve.as_deref() == Some("secp256k1") {
        algorithm.compressed_public_key.get_or_insert(true);
      }
    }
    Algorithm::A128Ctr => {
      algorithm.length.get_or_insert(128);
    }
    Algorithm::A192Ctr => {
      algorithm.length.get_or_insert(192);
    }
    Algorithm::A256Ctr => {
      algorithm.length.get_or_insert(256);
    }
    Algorithm::AesCtr | Algorithm::Pbkdf2 => {}
  }
  algorithm
}

fn is_secp256k1(algorithm: &KeyAlgorithm) -> bool {
  matches!(algorithm.name, Algorithm::Ecdsa | Algorithm::Es256K)
    || (algorithm.name == Algorithm::Ecdh && algorithm.curve.as_deref() == Some("secp256k1"))
}

/// Reconstitutes a JWK from key metadata and raw material.
fn to_jwk(key: &ManagedKey, material_override: Option<&[u8]>) -> Result<Jwk> {
  let material: &[u8] = material_override
    .or(key.material.as_deref())
    .ok_or_else(|| Error::operation("Required property missing: 'material'"))?;

  let private: bool = key.r#type != KeyClass::Public;
  let mut jwk: Jwk = match key.algorithm.name {
    Algorithm::Ecdsa | Algorithm::Es256K => {
      if private {
        algorithms::encode_secp256k1_private_jwk(material)?
      } else {
        algorithms::encode_secp256k1_public_jwk(material)?
      }
    }
    Algorithm::EdDsa => {
      if private {
        algorithms::encode_ed25519_private_jwk(material)?
      } else {
        algorithms::encode_ed25519_public_jwk(material)
      }
    }
    Algorithm::Ecdh => {
      if key.algorithm.curve.as_deref() == Some("secp256k1") {
        if private {
          algorithms::encode_secp256k1_private_jwk(material)?
        } else {
          algorithms::encode_secp256k1_public_jwk(material)?
        }
      } else if private {
        algorithms::encode_x25519_private_jwk(material)?
      } else {
        algorithms::encode_x25519_public_jwk(material)
      }
    }
    Algorithm::AesCtr | Algorithm::A128Ctr | Algorithm::A192Ctr | Algorithm::A256Ctr | Algorithm::Pbkdf2 => {
      algorithms::encode_oct_jwk(material)
    }
  };

  if let Some(alg) = jwk_alg_of(&key.algorithm, material.len()) {
    jwk.set_alg(alg);
  }
  if !key.key_ops.is_empty() {
    jwk.set_key_ops(key.key_ops.clone());
  }
  let kid: String = jwk.thumbprint_sha256_b64();
  jwk.set_kid(kid);

  Ok(jwk)
}

fn jwk_alg_of(algorithm: &KeyAlgorithm, material_len: usize) -> Option<String> {
  match algorithm.name {
    Algorithm::Ecdsa | Algorithm::Es256K => Some("ES256K".to_owned()),
    Algorithm::EdDsa => Some("EdDSA".to_owned()),
    Algorithm::A128Ctr => Some("A128CTR".to_owned()),
    Algorithm::A192Ctr => Some("A192CTR".to_owned()),
    Algorithm::A256Ctr => Some("A256CTR".to_owned()),
    Algorithm::AesCtr => Some(format!("A{}CTR", algorithm.length.unwrap_or(material_len * 8))),
    Algorithm::Ecdh | Algorithm::Pbkdf2 => None,
  }
}

/// Encodes public material as the JWK used for aliasing and verification.
fn public_material_jwk(algorithm: &KeyAlgorithm, material: &[u8]) -> Result<Jwk> {
  if is_secp256k1(algorithm) {
    return algorithms::encode_secp256k1_public_jwk(material);
  }
  match algorithm.name {
    Algorithm::EdDsa => Ok(algorithms::encode_ed25519_public_jwk(material)),
    Algorithm::Ecdh => Ok(algorithms::encode_x25519_public_jwk(material)),
    _ => Err(Error::invalid_access(
      "The algorithm does not describe an asymmetric key.",
    )),
  }
}

fn expand_private_material(jwk: &Jwk, algorithm: &KeyAlgorithm) -> Result<Vec<u8>> {
  if is_secp256k1(algorithm) {
    return algorithms::expand_secp256k1_private_jwk(jwk);
  }
  match algorithm.name {
    Algorithm::EdDsa | Algorithm::Ecdh => algorithms::expand_okp_private_jwk(jwk),
    _ => Err(Error::invalid_access(
      "The algorithm does not describe an asymmetric key.",
    )),
  }
}

fn derive_public_material(algorithm: &KeyAlgorithm, private_material: &[u8]) -> Result<Vec<u8>> {
  if is_secp256k1(algorithm) {
    let compressed: bool = algorithm.compressed_public_key.unwrap_or(true);
    return secp256k1::get_public_key(private_material, compressed);
  }
  match algorithm.name {
    Algorithm::EdDsa => ed25519::get_public_key(private_material),
    Algorithm::Ecdh => x25519::get_public_key(private_material),
    _ => Err(Error::invalid_access(
      "The algorithm does not describe an asymmetric key.",
    )),
  }
}

/// Rejects pairs whose halves do not belong together, including swapped
/// public and private material.
fn check_pair_consistency(algorithm: &KeyAlgorithm, private_material: &[u8], public_material: &[u8]) -> Result<()> {
  let mismatch = || Error::invalid_access("Key pair import failed due to private and public key mismatch");

  let derived: Vec<u8> = derive_public_material(algorithm, private_material).map_err(|_| mismatch())?;

  let given: Vec<u8> = if is_secp256k1(algorithm) {
    let compressed: bool = algorithm.compressed_public_key.unwrap_or(true);
    secp256k1::convert_public_key(public_material, compressed).map_err(|_| mismatch())?
  } else {
    public_material.to_vec()
  };

  if derived != given {
    return Err(mismatch());
  }
  Ok(())
}
