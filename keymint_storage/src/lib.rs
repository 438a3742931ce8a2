// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Key management for the keymint library.
//!
//! A [`kms::Kms`] is a named provider of key storage and cryptographic
//! operations. The reference implementation, [`local_kms::LocalKms`],
//! keeps key metadata in a [`key_store::KmsKeyStore`] and private
//! material in a [`private_key_store::KmsPrivateKeyStore`], both
//! in-memory; persistent backends plug in through the same traits.
//! The [`key_manager::KeyManager`] facade routes operations on key
//! references to the owning KMS.

#![forbid(unsafe_code)]

pub mod key_manager;
pub mod key_store;
pub mod kms;
pub mod local_kms;
pub mod private_key_store;
pub mod types;

mod utils;

pub use self::key_manager::KeyManager;
pub use self::key_manager::KeyManagerOptions;
pub use self::key_store::KeyStore;
pub use self::key_store::KmsKeyStore;
pub use self::kms::EncryptionOptions;
pub use self::kms::GenerateKeyParams;
pub use self::kms::Kms;
pub use self::local_kms::public_key_to_jwk;
pub use self::local_kms::LocalKms;
pub use self::private_key_store::KmsPrivateKeyStore;
pub use self::private_key_store::PrivateKeyStore;
pub use self::types::KeyAlgorithm;
pub use self::types::KeyClass;
pub use self::types::KeyState;
pub use self::types::ManagedKey;
pub use self::types::ManagedKeyOrPair;
pub use self::types::ManagedKeyPair;
pub use self::types::ManagedPrivateKey;
