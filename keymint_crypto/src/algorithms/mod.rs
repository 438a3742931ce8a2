// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Algorithm providers: per-algorithm validation and dispatch.
//!
//! A provider declares the algorithm names it answers to and implements
//! only the operations meaningful to that algorithm; every other
//! operation fails with an `InvalidAccessError`. Validation of key types,
//! key algorithms, curves and key operations happens here, before any
//! primitive is invoked.

mod aes_ctr;
mod algorithm;
mod ecdh;
mod ecdsa;
mod eddsa;
mod params;
mod pbkdf2;
mod validator;

use core::fmt::Debug;

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::Jwk;

pub use self::aes_ctr::AesCtrAlgorithm;
pub use self::algorithm::Algorithm;
pub use self::ecdh::EcdhAlgorithm;
pub use self::ecdsa::EcdsaAlgorithm;
pub use self::eddsa::EddsaAlgorithm;
pub use self::params::CipherParams;
pub use self::params::DeriveBitsOptions;
pub use self::params::DeriveBitsParams;
pub use self::params::KeyGenParams;
pub use self::params::SignParams;
pub use self::params::VerifyParams;
pub use self::pbkdf2::Pbkdf2Algorithm;

pub use self::aes_ctr::encode_oct_jwk;
pub use self::aes_ctr::expand_oct_jwk;
pub use self::ecdh::encode_x25519_private_jwk;
pub use self::ecdh::encode_x25519_public_jwk;
pub use self::ecdh::expand_x25519_public_jwk;
pub use self::ecdsa::encode_secp256k1_private_jwk;
pub use self::ecdsa::encode_secp256k1_public_jwk;
pub use self::ecdsa::expand_secp256k1_private_jwk;
pub use self::ecdsa::expand_secp256k1_public_jwk;
pub use self::eddsa::encode_ed25519_private_jwk;
pub use self::eddsa::encode_ed25519_public_jwk;
pub use self::eddsa::expand_ed25519_public_jwk;
pub use self::eddsa::expand_okp_private_jwk;

/// The capability set of an algorithm provider.
///
/// Default method bodies are deliberate stubs: an operation a provider
/// does not override is not valid for that algorithm and fails
/// accordingly.
pub trait CryptoAlgorithm: Debug + Send + Sync {
  /// The algorithm names this provider answers to.
  fn names(&self) -> &'static [&'static str];

  /// Validates key-generation options without generating anything.
  fn check_generate_key_options(&self, _params: &KeyGenParams) -> Result<()> {
    Ok(())
  }

  /// Generates a new private JWK.
  fn generate_key(&self, _params: &KeyGenParams) -> Result<Jwk> {
    Err(validator::invalid_operation("generateKey", self.names()))
  }

  /// Signs the given data.
  fn sign(&self, _params: &SignParams<'_>) -> Result<Vec<u8>> {
    Err(validator::invalid_operation("sign", self.names()))
  }

  /// Verifies a signature over the given data.
  fn verify(&self, _params: &VerifyParams<'_>) -> Result<bool> {
    Err(validator::invalid_operation("verify", self.names()))
  }

  /// Encrypts the given data.
  fn encrypt(&self, _params: &CipherParams<'_>) -> Result<Vec<u8>> {
    Err(validator::invalid_operation("encrypt", self.names()))
  }

  /// Decrypts the given data.
  fn decrypt(&self, _params: &CipherParams<'_>) -> Result<Vec<u8>> {
    Err(validator::invalid_operation("decrypt", self.names()))
  }

  /// Derives raw bits from a base key.
  fn derive_bits(&self, _params: &DeriveBitsParams<'_>) -> Result<Vec<u8>> {
    Err(validator::invalid_operation("deriveBits", self.names()))
  }
}

/// Returns the provider answering to `algorithm`.
pub fn algorithm_provider(algorithm: Algorithm) -> &'static dyn CryptoAlgorithm {
  match algorithm {
    Algorithm::Ecdsa | Algorithm::Es256K => &EcdsaAlgorithm,
    Algorithm::EdDsa => &EddsaAlgorithm,
    Algorithm::Ecdh => &EcdhAlgorithm,
    Algorithm::AesCtr | Algorithm::A128Ctr | Algorithm::A192Ctr | Algorithm::A256Ctr => &AesCtrAlgorithm,
    Algorithm::Pbkdf2 => &Pbkdf2Algorithm,
  }
}

/// Looks up the provider for an algorithm name, failing for names outside
/// the allow-list.
pub fn algorithm_provider_by_name(name: &str) -> Result<&'static dyn CryptoAlgorithm> {
  Algorithm::from_name(name).map(algorithm_provider)
}

pub(crate) fn ensure_output(output: Vec<u8>, operation: &str) -> Result<Vec<u8>> {
  if output.is_empty() {
    return Err(Error::operation(format!("Operation failed: {operation}")));
  }
  Ok(output)
}
