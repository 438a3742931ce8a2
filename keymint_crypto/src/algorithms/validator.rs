// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Validation helpers shared by the algorithm providers.

use keymint_core::Error;
use keymint_core::Result;
use keymint_jose::jwk::JwkOperation;
use keymint_jose::jwk::JwkType;
use keymint_jose::Jwk;

/// Fails unless `name` is one of the provider's algorithm names.
pub(crate) fn check_algorithm_name(name: &str, allowed: &'static [&'static str]) -> Result<()> {
  if allowed.iter().any(|candidate| candidate.eq_ignore_ascii_case(name)) {
    return Ok(());
  }
  Err(Error::not_supported(format!("Algorithm not supported: '{name}'")))
}

/// Fails when the key declares an algorithm outside the provider's names.
pub(crate) fn check_key_algorithm(key: &Jwk, algorithm_name: &str, allowed: &'static [&'static str]) -> Result<()> {
  match key.alg() {
    Some(alg) if !allowed.iter().any(|candidate| candidate.eq_ignore_ascii_case(alg)) => {
      Err(Error::invalid_access(format!(
        "Algorithm '{algorithm_name}' does not match the provided '{alg}' key."
      )))
    }
    _ => Ok(()),
  }
}

/// Fails unless the key's `kty` is in the provider's allow-list.
pub(crate) fn check_key_type(key: &Jwk, allowed: &[JwkType]) -> Result<()> {
  if allowed.contains(&key.kty()) {
    return Ok(());
  }

  let names: Vec<&str> = allowed.iter().map(|kty| kty.name()).collect();
  Err(Error::invalid_access(format!(
    "Key type of the provided key must be '{}', but '{}' was given.",
    names.join("' or '"),
    key.kty()
  )))
}

/// Fails when the key carries a `key_ops` member that does not include
/// the requested operation.
pub(crate) fn check_key_operations(key: &Jwk, operation: JwkOperation) -> Result<()> {
  match key.key_ops() {
    Some(operations) if !operations.contains(&operation) => Err(Error::invalid_access(format!(
      "Requested operation '{operation}' is not valid for the provided key."
    ))),
    _ => Ok(()),
  }
}

/// Fails when any requested key operation falls outside the set the
/// provider supports.
pub(crate) fn check_requested_operations(
  requested: &[JwkOperation],
  allowed: &[JwkOperation],
  names: &'static [&'static str],
) -> Result<()> {
  for operation in requested {
    if !allowed.contains(operation) {
      return Err(invalid_operation(operation.name(), names));
    }
  }
  Ok(())
}

/// Fails unless `curve` is in the provider's curve allow-list.
pub(crate) fn check_curve(curve: &str, allowed: &'static [&'static str]) -> Result<()> {
  if allowed.contains(&curve) {
    return Ok(());
  }
  Err(Error::type_error(format!(
    "Out of range: 'curve' must be one of: {}",
    allowed.join(", ")
  )))
}

/// The error raised for operations an algorithm does not expose.
pub(crate) fn invalid_operation(operation: &str, names: &'static [&'static str]) -> Error {
  Error::invalid_access(format!(
    "Requested operation '{operation}' is not valid for {}.",
    names.join(", ")
  ))
}
