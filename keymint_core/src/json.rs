// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Canonical JSON serialization and JSON value typing.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;

/// Serializes `value` to canonical JSON.
///
/// Object keys are sorted lexicographically by code unit at every nesting
/// level, array order is preserved, and absent members are omitted. Two
/// values with identical member sets therefore canonicalize identically
/// regardless of member order.
pub fn canonicalize<T: Serialize>(value: &T) -> Result<String> {
  serde_jcs::to_string(value).map_err(|err| Error::type_error(format!("Canonicalization failed: {err}")))
}

/// The runtime type of a JSON value, as reported by [`universal_type_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
  Array,
  Boolean,
  Null,
  Number,
  Object,
  String,
}

impl ValueType {
  /// Returns the type name.
  pub const fn name(&self) -> &'static str {
    match self {
      Self::Array => "Array",
      Self::Boolean => "Boolean",
      Self::Null => "Null",
      Self::Number => "Number",
      Self::Object => "Object",
      Self::String => "String",
    }
  }
}

impl std::fmt::Display for ValueType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// Classifies a JSON value by its runtime type.
pub fn universal_type_of(value: &Value) -> ValueType {
  match value {
    Value::Array(_) => ValueType::Array,
    Value::Bool(_) => ValueType::Boolean,
    Value::Null => ValueType::Null,
    Value::Number(_) => ValueType::Number,
    Value::Object(_) => ValueType::Object,
    Value::String(_) => ValueType::String,
  }
}

/// A convenience trait for JSON serialization.
pub trait ToJson: Serialize {
  /// Serializes `self` as a string of JSON.
  fn to_json(&self) -> Result<String> {
    serde_json::to_string(self).map_err(|err| Error::type_error(format!("Failed to serialize JSON: {err}")))
  }

  /// Serializes `self` as a vector of JSON bytes.
  fn to_json_vec(&self) -> Result<Vec<u8>> {
    serde_json::to_vec(self).map_err(|err| Error::type_error(format!("Failed to serialize JSON: {err}")))
  }

  /// Serializes `self` as a JSON value.
  fn to_json_value(&self) -> Result<Value> {
    serde_json::to_value(self).map_err(|err| Error::type_error(format!("Failed to serialize JSON: {err}")))
  }

  /// Serializes `self` as canonical JSON.
  fn to_json_canonical(&self) -> Result<String>
  where
    Self: Sized,
  {
    canonicalize(self)
  }
}

impl<T: Serialize> ToJson for T {}

/// A convenience trait for JSON deserialization.
pub trait FromJson: for<'de> serde::Deserialize<'de> + Sized {
  /// Deserializes `Self` from a string of JSON text.
  fn from_json(json: &(impl AsRef<str> + ?Sized)) -> Result<Self> {
    serde_json::from_str(json.as_ref()).map_err(|err| Error::type_error(format!("Failed to deserialize JSON: {err}")))
  }

  /// Deserializes `Self` from a slice of JSON bytes.
  fn from_json_slice(json: &(impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
    serde_json::from_slice(json.as_ref())
      .map_err(|err| Error::type_error(format!("Failed to deserialize JSON: {err}")))
  }

  /// Deserializes `Self` from a JSON value.
  fn from_json_value(json: Value) -> Result<Self> {
    serde_json::from_value(json).map_err(|err| Error::type_error(format!("Failed to deserialize JSON: {err}")))
  }
}

impl<T> FromJson for T where T: for<'de> serde::Deserialize<'de> {}
