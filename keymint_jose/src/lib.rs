// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Key types for the keymint library.
//!
//! Provides the [`jwk::Jwk`] value type with its RFC 7638 thumbprint,
//! stable `urn:jwk:` key URIs, base64url helpers in [`jwu`], and the
//! bridge between JOSE key descriptions and the multicodec table.

#![forbid(unsafe_code)]

pub mod jwk;
pub mod jwu;
pub mod key_uri;
pub mod multicodec;

pub use self::jwk::Jwk;
pub use self::key_uri::KeyUri;
