// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Byte and encoding utilities shared by the keymint crates.
//!
//! This crate provides the base encodings used whenever a key enters or
//! leaves persistent form (unpadded URL-safe base64, hex, base58-btc),
//! canonical JSON serialization, and the error taxonomy every other
//! keymint crate surfaces to callers.

#![forbid(unsafe_code)]

pub mod convert;
pub mod error;
pub mod json;

pub use self::error::Error;
pub use self::error::Result;
