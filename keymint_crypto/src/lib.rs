// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic primitives and algorithm providers for the keymint library.
//!
//! The [`primitives`] module holds pure, stateless implementations of the
//! supported ciphers, signature schemes, key agreements and key derivation
//! functions. The [`algorithms`] module layers per-algorithm validation and
//! dispatch on top, exposing only the operations meaningful to each
//! algorithm and rejecting cross-algorithm misuse.

#![forbid(unsafe_code)]

pub mod algorithms;
pub mod primitives;
