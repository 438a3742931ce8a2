// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

mod shared;

pub(crate) use self::shared::Shared;
