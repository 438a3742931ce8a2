// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt::Debug;
use core::fmt::Formatter;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use keymint_core::Error;
use keymint_core::Result;

#[derive(Default)]
pub(crate) struct Shared<T>(RwLock<T>);

impl<T> Shared<T> {
  pub(crate) fn new(data: T) -> Self {
    Self(RwLock::new(data))
  }

  pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, T>> {
    self.0.read().map_err(|_| Error::operation("Shared resource poisoned: read"))
  }

  pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, T>> {
    self
      .0
      .write()
      .map_err(|_| Error::operation("Shared resource poisoned: write"))
  }
}

impl<T: Debug> Debug for Shared<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(&self.0, f)
  }
}
