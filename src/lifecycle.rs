// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Process-wide reference counting of the vendor library.
//!
//! The library is initialized by the first [`LibraryLifecycle::acquire`] and
//! shut down when the last [`LibraryGuard`] goes away. Guards release on
//! drop, so a handle whose construction bails out halfway still gives its
//! reference back.

use crate::error::{AttributeError, Result};
use crate::vendor::{ManagementLibrary, VendorError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

pub struct LibraryLifecycle {
    library: Arc<dyn ManagementLibrary>,
    users: Mutex<usize>,
}

impl LibraryLifecycle {
    pub fn new(library: Arc<dyn ManagementLibrary>) -> Arc<Self> {
        Arc::new(Self {
            library,
            users: Mutex::new(0),
        })
    }

    /// Take a reference on the vendor library, initializing it if this is
    /// the first one.
    ///
    /// Fails with [`AttributeError::CapabilityMissing`] when initialization
    /// fails; the count is left untouched in that case.
    pub fn acquire(self: &Arc<Self>) -> Result<LibraryGuard> {
        let mut users = self.lock_users();
        if *users == 0 {
            if let Err(e) = self.library.initialize() {
                error!("Failed to initialize vendor library: {e}");
                return Err(AttributeError::CapabilityMissing);
            }
            debug!("Vendor library initialized");
        }
        *users += 1;
        Ok(LibraryGuard {
            lifecycle: Some(Arc::clone(self)),
        })
    }

    /// Drop one reference; shut the library down when none are left.
    ///
    /// A failed shutdown is reported but the reference is considered released.
    fn release(&self) -> std::result::Result<(), VendorError> {
        let mut users = self.lock_users();
        if *users == 0 {
            return Ok(());
        }
        *users -= 1;
        if *users > 0 {
            return Ok(());
        }
        match self.library.shutdown() {
            Ok(()) => {
                debug!("Vendor library shut down");
                Ok(())
            }
            Err(e) => {
                error!("Failed to shut down vendor library: {e}");
                Err(e)
            }
        }
    }

    pub fn is_acquired(&self) -> bool {
        *self.lock_users() > 0
    }

    pub fn users(&self) -> usize {
        *self.lock_users()
    }

    pub fn library(&self) -> &dyn ManagementLibrary {
        self.library.as_ref()
    }

    fn lock_users(&self) -> MutexGuard<'_, usize> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One reference on the vendor library.
pub struct LibraryGuard {
    lifecycle: Option<Arc<LibraryLifecycle>>,
}

impl LibraryGuard {
    pub fn lifecycle(&self) -> Option<&Arc<LibraryLifecycle>> {
        self.lifecycle.as_ref()
    }

    /// Release now and report a shutdown failure, instead of on drop.
    pub fn release(mut self) -> std::result::Result<(), VendorError> {
        match self.lifecycle.take() {
            Some(lifecycle) => lifecycle.release(),
            None => Ok(()),
        }
    }
}

impl Drop for LibraryGuard {
    fn drop(&mut self) {
        if let Some(lifecycle) = self.lifecycle.take() {
            // Already logged inside release
            let _ = lifecycle.release();
        }
    }
}
