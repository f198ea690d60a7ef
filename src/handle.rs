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

//! Per-target state built when a handle is opened.

use crate::error::{AttributeError, Result};
use crate::legacy::LegacyBackend;
use crate::lifecycle::{LibraryGuard, LibraryLifecycle};
use crate::target::Target;
use crate::topology::{DeviceIdentityMap, PerHandleAttributes};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error};

struct OpenState {
    attributes: Arc<PerHandleAttributes>,
    // Keeps the vendor library initialized while the handle is open
    _guard: LibraryGuard,
}

/// An opened GPU, thermal sensor or cooler target.
///
/// Opening reconciles device numbering and enumerates sensors and fans once;
/// the result is the only state attribute calls consult. Closing (or
/// dropping) the handle releases its reference on the vendor library.
pub struct TargetHandle {
    target: Target,
    state: RwLock<Option<OpenState>>,
}

impl TargetHandle {
    pub fn open(
        lifecycle: &Arc<LibraryLifecycle>,
        target: Target,
        legacy: Option<&dyn LegacyBackend>,
    ) -> Result<Self> {
        let guard = lifecycle.acquire()?;

        if !target.kind.is_vendor_compatible() {
            debug!("{} targets are not served by the vendor library", target.kind);
            return Err(AttributeError::BadArgument);
        }

        let library = lifecycle.library();
        let device_count = library.device_count().map_err(|e| {
            error!("Failed to get device count: {e}");
            AttributeError::BadHandle
        })?;

        let identity = DeviceIdentityMap::reconcile(library, device_count, legacy);
        let attributes = PerHandleAttributes::enumerate(library, target, &identity);

        Ok(Self {
            target,
            state: RwLock::new(Some(OpenState {
                attributes: Arc::new(attributes),
                _guard: guard,
            })),
        })
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// The enumerated state, or `None` once the handle has been closed.
    pub fn attributes(&self) -> Option<Arc<PerHandleAttributes>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|state| Arc::clone(&state.attributes))
    }

    pub fn is_open(&self) -> bool {
        self.attributes().is_some()
    }

    /// Drop the enumerated state and release the vendor library.
    ///
    /// Closing an already closed handle does nothing.
    pub fn close(&self) {
        let state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(state) = state {
            debug!("Closing handle for {}", self.target);
            drop(state);
        }
    }
}

impl std::fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetHandle")
            .field("target", &self.target)
            .field("attributes", &self.attributes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetKind;
    use crate::vendor::mock::{MockDevice, MockLibrary, MockTopology};
    use crate::vendor::ManagementLibrary;

    fn lifecycle(topology: MockTopology) -> (Arc<MockLibrary>, Arc<LibraryLifecycle>) {
        let library = Arc::new(MockLibrary::new(topology));
        let lifecycle = LibraryLifecycle::new(library.clone());
        (library, lifecycle)
    }

    fn topology() -> MockTopology {
        MockTopology::new(vec![
            MockDevice::with_uuid("GPU-0").temperature(45).fan_speed(40),
            MockDevice::with_uuid("GPU-1"),
        ])
    }

    #[test]
    fn test_open_enumerates_and_holds_library() {
        let (library, lifecycle) = lifecycle(topology());
        let handle = TargetHandle::open(&lifecycle, Target::cooler(0), None).unwrap();

        let attrs = handle.attributes().unwrap();
        assert_eq!(attrs.device_count, 2);
        assert_eq!(attrs.cooler_count, 1);
        assert_eq!(attrs.resolved_device_index, 0);
        assert!(library.is_initialized());
        assert_eq!(lifecycle.users(), 1);

        drop(handle);
        assert!(!library.is_initialized());
    }

    #[test]
    fn test_close_releases_and_clears_state() {
        let (library, lifecycle) = lifecycle(topology());
        let handle = TargetHandle::open(&lifecycle, Target::gpu(1), None).unwrap();

        handle.close();
        assert!(!handle.is_open());
        assert!(handle.attributes().is_none());
        assert_eq!(library.shutdown_calls(), 1);

        handle.close();
        assert_eq!(library.shutdown_calls(), 1);
    }

    #[test]
    fn test_open_fails_when_library_does_not_initialize() {
        let (_, lifecycle) = lifecycle(MockTopology {
            fail_initialize: true,
            ..topology()
        });
        let err = TargetHandle::open(&lifecycle, Target::gpu(0), None).unwrap_err();
        assert_eq!(err, AttributeError::CapabilityMissing);
        assert_eq!(lifecycle.users(), 0);
    }

    #[test]
    fn test_incompatible_kind_releases_reference() {
        let (library, lifecycle) = lifecycle(topology());
        let err = TargetHandle::open(&lifecycle, Target::new(TargetKind::Display, 0), None)
            .unwrap_err();
        assert_eq!(err, AttributeError::BadArgument);
        assert_eq!(lifecycle.users(), 0);
        assert_eq!(library.shutdown_calls(), 1);
    }

    #[test]
    fn test_handles_share_one_initialization() {
        let (library, lifecycle) = lifecycle(topology());
        let gpu = TargetHandle::open(&lifecycle, Target::gpu(0), None).unwrap();
        let sensor = TargetHandle::open(&lifecycle, Target::thermal_sensor(0), None).unwrap();
        assert_eq!(library.initialize_calls(), 1);
        assert_eq!(lifecycle.users(), 2);

        drop(gpu);
        assert!(library.is_initialized());
        drop(sensor);
        assert!(!library.is_initialized());
        assert_eq!(library.device_count(), Err(crate::vendor::VendorError::Uninitialized));
    }
}
