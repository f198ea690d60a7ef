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

use crate::attributes::StringAttribute;
use crate::legacy::LegacyBackend;
use crate::vendor::ManagementLibrary;
use tracing::{debug, trace};

/// Legacy GPU index -> vendor device index.
///
/// Every slot holds exactly one vendor index. Slots whose legacy UUID is
/// unavailable or matches no vendor device keep the identity mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentityMap {
    vendor_index: Vec<u32>,
}

impl DeviceIdentityMap {
    pub fn identity(device_count: u32) -> Self {
        Self {
            vendor_index: (0..device_count).collect(),
        }
    }

    /// Build the map, matching UUIDs when a legacy backend is present.
    ///
    /// For each legacy slot the vendor devices are scanned in index order and
    /// the first exact UUID match wins. Vendor lookups that fail during the
    /// scan only disqualify that candidate.
    pub fn reconcile(
        library: &dyn ManagementLibrary,
        device_count: u32,
        legacy: Option<&dyn LegacyBackend>,
    ) -> Self {
        let mut map = Self::identity(device_count);
        let Some(legacy) = legacy else {
            return map;
        };

        for slot in 0..device_count {
            let Some(legacy_uuid) = legacy.query_string(slot, StringAttribute::GPU_UUID) else {
                trace!("No legacy UUID for GPU {slot}, keeping identity mapping");
                continue;
            };

            let matched = (0..device_count).find(|&candidate| {
                library
                    .device_by_index(candidate)
                    .and_then(|device| library.uuid(device))
                    .is_ok_and(|uuid| uuid == legacy_uuid)
            });

            match matched {
                Some(vendor_index) => {
                    debug!("Legacy GPU {slot} ({legacy_uuid}) is vendor device {vendor_index}");
                    map.vendor_index[slot as usize] = vendor_index;
                }
                None => {
                    debug!("Legacy GPU {slot} ({legacy_uuid}) has no vendor match");
                }
            }
        }

        map
    }

    pub fn vendor_index(&self, legacy_index: usize) -> Option<u32> {
        self.vendor_index.get(legacy_index).copied()
    }

    pub fn len(&self) -> usize {
        self.vendor_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendor_index.is_empty()
    }

    /// `(legacy index, vendor index)` pairs in legacy order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.vendor_index.iter().copied().enumerate()
    }
}
