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

use crate::target::{Target, TargetKind};
use crate::topology::identity::DeviceIdentityMap;
use crate::vendor::ManagementLibrary;
use tracing::{debug, trace};

/// State discovered when a target handle is opened.
///
/// Per-device vectors are indexed by vendor device index. The vendor model
/// exposes at most one sensor and one fan per device, so each entry is 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerHandleAttributes {
    pub device_count: u32,
    pub sensors_per_device: Vec<u32>,
    pub coolers_per_device: Vec<u32>,
    pub sensor_count: u32,
    pub cooler_count: u32,
    /// Vendor device index that serves requests addressed to the target.
    pub resolved_device_index: u32,
}

impl PerHandleAttributes {
    /// Probe every vendor device once for a sensor and a fan and resolve the
    /// device that backs `target`.
    ///
    /// Devices are walked in vendor order regardless of how `identity` maps
    /// legacy slots, so a device two slots map to is still counted once. A
    /// device whose handle cannot be obtained contributes nothing. GPU
    /// targets resolve through `identity`; sensor and cooler targets resolve
    /// to the device that contributes their id. When neither applies the raw
    /// target id is kept.
    pub fn enumerate(
        library: &dyn ManagementLibrary,
        target: Target,
        identity: &DeviceIdentityMap,
    ) -> Self {
        let device_count = identity.len() as u32;
        let mut attrs = Self {
            device_count,
            sensors_per_device: vec![0; identity.len()],
            coolers_per_device: vec![0; identity.len()],
            sensor_count: 0,
            cooler_count: 0,
            resolved_device_index: raw_index(target.id),
        };

        if target.kind == TargetKind::Gpu {
            if let Some(index) = usize::try_from(target.id)
                .ok()
                .and_then(|slot| identity.vendor_index(slot))
            {
                attrs.resolved_device_index = index;
            }
        }

        for vendor_index in 0..device_count {
            let device = match library.device_by_index(vendor_index) {
                Ok(device) => device,
                Err(e) => {
                    trace!("Skipping vendor device {vendor_index}: {e}");
                    continue;
                }
            };

            if library.temperature(device).is_ok() {
                if target.kind == TargetKind::ThermalSensor
                    && i64::from(target.id) == i64::from(attrs.sensor_count)
                {
                    attrs.resolved_device_index = vendor_index;
                }
                attrs.sensors_per_device[vendor_index as usize] = 1;
                attrs.sensor_count += 1;
            }

            if library.fan_speed(device).is_ok() {
                if target.kind == TargetKind::Cooler
                    && i64::from(target.id) == i64::from(attrs.cooler_count)
                {
                    attrs.resolved_device_index = vendor_index;
                }
                attrs.coolers_per_device[vendor_index as usize] = 1;
                attrs.cooler_count += 1;
            }
        }

        debug!(
            "{target}: {} devices, {} sensors, {} coolers, vendor device {}",
            attrs.device_count, attrs.sensor_count, attrs.cooler_count, attrs.resolved_device_index
        );

        attrs
    }

    /// Number of targets of `kind` this handle knows about.
    pub fn count_of(&self, kind: TargetKind) -> Option<u32> {
        match kind {
            TargetKind::Gpu => Some(self.device_count),
            TargetKind::ThermalSensor => Some(self.sensor_count),
            TargetKind::Cooler => Some(self.cooler_count),
            _ => None,
        }
    }
}

// Negative ids can never name a device; map them past any valid index.
fn raw_index(id: i32) -> u32 {
    u32::try_from(id).unwrap_or(u32::MAX)
}
