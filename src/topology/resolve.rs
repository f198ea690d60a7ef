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

/// Where a global sensor or cooler id lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubResource {
    /// Legacy GPU index owning the sub-resource.
    pub slot: usize,
    /// Position of the sub-resource within that device.
    pub position: u32,
}

/// Map a global sub-resource id onto its device.
///
/// Ids are assigned by walking devices in order and handing each of a
/// device's sub-resources the next id. Returns `None` for negative ids and
/// ids at or past `total`.
pub fn resolve(requested: i32, total: u32, per_device: &[u32]) -> Option<SubResource> {
    let requested = u32::try_from(requested).ok().filter(|&id| id < total)?;

    let mut first_id = 0u32;
    for (slot, &count) in per_device.iter().enumerate() {
        let next = first_id.saturating_add(count);
        if requested < next {
            return Some(SubResource {
                slot,
                position: requested - first_id,
            });
        }
        first_id = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_skips_devices_without_sub_resources() {
        let per_device = [1, 0, 1];
        assert_eq!(
            resolve(0, 2, &per_device),
            Some(SubResource { slot: 0, position: 0 })
        );
        assert_eq!(
            resolve(1, 2, &per_device),
            Some(SubResource { slot: 2, position: 0 })
        );
        assert_eq!(resolve(2, 2, &per_device), None);
    }

    #[test]
    fn test_resolve_rejects_negative_ids() {
        assert_eq!(resolve(-1, 2, &[1, 1]), None);
    }

    #[test]
    fn test_resolve_with_nothing_enumerated() {
        assert_eq!(resolve(0, 0, &[0, 0]), None);
        assert_eq!(resolve(0, 0, &[]), None);
    }

    #[test]
    fn test_resolve_position_within_device() {
        let per_device = [2, 3];
        assert_eq!(
            resolve(3, 5, &per_device),
            Some(SubResource { slot: 1, position: 1 })
        );
    }

    #[test]
    fn test_total_larger_than_enumerated() {
        // An inconsistent total cannot resolve past the last device
        assert_eq!(resolve(2, 4, &[1, 1]), None);
    }
}
