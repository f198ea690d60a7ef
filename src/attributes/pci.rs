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

//! PCI location helpers.
//!
//! The vendor library has no structured field for the PCI function number,
//! so it is recovered from the trailing component of the bus id string.

/// Integer after the final `.` in a bus id such as `00000000:01:00.1`.
///
/// Leading digits are parsed the way `atoi` would; a missing separator or a
/// component without digits yields 0.
pub fn function_from_bus_id(bus_id: &str) -> u32 {
    let Some((_, tail)) = bus_id.rsplit_once('.') else {
        return 0;
    };
    let digits: String = tail
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Swap the 16-bit halves of the vendor's combined PCI id.
///
/// The vendor library reports `device << 16 | vendor`; the attribute protocol
/// expects `vendor << 16 | device`.
pub fn swap_id_halves(pci_device_id: u32) -> u32 {
    pci_device_id.rotate_left(16)
}
