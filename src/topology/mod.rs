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

//! Device identity, sub-resource discovery and sub-resource addressing.
//!
//! The legacy backend and the vendor library number GPUs independently.
//! [`identity`] reconciles the two numberings, [`enumerate`] discovers which
//! devices carry a readable thermal sensor or fan, and [`resolve`] maps a
//! global sensor/cooler id back to the device that owns it.

pub mod enumerate;
pub mod identity;
pub mod resolve;

pub use enumerate::PerHandleAttributes;
pub use identity::DeviceIdentityMap;
pub use resolve::SubResource;
