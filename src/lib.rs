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

//! Attribute translation between a numeric GPU attribute protocol and the
//! NVIDIA management library.
//!
//! Targets (GPUs, thermal sensors and fans) are opened through a
//! [`LibraryLifecycle`], which keeps the vendor library initialized while any
//! handle is alive. Opening a handle reconciles the legacy GPU numbering
//! with the vendor's and enumerates sensors and fans; the
//! [`AttributeDispatcher`] then answers integer, string and binary requests
//! from a static [`AttributeTable`].

pub mod attributes;
pub mod cli;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod legacy;
pub mod lifecycle;
pub mod logging;
pub mod prelude;
pub mod source;
pub mod target;
pub mod topology;
pub mod vendor;

// Re-export just the config module from common
pub mod common {
    pub mod config;
}

pub use attributes::{
    AttributeTable, BinaryAttribute, Binding, IntAttribute, StringAttribute, Stub, ValidValueKind,
    ValidValues,
};
pub use dispatch::AttributeDispatcher;
pub use error::{AttributeError, Result};
pub use handle::TargetHandle;
pub use legacy::{LegacyBackend, LegacySource};
pub use lifecycle::{LibraryGuard, LibraryLifecycle};
pub use source::{AttributeSource, SourceChain, VendorBackend, VendorSource};
pub use target::{Target, TargetKind};
pub use topology::{DeviceIdentityMap, PerHandleAttributes, SubResource};
pub use vendor::{DeviceHandle, ManagementLibrary, VendorError};
