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

//! The nvml-attributes prelude.
//!
//! Re-exports the types needed to open targets and query attributes:
//!
//! ```rust
//! use nvml_attributes::prelude::*;
//! ```
//!
//! # Example
//!
//! ```rust
//! use nvml_attributes::prelude::*;
//! use nvml_attributes::vendor::mock::{MockDevice, MockLibrary, MockTopology};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let library = Arc::new(MockLibrary::new(MockTopology::new(vec![
//!         MockDevice::with_uuid("GPU-0").temperature(40).fan_speed(30),
//!     ])));
//!     let dispatcher = AttributeDispatcher::new(LibraryLifecycle::new(library));
//!
//!     let fan = dispatcher.open(Target::cooler(0), None)?;
//!     let level = dispatcher.get_int(&fan, IntAttribute::THERMAL_COOLER_LEVEL)?;
//!     assert_eq!(level, 30);
//!     Ok(())
//! }
//! ```

// Entry points
pub use crate::dispatch::AttributeDispatcher;
pub use crate::handle::TargetHandle;
pub use crate::lifecycle::{LibraryGuard, LibraryLifecycle};

// Error types
pub use crate::error::{AttributeError, Result};

// Addressing
pub use crate::attributes::{BinaryAttribute, IntAttribute, StringAttribute, ValidValues};
pub use crate::target::{Target, TargetKind};

// Sources and fallback
pub use crate::legacy::{LegacyBackend, LegacySource};
pub use crate::source::{AttributeSource, SourceChain, VendorSource};

// Vendor boundary
pub use crate::vendor::ManagementLibrary;
