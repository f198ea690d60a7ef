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

//! Error types returned by every attribute entry point.
//!
//! Each request resolves to either a value or exactly one of the variants
//! below. Vendor library failures never cross this boundary as raw codes;
//! they are logged where they happen and surface as
//! [`AttributeError::NotSupported`].
//!
//! # Example
//!
//! ```rust
//! use nvml_attributes::{AttributeError, Result};
//!
//! fn fallback_allowed(result: &Result<i64>) -> bool {
//!     matches!(result, Err(e) if e.defers_to_next_source())
//! }
//!
//! assert!(fallback_allowed(&Err(AttributeError::AttributeNotAvailable)));
//! assert!(!fallback_allowed(&Err(AttributeError::NotSupported)));
//! ```

use thiserror::Error;

/// The outcome taxonomy shared by all attribute sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AttributeError {
    /// The vendor management library is not loaded or was never acquired.
    ///
    /// Fatal for the current call only.
    #[error("Vendor management library is not available")]
    CapabilityMissing,

    /// The per-target state is missing, or a sensor/cooler id failed the
    /// bounds check.
    #[error("Bad target handle")]
    BadHandle,

    /// The target type is not one this layer understands.
    #[error("Bad argument")]
    BadArgument,

    /// The attribute is known but not implemented, or the vendor call failed.
    #[error("Attribute not supported")]
    NotSupported,

    /// The attribute does not apply to this target kind; another source
    /// should be asked instead.
    #[error("Attribute not available on this target type")]
    AttributeNotAvailable,
}

impl AttributeError {
    /// Whether a chained resolver should move on to its next source.
    pub fn defers_to_next_source(&self) -> bool {
        matches!(
            self,
            AttributeError::AttributeNotAvailable | AttributeError::CapabilityMissing
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AttributeError>;
