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

//! Boundary with the legacy (driver-ioctl) attribute backend.

use crate::attributes::{BinaryAttribute, IntAttribute, StringAttribute, ValidValues};
use crate::error::{AttributeError, Result};
use crate::source::AttributeSource;
use crate::target::{Target, TargetKind};
use std::sync::Arc;

/// Read access to the legacy backend's string attributes, addressed by the
/// legacy GPU numbering.
///
/// Device reconciliation only needs [`StringAttribute::GPU_UUID`]; `None`
/// means the legacy index could not be queried and is not an error.
pub trait LegacyBackend: Send + Sync {
    fn query_string(&self, gpu_index: u32, attribute: StringAttribute) -> Option<String>;
}

/// The legacy backend as the last link of a [`crate::SourceChain`].
///
/// Only GPU string reads can be answered through [`LegacyBackend`]; every
/// other request ends here as [`AttributeError::NotSupported`].
pub struct LegacySource {
    backend: Arc<dyn LegacyBackend>,
}

impl LegacySource {
    pub fn new(backend: Arc<dyn LegacyBackend>) -> Self {
        Self { backend }
    }
}

impl AttributeSource for LegacySource {
    fn name(&self) -> &str {
        "legacy"
    }

    fn target_count(&self, _kind: TargetKind) -> Result<u32> {
        Err(AttributeError::NotSupported)
    }

    fn get_int(&self, _target: Target, _attr: IntAttribute) -> Result<i64> {
        Err(AttributeError::NotSupported)
    }

    fn set_int(&self, _target: Target, _attr: IntAttribute, _value: i64) -> Result<()> {
        Err(AttributeError::NotSupported)
    }

    fn get_string(&self, target: Target, attr: StringAttribute) -> Result<String> {
        if target.kind != TargetKind::Gpu {
            return Err(AttributeError::NotSupported);
        }
        let index = u32::try_from(target.id).map_err(|_| AttributeError::BadHandle)?;
        self.backend
            .query_string(index, attr)
            .ok_or(AttributeError::NotSupported)
    }

    fn set_string(&self, _target: Target, _attr: StringAttribute, _value: &str) -> Result<()> {
        Err(AttributeError::NotSupported)
    }

    fn get_binary(&self, _target: Target, _attr: BinaryAttribute) -> Result<Vec<u8>> {
        Err(AttributeError::NotSupported)
    }

    fn valid_values(&self, _target: Target, _attr: IntAttribute) -> Result<ValidValues> {
        Err(AttributeError::NotSupported)
    }

    fn valid_string_values(&self, _target: Target, _attr: StringAttribute) -> Result<ValidValues> {
        Err(AttributeError::NotSupported)
    }
}
