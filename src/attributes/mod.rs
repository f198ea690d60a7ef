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

//! Attribute ids, their dispatch tables and the value descriptors returned by
//! valid-values queries.

mod ids;
pub mod pci;
pub mod table;

pub use ids::{BinaryAttribute, IntAttribute, StringAttribute};
pub use table::{AttributeTable, Binding, Stub};

use serde::{Deserialize, Serialize};

/// Shape of the values an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidValueKind {
    Unknown,
    Integer,
    Bitmask,
    Bool,
    Range { min: i64, max: i64 },
    IntBits(u32),
    String,
    Binary,
}

/// Result of a valid-values query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidValues {
    pub kind: ValidValueKind,
    pub readable: bool,
    pub writable: bool,
}
