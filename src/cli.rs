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

use crate::attributes::{IntAttribute, StringAttribute};
use crate::target::TargetKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log enumeration and dispatch details.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Serve requests from a JSON mock topology instead of the NVIDIA driver.
    /// Falls back to the NVML_ATTRIBUTES_MOCK environment variable.
    #[arg(long, global = true, value_name = "FILE")]
    pub mock: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the number of GPUs, thermal sensors or fans.
    Count {
        /// Target type: gpu, sensor or cooler.
        kind: TargetKind,
    },
    /// Read an integer attribute.
    Get(GetArgs),
    /// Read a string attribute.
    GetString(GetStringArgs),
    /// Read every attribute the vendor library serves for a target.
    List(TargetArgs),
}

#[derive(Parser, Clone)]
pub struct TargetArgs {
    /// Target type: gpu, sensor or cooler.
    pub kind: TargetKind,
    /// Target id within its type.
    #[arg(allow_negative_numbers = true)]
    pub id: i32,
}

#[derive(Parser, Clone)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Attribute name (e.g. PCI_ID) or number.
    pub attribute: IntAttribute,
}

#[derive(Parser, Clone)]
pub struct GetStringArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Attribute name (e.g. PRODUCT_NAME) or number.
    pub attribute: StringAttribute,
}
