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

use anyhow::{Context, Result};
use clap::Parser;
use nvml_attributes::cli::{Cli, Commands};
use nvml_attributes::common::config::EnvConfig;
use nvml_attributes::vendor::mock::{MockLegacyBackend, MockLibrary, MockTopology};
use nvml_attributes::vendor::nvml::NvmlLibrary;
use nvml_attributes::{
    AttributeSource, AttributeTable, LegacyBackend, LegacySource, LibraryLifecycle,
    ManagementLibrary, SourceChain, Target, VendorSource,
};
use std::sync::Arc;
use tracing::debug;

type Backends = (Arc<dyn ManagementLibrary>, Option<Arc<dyn LegacyBackend>>);

fn main() -> Result<()> {
    let cli = Cli::parse();
    nvml_attributes::logging::init(cli.verbose);

    let (library, legacy) = open_backends(&cli)?;
    let lifecycle = LibraryLifecycle::new(library);
    let mut chain = SourceChain::new().with(VendorSource::probe(lifecycle, legacy.clone()));
    if let Some(legacy) = legacy {
        chain.push(Box::new(LegacySource::new(legacy)));
    }

    match cli.command {
        Commands::Count { kind } => {
            let count = chain
                .target_count(kind)
                .with_context(|| format!("Failed to count {kind} targets"))?;
            println!("{count}");
        }
        Commands::Get(args) => {
            let target = Target::new(args.target.kind, args.target.id);
            let value = chain
                .get_int(target, args.attribute)
                .with_context(|| format!("Failed to read {} of {target}", args.attribute))?;
            println!("{value}");
        }
        Commands::GetString(args) => {
            let target = Target::new(args.target.kind, args.target.id);
            let value = chain
                .get_string(target, args.attribute)
                .with_context(|| format!("Failed to read {} of {target}", args.attribute))?;
            println!("{value}");
        }
        Commands::List(args) => {
            list(&chain, Target::new(args.kind, args.id));
        }
    }

    Ok(())
}

fn open_backends(cli: &Cli) -> Result<Backends> {
    let Some(path) = cli.mock.clone().or_else(EnvConfig::mock_topology_path) else {
        let library: Arc<dyn ManagementLibrary> = Arc::new(NvmlLibrary::new());
        return Ok((library, None));
    };

    let topology = MockTopology::load(&path)
        .with_context(|| format!("Failed to load mock topology {}", path.display()))?;
    debug!(
        "Using mock topology {} with {} devices",
        path.display(),
        topology.devices.len()
    );

    let legacy: Option<Arc<dyn LegacyBackend>> = if topology.legacy_uuids.is_empty() {
        None
    } else {
        Some(Arc::new(MockLegacyBackend::new(topology.legacy_uuids.clone())))
    };
    let library: Arc<dyn ManagementLibrary> = Arc::new(MockLibrary::new(topology));
    Ok((library, legacy))
}

/// Print every attribute with a vendor accessor for `target`, one per line.
fn list(chain: &SourceChain, target: Target) {
    let table = AttributeTable::global();

    let mut ints: Vec<_> = table
        .int_get
        .ids_for(target.kind)
        .filter(|(_, binding)| binding.is_bound())
        .map(|(attr, _)| attr)
        .collect();
    ints.sort();
    for attr in ints {
        match chain.get_int(target, attr) {
            Ok(value) => println!("{attr}: {value}"),
            Err(e) => println!("{attr}: <{e}>"),
        }
    }

    let mut strings: Vec<_> = table
        .string_get
        .ids_for(target.kind)
        .filter(|(_, binding)| binding.is_bound())
        .map(|(attr, _)| attr)
        .collect();
    strings.sort();
    for attr in strings {
        match chain.get_string(target, attr) {
            Ok(value) => println!("{attr}: {value}"),
            Err(e) => println!("{attr}: <{e}>"),
        }
    }
}
