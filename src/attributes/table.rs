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

//! Attribute dispatch tables.
//!
//! Each `(target kind, attribute id)` pair that this layer knows about maps to
//! a small descriptor. Reads that the vendor library can answer carry a bound
//! accessor; everything else is either pending (not implemented yet) or
//! permanently unsupported (display and X-server scoped state). Pairs absent
//! from a table are "unhandled" and get logged by the dispatcher.

use crate::attributes::{pci, BinaryAttribute, IntAttribute, StringAttribute};
use crate::common::config::ShimConfig;
use crate::target::TargetKind;
use crate::vendor::{DeviceHandle, ManagementLibrary, VendorResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::hash::Hash;

pub type IntReader = fn(&dyn ManagementLibrary, DeviceHandle) -> VendorResult<i64>;
pub type StringReader = fn(&dyn ManagementLibrary, DeviceHandle) -> VendorResult<String>;

/// How a read request is served.
#[derive(Clone, Copy)]
pub enum Binding<R> {
    Pending,
    Unsupported,
    Bound(R),
}

impl<R> Binding<R> {
    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound(_))
    }
}

/// Descriptor for requests that have no vendor implementation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stub {
    Pending,
    Unsupported,
}

/// One table: `(TargetKind, id) -> descriptor`.
pub struct Bindings<A, D> {
    entries: HashMap<(TargetKind, A), D>,
}

impl<A: Copy + Eq + Hash, D: Copy> Bindings<A, D> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn insert_all(&mut self, kind: TargetKind, ids: &[A], descriptor: D) {
        for id in ids {
            self.entries.insert((kind, *id), descriptor);
        }
    }

    pub fn lookup(&self, kind: TargetKind, id: A) -> Option<D> {
        self.entries.get(&(kind, id)).copied()
    }

    /// All ids registered for `kind`, in no particular order.
    pub fn ids_for(&self, kind: TargetKind) -> impl Iterator<Item = (A, D)> + '_ {
        self.entries
            .iter()
            .filter(move |((k, _), _)| *k == kind)
            .map(|((_, id), d)| (*id, *d))
    }

    /// Whether any id is registered for `kind`.
    pub fn covers(&self, kind: TargetKind) -> bool {
        self.entries.keys().any(|(k, _)| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Copy + Eq + Hash, R: Copy> Bindings<A, Binding<R>> {
    fn bind(&mut self, kind: TargetKind, id: A, reader: R) {
        self.entries.insert((kind, id), Binding::Bound(reader));
    }
}

/// Every table the dispatcher consults.
pub struct AttributeTable {
    pub int_get: Bindings<IntAttribute, Binding<IntReader>>,
    pub int_set: Bindings<IntAttribute, Stub>,
    pub int_valid: Bindings<IntAttribute, Stub>,
    pub string_get: Bindings<StringAttribute, Binding<StringReader>>,
    pub string_set: Bindings<StringAttribute, Stub>,
    pub string_valid: Bindings<StringAttribute, Stub>,
    pub binary_get: Bindings<BinaryAttribute, Stub>,
}

static TABLE: Lazy<AttributeTable> = Lazy::new(AttributeTable::build);

impl AttributeTable {
    /// The process-wide table, built on first use.
    pub fn global() -> &'static AttributeTable {
        &TABLE
    }

    fn build() -> Self {
        use IntAttribute as I;
        use StringAttribute as S;
        use TargetKind::{Cooler, Gpu, ThermalSensor};

        let mut int_get = Bindings::new();
        int_get.bind(Gpu, I::TOTAL_DEDICATED_GPU_MEMORY, total_memory_mib as IntReader);
        int_get.bind(Gpu, I::USED_DEDICATED_GPU_MEMORY, used_memory_mib);
        int_get.bind(Gpu, I::PCI_DOMAIN, pci_domain);
        int_get.bind(Gpu, I::PCI_BUS, pci_bus);
        int_get.bind(Gpu, I::PCI_DEVICE, pci_device);
        int_get.bind(Gpu, I::PCI_FUNCTION, pci_function);
        int_get.bind(Gpu, I::PCI_ID, pci_id);
        int_get.bind(Gpu, I::GPU_PCIE_GENERATION, pcie_generation);
        int_get.bind(Gpu, I::GPU_PCIE_MAX_LINK_WIDTH, pcie_max_link_width);
        int_get.insert_all(Gpu, GPU_INT_PENDING, Binding::Pending);
        int_get.insert_all(Gpu, GPU_INT_DISPLAY_SCOPED, Binding::Unsupported);
        int_get.bind(ThermalSensor, I::THERMAL_SENSOR_READING, sensor_reading);
        int_get.insert_all(
            ThermalSensor,
            &[I::THERMAL_SENSOR_PROVIDER, I::THERMAL_SENSOR_TARGET],
            Binding::Pending,
        );
        int_get.bind(Cooler, I::THERMAL_COOLER_LEVEL, cooler_level);
        int_get.insert_all(
            Cooler,
            &[
                I::THERMAL_COOLER_SPEED,
                I::THERMAL_COOLER_CONTROL_TYPE,
                I::THERMAL_COOLER_TARGET,
            ],
            Binding::Pending,
        );

        let mut int_set = Bindings::new();
        int_set.insert_all(
            Gpu,
            &[
                I::GPU_CURRENT_CLOCK_FREQS,
                I::GPU_POWER_MIZER_MODE,
                I::GPU_ECC_CONFIGURATION,
                I::GPU_COOLER_MANUAL_CONTROL,
            ],
            Stub::Pending,
        );
        int_set.insert_all(
            Gpu,
            &[
                I::DITHERING,
                I::DITHERING_MODE,
                I::DITHERING_DEPTH,
                I::DIGITAL_VIBRANCE,
                I::COLOR_SPACE,
                I::COLOR_RANGE,
                I::SYNCHRONOUS_PALETTE_UPDATES,
            ],
            Stub::Unsupported,
        );
        int_set.insert_all(
            Cooler,
            &[I::THERMAL_COOLER_LEVEL, I::THERMAL_COOLER_LEVEL_SET_DEFAULT],
            Stub::Pending,
        );

        let mut int_valid = Bindings::new();
        int_valid.insert_all(Gpu, GPU_INT_SUPPORTED, Stub::Pending);
        int_valid.insert_all(Gpu, GPU_INT_PENDING, Stub::Pending);
        int_valid.insert_all(Gpu, GPU_INT_DISPLAY_SCOPED, Stub::Unsupported);
        int_valid.insert_all(
            ThermalSensor,
            &[
                I::THERMAL_SENSOR_READING,
                I::THERMAL_SENSOR_PROVIDER,
                I::THERMAL_SENSOR_TARGET,
            ],
            Stub::Pending,
        );
        int_valid.insert_all(
            Cooler,
            &[
                I::THERMAL_COOLER_LEVEL,
                I::THERMAL_COOLER_SPEED,
                I::THERMAL_COOLER_CONTROL_TYPE,
                I::THERMAL_COOLER_TARGET,
            ],
            Stub::Pending,
        );

        let mut string_get = Bindings::new();
        string_get.bind(Gpu, S::PRODUCT_NAME, product_name as StringReader);
        string_get.bind(Gpu, S::VBIOS_VERSION, vbios_version);
        string_get.bind(Gpu, S::GPU_UUID, gpu_uuid);
        string_get.insert_all(Gpu, GPU_STRING_PENDING, Binding::Pending);

        let mut string_set = Bindings::new();
        string_set.insert_all(Gpu, &[S::GPU_CURRENT_CLOCK_FREQS], Stub::Pending);

        let mut string_valid = Bindings::new();
        string_valid.insert_all(
            Gpu,
            &[S::PRODUCT_NAME, S::VBIOS_VERSION, S::GPU_UUID],
            Stub::Pending,
        );
        string_valid.insert_all(Gpu, GPU_STRING_PENDING, Stub::Pending);

        let mut binary_get = Bindings::new();
        binary_get.insert_all(Gpu, GPU_BINARY_PENDING, Stub::Pending);

        Self {
            int_get,
            int_set,
            int_valid,
            string_get,
            string_set,
            string_valid,
            binary_get,
        }
    }
}

/// GPU integer reads backed by a vendor call.
const GPU_INT_SUPPORTED: &[IntAttribute] = &[
    IntAttribute::TOTAL_DEDICATED_GPU_MEMORY,
    IntAttribute::USED_DEDICATED_GPU_MEMORY,
    IntAttribute::PCI_DOMAIN,
    IntAttribute::PCI_BUS,
    IntAttribute::PCI_DEVICE,
    IntAttribute::PCI_FUNCTION,
    IntAttribute::PCI_ID,
    IntAttribute::GPU_PCIE_GENERATION,
    IntAttribute::GPU_PCIE_MAX_LINK_WIDTH,
];

/// GPU integer reads the vendor library can serve but which are not wired up yet.
const GPU_INT_PENDING: &[IntAttribute] = &[
    IntAttribute::VIDEO_RAM,
    IntAttribute::GPU_PCIE_CURRENT_LINK_WIDTH,
    IntAttribute::GPU_PCIE_MAX_LINK_SPEED,
    IntAttribute::GPU_PCIE_CURRENT_LINK_SPEED,
    IntAttribute::BUS_TYPE,
    IntAttribute::GPU_MEMORY_BUS_WIDTH,
    IntAttribute::GPU_CORES,
    IntAttribute::IRQ,
    IntAttribute::GPU_COOLER_MANUAL_CONTROL,
    IntAttribute::GPU_POWER_SOURCE,
    IntAttribute::GPU_CURRENT_PERFORMANCE_LEVEL,
    IntAttribute::GPU_ADAPTIVE_CLOCK_STATE,
    IntAttribute::GPU_POWER_MIZER_MODE,
    IntAttribute::GPU_POWER_MIZER_DEFAULT_MODE,
    IntAttribute::GPU_DOUBLE_PRECISION_BOOST_IMMEDIATE,
    IntAttribute::GPU_DOUBLE_PRECISION_BOOST_REBOOT,
    IntAttribute::GPU_ECC_SUPPORTED,
    IntAttribute::GPU_ECC_STATUS,
    IntAttribute::GPU_ECC_CONFIGURATION,
    IntAttribute::GPU_ECC_DEFAULT_CONFIGURATION,
    IntAttribute::GPU_ECC_DOUBLE_BIT_ERRORS,
    IntAttribute::GPU_ECC_AGGREGATE_DOUBLE_BIT_ERRORS,
    IntAttribute::GPU_ECC_CONFIGURATION_SUPPORTED,
    IntAttribute::ATTR_NV_MAJOR_VERSION,
    IntAttribute::ATTR_NV_MINOR_VERSION,
    IntAttribute::OPERATING_SYSTEM,
    IntAttribute::GPU_CORE_TEMPERATURE,
    IntAttribute::AMBIENT_TEMPERATURE,
    IntAttribute::GPU_CURRENT_CLOCK_FREQS,
    IntAttribute::GPU_CURRENT_PROCESSOR_CLOCK_FREQS,
    IntAttribute::VIDEO_ENCODER_UTILIZATION,
    IntAttribute::VIDEO_DECODER_UTILIZATION,
];

/// GPU integer attributes that describe display or X-server state.
const GPU_INT_DISPLAY_SCOPED: &[IntAttribute] = &[
    IntAttribute::ENABLED_DISPLAYS,
    IntAttribute::CONNECTED_DISPLAYS,
    IntAttribute::MAX_SCREEN_WIDTH,
    IntAttribute::MAX_SCREEN_HEIGHT,
    IntAttribute::MAX_DISPLAYS,
    IntAttribute::DEPTH_30_ALLOWED,
    IntAttribute::MULTIGPU_MASTER_POSSIBLE,
    IntAttribute::SLI_MOSAIC_MODE_AVAILABLE,
    IntAttribute::BASE_MOSAIC,
    IntAttribute::XINERAMA,
    IntAttribute::NO_SCANOUT,
    IntAttribute::FRAMELOCK,
    IntAttribute::IS_GVO_DISPLAY,
    IntAttribute::DITHERING,
    IntAttribute::CURRENT_DITHERING,
    IntAttribute::DITHERING_MODE,
    IntAttribute::CURRENT_DITHERING_MODE,
    IntAttribute::DITHERING_DEPTH,
    IntAttribute::CURRENT_DITHERING_DEPTH,
    IntAttribute::DIGITAL_VIBRANCE,
    IntAttribute::IMAGE_SHARPENING_DEFAULT,
    IntAttribute::REFRESH_RATE,
    IntAttribute::REFRESH_RATE_3,
    IntAttribute::COLOR_SPACE,
    IntAttribute::COLOR_RANGE,
    IntAttribute::SYNCHRONOUS_PALETTE_UPDATES,
    IntAttribute::DPY_HDMI_3D,
];

const GPU_STRING_PENDING: &[StringAttribute] = &[
    StringAttribute::NVIDIA_DRIVER_VERSION,
    StringAttribute::SLI_MODE,
    StringAttribute::PERFORMANCE_MODES,
    StringAttribute::GPU_CURRENT_CLOCK_FREQS,
    StringAttribute::GPU_UTILIZATION,
    StringAttribute::MULTIGPU_MODE,
    StringAttribute::GVIO_FIRMWARE_VERSION,
];

const GPU_BINARY_PENDING: &[BinaryAttribute] = &[
    BinaryAttribute::FRAMELOCKS_USED_BY_GPU,
    BinaryAttribute::VCSCS_USED_BY_GPU,
    BinaryAttribute::COOLERS_USED_BY_GPU,
    BinaryAttribute::THERMAL_SENSORS_USED_BY_GPU,
    BinaryAttribute::DISPLAYS_CONNECTED_TO_GPU,
    BinaryAttribute::DISPLAYS_ON_GPU,
    BinaryAttribute::GPU_FLAGS,
    BinaryAttribute::XSCREENS_USING_GPU,
];

fn total_memory_mib(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.memory_info(device)
        .map(|m| (m.total >> ShimConfig::BYTES_TO_MIB_SHIFT) as i64)
}

fn used_memory_mib(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.memory_info(device)
        .map(|m| (m.used >> ShimConfig::BYTES_TO_MIB_SHIFT) as i64)
}

fn pci_domain(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.pci_info(device).map(|p| i64::from(p.domain))
}

fn pci_bus(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.pci_info(device).map(|p| i64::from(p.bus))
}

fn pci_device(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.pci_info(device).map(|p| i64::from(p.device))
}

fn pci_function(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.pci_info(device)
        .map(|p| i64::from(pci::function_from_bus_id(&p.bus_id)))
}

fn pci_id(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.pci_info(device)
        .map(|p| i64::from(pci::swap_id_halves(p.pci_device_id)))
}

fn pcie_generation(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.max_pcie_link_generation(device).map(i64::from)
}

fn pcie_max_link_width(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.max_pcie_link_width(device).map(i64::from)
}

fn sensor_reading(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.temperature(device).map(i64::from)
}

fn cooler_level(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<i64> {
    lib.fan_speed(device).map(i64::from)
}

fn product_name(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<String> {
    lib.name(device)
}

fn vbios_version(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<String> {
    lib.vbios_version(device)
}

fn gpu_uuid(lib: &dyn ManagementLibrary, device: DeviceHandle) -> VendorResult<String> {
    lib.uuid(device)
}
