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

//! Numeric attribute identifiers.
//!
//! Ids are plain `u32` newtypes so that values outside the named set can
//! still be carried through the dispatcher (and reported as unhandled). The
//! named constants double as the name table used in log messages.

use std::fmt;
use std::str::FromStr;

/// Declare an attribute id newtype together with its named constants,
/// name lookup and parsing.
macro_rules! attribute_ids {
    (
        $(#[$meta:meta])*
        $ty:ident { $($name:ident = $value:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $ty(pub u32);

        impl $ty {
            $(pub const $name: $ty = $ty($value);)*

            /// Every named id, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$name),*];

            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some(stringify!($name)),)*
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                let wanted = name.to_ascii_uppercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|id| id.name() == Some(wanted.as_str()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{name} ({})", self.0),
                    None => write!(f, "Unknown ({})", self.0),
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            /// Accepts either a symbolic name (case-insensitive) or a number.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if let Some(id) = Self::from_name(s) {
                    return Ok(id);
                }
                s.parse::<u32>()
                    .map($ty)
                    .map_err(|_| format!("unknown attribute '{s}'"))
            }
        }
    };
}

attribute_ids! {
    /// Integer attribute id.
    IntAttribute {
        DITHERING = 3,
        DIGITAL_VIBRANCE = 4,
        BUS_TYPE = 5,
        VIDEO_RAM = 6,
        IRQ = 7,
        OPERATING_SYSTEM = 8,
        SYNC_TO_VBLANK = 9,
        LOG_ANISO = 10,
        FSAA_MODE = 11,
        CONNECTED_DISPLAYS = 19,
        ENABLED_DISPLAYS = 20,
        FRAMELOCK = 21,
        GPU_CORE_TEMPERATURE = 60,
        AMBIENT_TEMPERATURE = 64,
        XINERAMA = 77,
        GPU_CURRENT_CLOCK_FREQS = 90,
        REFRESH_RATE = 97,
        IS_GVO_DISPLAY = 101,
        PCI_BUS = 116,
        PCI_DEVICE = 117,
        PCI_FUNCTION = 118,
        MAX_SCREEN_WIDTH = 123,
        MAX_SCREEN_HEIGHT = 124,
        MAX_DISPLAYS = 125,
        MULTIGPU_MASTER_POSSIBLE = 145,
        NO_SCANOUT = 180,
        REFRESH_RATE_3 = 206,
        GPU_PCIE_MAX_LINK_WIDTH = 211,
        GPU_PCIE_CURRENT_LINK_WIDTH = 212,
        GPU_PCIE_MAX_LINK_SPEED = 241,
        GPU_PCIE_CURRENT_LINK_SPEED = 242,
        SYNCHRONOUS_PALETTE_UPDATES = 243,
        GPU_POWER_SOURCE = 262,
        GPU_CURRENT_PERFORMANCE_LEVEL = 265,
        GPU_ADAPTIVE_CLOCK_STATE = 266,
        PCI_ID = 269,
        DEPTH_30_ALLOWED = 279,
        GPU_POWER_MIZER_MODE = 282,
        GPU_POWER_MIZER_DEFAULT_MODE = 283,
        IMAGE_SHARPENING_DEFAULT = 294,
        PCI_DOMAIN = 306,
        GPU_ECC_SUPPORTED = 307,
        GPU_ECC_STATUS = 308,
        GPU_ECC_CONFIGURATION = 309,
        GPU_ECC_DEFAULT_CONFIGURATION = 310,
        GPU_ECC_DOUBLE_BIT_ERRORS = 312,
        GPU_ECC_AGGREGATE_DOUBLE_BIT_ERRORS = 314,
        GPU_ECC_CONFIGURATION_SUPPORTED = 318,
        GPU_COOLER_MANUAL_CONTROL = 319,
        THERMAL_COOLER_LEVEL = 320,
        THERMAL_COOLER_LEVEL_SET_DEFAULT = 321,
        THERMAL_COOLER_CONTROL_TYPE = 322,
        THERMAL_COOLER_TARGET = 323,
        GPU_CURRENT_PROCESSOR_CLOCK_FREQS = 330,
        DITHERING_MODE = 340,
        CURRENT_DITHERING = 341,
        CURRENT_DITHERING_MODE = 342,
        DITHERING_DEPTH = 343,
        CURRENT_DITHERING_DEPTH = 344,
        GPU_PCIE_GENERATION = 347,
        BASE_MOSAIC = 350,
        SLI_MOSAIC_MODE_AVAILABLE = 351,
        GPU_CORES = 356,
        GPU_MEMORY_BUS_WIDTH = 357,
        COLOR_SPACE = 370,
        COLOR_RANGE = 371,
        GPU_DOUBLE_PRECISION_BOOST_IMMEDIATE = 385,
        GPU_DOUBLE_PRECISION_BOOST_REBOOT = 386,
        TOTAL_DEDICATED_GPU_MEMORY = 393,
        USED_DEDICATED_GPU_MEMORY = 394,
        THERMAL_SENSOR_READING = 400,
        THERMAL_SENSOR_PROVIDER = 401,
        THERMAL_SENSOR_TARGET = 402,
        THERMAL_COOLER_SPEED = 405,
        VIDEO_ENCODER_UTILIZATION = 408,
        VIDEO_DECODER_UTILIZATION = 409,
        ATTR_NV_MAJOR_VERSION = 411,
        ATTR_NV_MINOR_VERSION = 412,
        DPY_HDMI_3D = 416,
    }
}

attribute_ids! {
    /// String attribute id.
    StringAttribute {
        PRODUCT_NAME = 0,
        VBIOS_VERSION = 1,
        NVIDIA_DRIVER_VERSION = 3,
        SLI_MODE = 10,
        GVIO_FIRMWARE_VERSION = 14,
        PERFORMANCE_MODES = 29,
        GPU_CURRENT_CLOCK_FREQS = 34,
        GPU_UUID = 52,
        GPU_UTILIZATION = 53,
        MULTIGPU_MODE = 54,
    }
}

attribute_ids! {
    /// Binary attribute id.
    BinaryAttribute {
        EDID = 0,
        XSCREENS_USING_GPU = 3,
        FRAMELOCKS_USED_BY_GPU = 7,
        VCSCS_USED_BY_GPU = 9,
        COOLERS_USED_BY_GPU = 10,
        THERMAL_SENSORS_USED_BY_GPU = 12,
        DISPLAYS_CONNECTED_TO_GPU = 15,
        GPU_FLAGS = 19,
        DISPLAYS_ON_GPU = 20,
    }
}
