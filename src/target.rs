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

//! Addressable targets of the attribute protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every target type the attribute protocol knows about.
///
/// Only [`TargetKind::Gpu`], [`TargetKind::ThermalSensor`] and
/// [`TargetKind::Cooler`] are served from the vendor library; the others
/// belong to the legacy backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    XScreen,
    Gpu,
    FrameLock,
    Vcsc,
    Gvi,
    Cooler,
    ThermalSensor,
    Transceiver3dVisionPro,
    Display,
    Mosaic,
}

impl TargetKind {
    pub const VENDOR_COMPATIBLE: [TargetKind; 3] =
        [TargetKind::Gpu, TargetKind::ThermalSensor, TargetKind::Cooler];

    pub const fn is_vendor_compatible(self) -> bool {
        matches!(
            self,
            TargetKind::Gpu | TargetKind::ThermalSensor | TargetKind::Cooler
        )
    }

    /// Label used in log messages.
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::XScreen => "X screen",
            TargetKind::Gpu => "GPU",
            TargetKind::FrameLock => "Frame lock",
            TargetKind::Vcsc => "VCSC",
            TargetKind::Gvi => "GVI",
            TargetKind::Cooler => "Fan",
            TargetKind::ThermalSensor => "Thermal sensor",
            TargetKind::Transceiver3dVisionPro => "3D Vision Pro transceiver",
            TargetKind::Display => "Display",
            TargetKind::Mosaic => "Mosaic",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gpu" => Ok(TargetKind::Gpu),
            "sensor" | "thermal" | "thermal_sensor" => Ok(TargetKind::ThermalSensor),
            "cooler" | "fan" => Ok(TargetKind::Cooler),
            "screen" | "x_screen" => Ok(TargetKind::XScreen),
            "framelock" | "frame_lock" => Ok(TargetKind::FrameLock),
            "vcsc" => Ok(TargetKind::Vcsc),
            "gvi" => Ok(TargetKind::Gvi),
            "display" | "dpy" => Ok(TargetKind::Display),
            "mosaic" => Ok(TargetKind::Mosaic),
            other => Err(format!("unknown target type '{other}'")),
        }
    }
}

/// A requested target: a kind plus the protocol-level id within that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    pub id: i32,
}

impl Target {
    pub const fn new(kind: TargetKind, id: i32) -> Self {
        Self { kind, id }
    }

    pub const fn gpu(id: i32) -> Self {
        Self::new(TargetKind::Gpu, id)
    }

    pub const fn thermal_sensor(id: i32) -> Self {
        Self::new(TargetKind::ThermalSensor, id)
    }

    pub const fn cooler(id: i32) -> Self {
        Self::new(TargetKind::Cooler, id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_compatibility() {
        for kind in TargetKind::VENDOR_COMPATIBLE {
            assert!(kind.is_vendor_compatible());
        }
        assert!(!TargetKind::XScreen.is_vendor_compatible());
        assert!(!TargetKind::Display.is_vendor_compatible());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("GPU".parse::<TargetKind>(), Ok(TargetKind::Gpu));
        assert_eq!("fan".parse::<TargetKind>(), Ok(TargetKind::Cooler));
        assert_eq!("sensor".parse::<TargetKind>(), Ok(TargetKind::ThermalSensor));
        assert!("toaster".parse::<TargetKind>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Target::cooler(2).to_string(), "Fan (2)");
        assert_eq!(Target::thermal_sensor(0).to_string(), "Thermal sensor (0)");
    }
}
