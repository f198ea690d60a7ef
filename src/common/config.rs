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

/// Constants shared by the vendor bindings and the attribute tables
pub struct ShimConfig;

impl ShimConfig {
    // Vendor library limits
    pub const MAX_VENDOR_STRING_LEN: usize = 64;
    pub const PROBED_FAN_INDEX: u32 = 0; // Vendor model exposes one fan per device

    // Unit conversion
    pub const BYTES_TO_MIB_SHIFT: u32 = 20;

    // Logging
    pub const DEFAULT_LOG_FILTER: &'static str = "nvml_attributes=info";
    pub const VERBOSE_LOG_FILTER: &'static str = "nvml_attributes=debug";
}

/// Environment-specific configuration
pub struct EnvConfig;

impl EnvConfig {
    /// Environment variable naming a mock topology file, used when `--mock`
    /// is not given on the command line.
    pub const MOCK_TOPOLOGY_VAR: &'static str = "NVML_ATTRIBUTES_MOCK";

    pub fn log_filter(verbose: bool) -> &'static str {
        if verbose {
            ShimConfig::VERBOSE_LOG_FILTER
        } else {
            ShimConfig::DEFAULT_LOG_FILTER
        }
    }

    pub fn mock_topology_path() -> Option<std::path::PathBuf> {
        std::env::var_os(Self::MOCK_TOPOLOGY_VAR)
            .filter(|value| !value.is_empty())
            .map(std::path::PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(EnvConfig::log_filter(false), "nvml_attributes=info");
        assert_eq!(EnvConfig::log_filter(true), "nvml_attributes=debug");
    }
}
