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

//! Attribute request entry points.
//!
//! Every call walks the same steps: the vendor library must be acquired, the
//! handle must still hold its enumerated state, sensor and cooler ids must
//! pass the bounds check, and the vendor device behind the handle must be
//! reachable. Only then is the `(target kind, attribute)` pair looked up in
//! the [`AttributeTable`]. A target kind with no entries at all for an
//! operation is reported as unhandled before any of the handle checks.

use crate::attributes::table::{Binding, Stub};
use crate::attributes::{
    AttributeTable, BinaryAttribute, IntAttribute, StringAttribute, ValidValues,
};
use crate::error::{AttributeError, Result};
use crate::handle::TargetHandle;
use crate::legacy::LegacyBackend;
use crate::lifecycle::LibraryLifecycle;
use crate::target::{Target, TargetKind};
use crate::topology::resolve::resolve;
use crate::vendor::{DeviceHandle, VendorResult};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

pub struct AttributeDispatcher {
    lifecycle: Arc<LibraryLifecycle>,
    table: &'static AttributeTable,
}

impl AttributeDispatcher {
    pub fn new(lifecycle: Arc<LibraryLifecycle>) -> Self {
        Self {
            lifecycle,
            table: AttributeTable::global(),
        }
    }

    pub fn lifecycle(&self) -> &Arc<LibraryLifecycle> {
        &self.lifecycle
    }

    pub fn open(
        &self,
        target: Target,
        legacy: Option<&dyn LegacyBackend>,
    ) -> Result<TargetHandle> {
        TargetHandle::open(&self.lifecycle, target, legacy)
    }

    /// Number of GPUs, thermal sensors or coolers known to `handle`.
    pub fn query_target_count(&self, handle: &TargetHandle, kind: TargetKind) -> Result<u32> {
        self.ensure_acquired()?;
        let attrs = handle.attributes().ok_or(AttributeError::BadHandle)?;
        attrs.count_of(kind).ok_or(AttributeError::BadArgument)
    }

    pub fn get_int(&self, handle: &TargetHandle, attr: IntAttribute) -> Result<i64> {
        let target = self.check_target(handle)?;
        if !self.table.int_get.covers(target.kind) {
            return Err(unhandled("integer", attr, target, None));
        }
        let device = self.device_for(handle)?;

        match self.table.int_get.lookup(target.kind, attr) {
            Some(Binding::Bound(read)) => vendor_call(read(self.lifecycle.library(), device), attr, target),
            Some(Binding::Pending) => Err(not_implemented(Stub::Pending, attr, target)),
            Some(Binding::Unsupported) => Err(not_implemented(Stub::Unsupported, attr, target)),
            None => Err(unhandled("integer", attr, target, None)),
        }
    }

    pub fn set_int(&self, handle: &TargetHandle, attr: IntAttribute, value: i64) -> Result<()> {
        let target = self.check_target(handle)?;
        let set_to = Some(value.to_string());
        if !self.table.int_set.covers(target.kind) {
            return Err(unhandled("integer", attr, target, set_to));
        }
        self.device_for(handle)?;

        match self.table.int_set.lookup(target.kind, attr) {
            Some(stub) => Err(not_implemented(stub, attr, target)),
            None => Err(unhandled("integer", attr, target, set_to)),
        }
    }

    pub fn get_string(&self, handle: &TargetHandle, attr: StringAttribute) -> Result<String> {
        let target = self.check_target(handle)?;
        if !self.table.string_get.covers(target.kind) {
            return Err(unhandled("string", attr, target, None));
        }
        let device = self.device_for(handle)?;

        match self.table.string_get.lookup(target.kind, attr) {
            Some(Binding::Bound(read)) => vendor_call(read(self.lifecycle.library(), device), attr, target),
            Some(Binding::Pending) => Err(not_implemented(Stub::Pending, attr, target)),
            Some(Binding::Unsupported) => Err(not_implemented(Stub::Unsupported, attr, target)),
            None => Err(unhandled("string", attr, target, None)),
        }
    }

    pub fn set_string(
        &self,
        handle: &TargetHandle,
        attr: StringAttribute,
        value: &str,
    ) -> Result<()> {
        let target = self.check_target(handle)?;
        let set_to = Some(format!("'{value}'"));
        if !self.table.string_set.covers(target.kind) {
            return Err(unhandled("string", attr, target, set_to));
        }
        self.device_for(handle)?;

        match self.table.string_set.lookup(target.kind, attr) {
            Some(stub) => Err(not_implemented(stub, attr, target)),
            None => Err(unhandled("string", attr, target, set_to)),
        }
    }

    pub fn get_binary(&self, handle: &TargetHandle, attr: BinaryAttribute) -> Result<Vec<u8>> {
        let target = self.check_target(handle)?;
        if !self.table.binary_get.covers(target.kind) {
            return Err(unhandled("binary", attr, target, None));
        }
        self.device_for(handle)?;

        match self.table.binary_get.lookup(target.kind, attr) {
            Some(stub) => Err(not_implemented(stub, attr, target)),
            None => Err(unhandled("binary", attr, target, None)),
        }
    }

    /// Describe the values an integer attribute accepts.
    ///
    /// Attributes this layer knows for the target kind report
    /// [`AttributeError::NotSupported`]; anything else is
    /// [`AttributeError::AttributeNotAvailable`] so the request can move on
    /// to another source.
    pub fn valid_values(&self, handle: &TargetHandle, attr: IntAttribute) -> Result<ValidValues> {
        let target = self.check_target(handle)?;
        self.device_for(handle)?;

        match self.table.int_valid.lookup(target.kind, attr) {
            Some(stub) => Err(not_implemented(stub, attr, target)),
            None => Err(AttributeError::AttributeNotAvailable),
        }
    }

    /// Like [`Self::valid_values`] for string attributes. Only the table is
    /// consulted; the handle state and vendor device are not touched.
    pub fn valid_string_values(
        &self,
        handle: &TargetHandle,
        attr: StringAttribute,
    ) -> Result<ValidValues> {
        let target = self.check_target(handle)?;

        match self.table.string_valid.lookup(target.kind, attr) {
            Some(stub) => Err(not_implemented(stub, attr, target)),
            None => Err(AttributeError::AttributeNotAvailable),
        }
    }

    fn ensure_acquired(&self) -> Result<()> {
        if self.lifecycle.is_acquired() {
            Ok(())
        } else {
            Err(AttributeError::CapabilityMissing)
        }
    }

    fn check_target(&self, handle: &TargetHandle) -> Result<Target> {
        self.ensure_acquired()?;
        let target = handle.target();
        debug_assert!(
            target.kind.is_vendor_compatible(),
            "{} targets must not reach the vendor dispatcher",
            target.kind
        );
        if !target.kind.is_vendor_compatible() {
            return Err(AttributeError::BadHandle);
        }
        Ok(target)
    }

    /// Bounds-check the target and look up the vendor device serving it.
    fn device_for(&self, handle: &TargetHandle) -> Result<DeviceHandle> {
        let target = handle.target();
        let attrs = handle.attributes().ok_or(AttributeError::BadHandle)?;

        let sub_resources = match target.kind {
            TargetKind::ThermalSensor => Some((attrs.sensor_count, &attrs.sensors_per_device)),
            TargetKind::Cooler => Some((attrs.cooler_count, &attrs.coolers_per_device)),
            _ => None,
        };
        if let Some((total, per_device)) = sub_resources {
            let sub = resolve(target.id, total, per_device).ok_or(AttributeError::BadHandle)?;
            trace!("{target} is #{} on GPU {}", sub.position, sub.slot);
        }

        self.lifecycle
            .library()
            .device_by_index(attrs.resolved_device_index)
            .map_err(|e| {
                error!(
                    "Failed to get vendor device {} for {target}: {e}",
                    attrs.resolved_device_index
                );
                AttributeError::NotSupported
            })
    }
}

fn vendor_call<T>(result: VendorResult<T>, attr: impl Display, target: Target) -> Result<T> {
    result.map_err(|e| {
        error!("Failed to read {attr} of {target}: {e}");
        AttributeError::NotSupported
    })
}

fn not_implemented(stub: Stub, attr: impl Display, target: Target) -> AttributeError {
    match stub {
        Stub::Pending => debug!("Attribute {attr} of {target} is not implemented yet"),
        Stub::Unsupported => trace!("Attribute {attr} of {target} is not supported"),
    }
    AttributeError::NotSupported
}

fn unhandled(
    value_kind: &str,
    attr: impl Display,
    target: Target,
    set_to: Option<String>,
) -> AttributeError {
    match set_to {
        Some(value) => warn!("Unhandled {value_kind} attribute {attr} of {target} (set to {value})"),
        None => warn!("Unhandled {value_kind} attribute {attr} of {target}"),
    }
    AttributeError::NotSupported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::mock::{MockDevice, MockLibrary, MockTopology};
    use crate::vendor::{MemoryInfo, PciInfo};
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, counter.0.load(Ordering::SeqCst))
    }

    /// Records the message of every error-level event.
    #[derive(Clone, Default)]
    struct ErrorLog(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor<'a>(&'a mut String);

    impl Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                *self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for ErrorLog {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                let mut message = String::new();
                event.record(&mut MessageVisitor(&mut message));
                self.0.lock().unwrap().push(message);
            }
        }
    }

    fn capture_errors<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let log = ErrorLog::default();
        let subscriber = tracing_subscriber::registry().with(log.clone());
        let out = tracing::subscriber::with_default(subscriber, f);
        let messages = log.0.lock().unwrap().clone();
        (out, messages)
    }

    fn a100(uuid: &str) -> MockDevice {
        MockDevice {
            name: Some("NVIDIA A100-SXM4-40GB".to_string()),
            vbios_version: Some("92.00.45.00.06".to_string()),
            memory: Some(MemoryInfo {
                total: 40 << 30,
                used: 512 << 20,
            }),
            pci: Some(PciInfo {
                domain: 0,
                bus: 0x41,
                device: 0,
                pci_device_id: 0x20b0_10de,
                bus_id: "00000000:41:00.1".to_string(),
            }),
            max_pcie_link_generation: Some(4),
            max_pcie_link_width: Some(16),
            ..MockDevice::with_uuid(uuid).temperature(41).fan_speed(35)
        }
    }

    fn setup(devices: Vec<MockDevice>) -> (Arc<MockLibrary>, AttributeDispatcher) {
        let library = Arc::new(MockLibrary::new(MockTopology::new(devices)));
        let dispatcher = AttributeDispatcher::new(LibraryLifecycle::new(library.clone()));
        (library, dispatcher)
    }

    #[test]
    fn test_gpu_integer_reads() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();

        let read = |attr| dispatcher.get_int(&gpu, attr);
        assert_eq!(read(IntAttribute::TOTAL_DEDICATED_GPU_MEMORY), Ok(40960));
        assert_eq!(read(IntAttribute::USED_DEDICATED_GPU_MEMORY), Ok(512));
        assert_eq!(read(IntAttribute::PCI_BUS), Ok(0x41));
        assert_eq!(read(IntAttribute::PCI_FUNCTION), Ok(1));
        assert_eq!(read(IntAttribute::PCI_ID), Ok(0x10de_20b0));
        assert_eq!(read(IntAttribute::GPU_PCIE_GENERATION), Ok(4));
        assert_eq!(read(IntAttribute::GPU_PCIE_MAX_LINK_WIDTH), Ok(16));
    }

    #[test]
    fn test_gpu_string_reads() {
        let (_, dispatcher) = setup(vec![a100("GPU-abc")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();

        assert_eq!(
            dispatcher.get_string(&gpu, StringAttribute::PRODUCT_NAME).as_deref(),
            Ok("NVIDIA A100-SXM4-40GB")
        );
        assert_eq!(
            dispatcher.get_string(&gpu, StringAttribute::GPU_UUID).as_deref(),
            Ok("GPU-abc")
        );
        assert_eq!(
            dispatcher.get_string(&gpu, StringAttribute::NVIDIA_DRIVER_VERSION),
            Err(AttributeError::NotSupported)
        );
    }

    #[test]
    fn test_sensor_and_cooler_reads() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let sensor = dispatcher.open(Target::thermal_sensor(0), None).unwrap();
        let cooler = dispatcher.open(Target::cooler(0), None).unwrap();

        assert_eq!(
            dispatcher.get_int(&sensor, IntAttribute::THERMAL_SENSOR_READING),
            Ok(41)
        );
        assert_eq!(
            dispatcher.get_int(&cooler, IntAttribute::THERMAL_COOLER_LEVEL),
            Ok(35)
        );
        assert_eq!(
            dispatcher.get_int(&cooler, IntAttribute::THERMAL_COOLER_SPEED),
            Err(AttributeError::NotSupported)
        );
    }

    #[test]
    fn test_out_of_range_sub_resource_is_bad_handle() {
        let (_, dispatcher) = setup(vec![a100("GPU-0"), MockDevice::with_uuid("GPU-1")]);
        let cooler = dispatcher.open(Target::cooler(1), None).unwrap();

        assert_eq!(
            dispatcher.get_int(&cooler, IntAttribute::THERMAL_COOLER_LEVEL),
            Err(AttributeError::BadHandle)
        );
        assert_eq!(
            dispatcher.valid_values(&cooler, IntAttribute::THERMAL_COOLER_LEVEL),
            Err(AttributeError::BadHandle)
        );
    }

    #[test]
    fn test_vendor_failure_is_not_supported() {
        let (library, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();

        library.update_device(0, |d| d.pci = None);
        assert_eq!(
            dispatcher.get_int(&gpu, IntAttribute::PCI_DOMAIN),
            Err(AttributeError::NotSupported)
        );

        library.update_device(0, |d| d.lost = true);
        assert_eq!(
            dispatcher.get_int(&gpu, IntAttribute::TOTAL_DEDICATED_GPU_MEMORY),
            Err(AttributeError::NotSupported)
        );
    }

    #[test]
    fn test_vendor_failure_log_names_attribute_and_target() {
        let (library, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        library.update_device(0, |d| d.vbios_version = None);

        let (result, errors) =
            capture_errors(|| dispatcher.get_string(&gpu, StringAttribute::VBIOS_VERSION));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("VBIOS_VERSION"), "{}", errors[0]);
        assert!(errors[0].contains("GPU (0)"), "{}", errors[0]);
    }

    #[test]
    fn test_overlong_string_is_not_supported() {
        let (library, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        library.update_device(0, |d| d.name = Some("x".repeat(80)));
        assert_eq!(
            dispatcher.get_string(&gpu, StringAttribute::PRODUCT_NAME),
            Err(AttributeError::NotSupported)
        );
    }

    #[test]
    fn test_closed_handle() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let keep = dispatcher.open(Target::gpu(0), None).unwrap();
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        gpu.close();

        assert_eq!(
            dispatcher.get_int(&gpu, IntAttribute::PCI_BUS),
            Err(AttributeError::BadHandle)
        );
        assert_eq!(
            dispatcher.query_target_count(&gpu, TargetKind::Gpu),
            Err(AttributeError::BadHandle)
        );

        keep.close();
        assert_eq!(
            dispatcher.get_int(&gpu, IntAttribute::PCI_BUS),
            Err(AttributeError::CapabilityMissing)
        );
    }

    #[test]
    fn test_query_target_count() {
        let (_, dispatcher) = setup(vec![
            a100("GPU-0"),
            MockDevice::with_uuid("GPU-1").temperature(50),
        ]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();

        assert_eq!(dispatcher.query_target_count(&gpu, TargetKind::Gpu), Ok(2));
        assert_eq!(
            dispatcher.query_target_count(&gpu, TargetKind::ThermalSensor),
            Ok(2)
        );
        assert_eq!(dispatcher.query_target_count(&gpu, TargetKind::Cooler), Ok(1));
        assert_eq!(
            dispatcher.query_target_count(&gpu, TargetKind::XScreen),
            Err(AttributeError::BadArgument)
        );
    }

    #[test]
    fn test_unhandled_attribute_warns_once_per_call() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();

        let (result, warnings) = count_warnings(|| dispatcher.get_int(&gpu, IntAttribute(9999)));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 1);

        let (result, warnings) =
            count_warnings(|| dispatcher.set_int(&gpu, IntAttribute::PCI_BUS, 3));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_kinds_without_entries_warn_before_handle_checks() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        // Out of range, so any handle check would fail with BadHandle
        let sensor = dispatcher.open(Target::thermal_sensor(7), None).unwrap();

        let (result, warnings) = count_warnings(|| {
            dispatcher.set_int(&sensor, IntAttribute::THERMAL_SENSOR_READING, 1)
        });
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 1);

        let (result, warnings) =
            count_warnings(|| dispatcher.get_string(&sensor, StringAttribute::PRODUCT_NAME));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 1);

        let (result, warnings) =
            count_warnings(|| dispatcher.get_binary(&sensor, BinaryAttribute::GPU_FLAGS));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_every_registered_read_is_handled() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let table = AttributeTable::global();

        for kind in TargetKind::VENDOR_COMPATIBLE {
            let handle = dispatcher.open(Target::new(kind, 0), None).unwrap();
            let (results, warnings) = count_warnings(|| {
                let mut results: Vec<Result<()>> = table
                    .int_get
                    .ids_for(kind)
                    .map(|(attr, _)| dispatcher.get_int(&handle, attr).map(|_| ()))
                    .collect();
                results.extend(
                    table
                        .string_get
                        .ids_for(kind)
                        .map(|(attr, _)| dispatcher.get_string(&handle, attr).map(|_| ())),
                );
                results
            });
            assert_eq!(warnings, 0, "{kind} emitted unhandled warnings");
            for result in results {
                assert!(matches!(result, Ok(()) | Err(AttributeError::NotSupported)));
            }
        }
    }

    #[test]
    fn test_bound_reads_succeed_on_complete_device() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        let table = AttributeTable::global();

        for (attr, binding) in table.int_get.ids_for(TargetKind::Gpu) {
            let result = dispatcher.get_int(&gpu, attr);
            if binding.is_bound() {
                assert!(result.is_ok(), "{attr}: {result:?}");
            } else {
                assert_eq!(result, Err(AttributeError::NotSupported), "{attr}");
            }
        }
    }

    #[test]
    fn test_repeated_reads_are_equal() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        let first = dispatcher.get_int(&gpu, IntAttribute::USED_DEDICATED_GPU_MEMORY);
        let second = dispatcher.get_int(&gpu, IntAttribute::USED_DEDICATED_GPU_MEMORY);
        assert_eq!(first, second);
    }

    #[test]
    fn test_readings_are_not_cached() {
        let (library, dispatcher) = setup(vec![a100("GPU-0")]);
        let sensor = dispatcher.open(Target::thermal_sensor(0), None).unwrap();
        library.update_device(0, |d| d.temperature = Some(77));
        assert_eq!(
            dispatcher.get_int(&sensor, IntAttribute::THERMAL_SENSOR_READING),
            Ok(77)
        );
    }

    #[test]
    fn test_set_requests() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        let cooler = dispatcher.open(Target::cooler(0), None).unwrap();

        let (results, warnings) = count_warnings(|| {
            [
                dispatcher.set_int(&gpu, IntAttribute::GPU_POWER_MIZER_MODE, 1),
                dispatcher.set_int(&gpu, IntAttribute::DIGITAL_VIBRANCE, 10),
                dispatcher.set_int(&cooler, IntAttribute::THERMAL_COOLER_LEVEL, 80),
                dispatcher.set_string(&gpu, StringAttribute::GPU_CURRENT_CLOCK_FREQS, "1200,5000"),
            ]
        });
        assert_eq!(warnings, 0);
        assert!(results.iter().all(|r| *r == Err(AttributeError::NotSupported)));
    }

    #[test]
    fn test_valid_values() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        let sensor = dispatcher.open(Target::thermal_sensor(0), None).unwrap();

        assert_eq!(
            dispatcher.valid_values(&gpu, IntAttribute::PCI_ID),
            Err(AttributeError::NotSupported)
        );
        assert_eq!(
            dispatcher.valid_values(&gpu, IntAttribute::THERMAL_COOLER_LEVEL),
            Err(AttributeError::AttributeNotAvailable)
        );
        assert_eq!(
            dispatcher.valid_values(&sensor, IntAttribute::THERMAL_SENSOR_TARGET),
            Err(AttributeError::NotSupported)
        );
        assert_eq!(
            dispatcher.valid_string_values(&gpu, StringAttribute::GPU_UUID),
            Err(AttributeError::NotSupported)
        );
        assert_eq!(
            dispatcher.valid_string_values(&sensor, StringAttribute::GPU_UUID),
            Err(AttributeError::AttributeNotAvailable)
        );
    }

    #[test]
    fn test_valid_string_values_skip_device_lookup() {
        let (library, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();
        library.update_device(0, |d| d.lost = true);

        assert_eq!(
            dispatcher.valid_string_values(&gpu, StringAttribute::PRODUCT_NAME),
            Err(AttributeError::NotSupported)
        );
        gpu.close();
        assert_eq!(
            dispatcher.valid_string_values(&gpu, StringAttribute::PRODUCT_NAME),
            Err(AttributeError::CapabilityMissing)
        );
    }

    #[test]
    fn test_binary_requests() {
        let (_, dispatcher) = setup(vec![a100("GPU-0")]);
        let gpu = dispatcher.open(Target::gpu(0), None).unwrap();

        let (result, warnings) =
            count_warnings(|| dispatcher.get_binary(&gpu, BinaryAttribute::COOLERS_USED_BY_GPU));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 0);

        let (result, warnings) =
            count_warnings(|| dispatcher.get_binary(&gpu, BinaryAttribute::EDID));
        assert_eq!(result, Err(AttributeError::NotSupported));
        assert_eq!(warnings, 1);
    }
}
