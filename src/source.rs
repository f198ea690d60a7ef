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

//! Attribute sources and ordered fallback between them.
//!
//! A request is answered by the first source in a [`SourceChain`] that
//! claims it. Sources disclaim a request by returning
//! [`AttributeError::AttributeNotAvailable`] (not mine) or
//! [`AttributeError::CapabilityMissing`] (backend unavailable); every other
//! outcome, success or failure, is final.

use crate::attributes::{BinaryAttribute, IntAttribute, StringAttribute, ValidValues};
use crate::dispatch::AttributeDispatcher;
use crate::error::{AttributeError, Result};
use crate::handle::TargetHandle;
use crate::legacy::LegacyBackend;
use crate::lifecycle::{LibraryGuard, LibraryLifecycle};
use crate::target::{Target, TargetKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

pub trait AttributeSource: Send + Sync {
    fn name(&self) -> &str;

    fn target_count(&self, kind: TargetKind) -> Result<u32>;
    fn get_int(&self, target: Target, attr: IntAttribute) -> Result<i64>;
    fn set_int(&self, target: Target, attr: IntAttribute, value: i64) -> Result<()>;
    fn get_string(&self, target: Target, attr: StringAttribute) -> Result<String>;
    fn set_string(&self, target: Target, attr: StringAttribute, value: &str) -> Result<()>;
    fn get_binary(&self, target: Target, attr: BinaryAttribute) -> Result<Vec<u8>>;
    fn valid_values(&self, target: Target, attr: IntAttribute) -> Result<ValidValues>;
    fn valid_string_values(&self, target: Target, attr: StringAttribute) -> Result<ValidValues>;
}

/// The vendor library as an attribute source, decided once at startup.
pub enum VendorSource {
    VendorBacked(VendorBackend),
    Unavailable,
}

impl VendorSource {
    /// Try to bring the vendor library up. A library that fails to initialize
    /// yields [`VendorSource::Unavailable`], which disclaims every request.
    pub fn probe(
        lifecycle: Arc<LibraryLifecycle>,
        legacy: Option<Arc<dyn LegacyBackend>>,
    ) -> Self {
        match lifecycle.acquire() {
            Ok(guard) => {
                debug!("Vendor library available");
                VendorSource::VendorBacked(VendorBackend {
                    dispatcher: AttributeDispatcher::new(lifecycle),
                    legacy,
                    handles: Mutex::new(HashMap::new()),
                    _guard: guard,
                })
            }
            Err(_) => {
                info!("Vendor library unavailable, deferring all requests");
                VendorSource::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, VendorSource::VendorBacked(_))
    }

    fn backend(&self) -> Result<&VendorBackend> {
        match self {
            VendorSource::VendorBacked(backend) => Ok(backend),
            VendorSource::Unavailable => Err(AttributeError::CapabilityMissing),
        }
    }
}

/// Live vendor state: the dispatcher plus one open handle per target.
pub struct VendorBackend {
    dispatcher: AttributeDispatcher,
    legacy: Option<Arc<dyn LegacyBackend>>,
    handles: Mutex<HashMap<Target, Arc<TargetHandle>>>,
    _guard: LibraryGuard,
}

impl VendorBackend {
    pub fn dispatcher(&self) -> &AttributeDispatcher {
        &self.dispatcher
    }

    /// Handle for `target`, opened and enumerated on first use.
    ///
    /// Targets the vendor library does not serve are disclaimed. Only handles
    /// for ids inside the enumerated range are kept for reuse.
    pub fn handle(&self, target: Target) -> Result<Arc<TargetHandle>> {
        if !target.kind.is_vendor_compatible() {
            return Err(AttributeError::AttributeNotAvailable);
        }

        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = handles.get(&target) {
            return Ok(Arc::clone(handle));
        }
        let handle = Arc::new(self.dispatcher.open(target, self.legacy.as_deref())?);
        if addresses_enumerated_target(&handle) {
            handles.insert(target, Arc::clone(&handle));
        } else {
            debug!("Not caching handle for {target}, id is out of range");
        }
        Ok(handle)
    }

    pub fn open_handles(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn addresses_enumerated_target(handle: &TargetHandle) -> bool {
    let target = handle.target();
    let count = handle
        .attributes()
        .and_then(|attrs| attrs.count_of(target.kind));
    match (count, u32::try_from(target.id)) {
        (Some(count), Ok(id)) => id < count,
        _ => false,
    }
}

impl AttributeSource for VendorSource {
    fn name(&self) -> &str {
        "vendor"
    }

    fn target_count(&self, kind: TargetKind) -> Result<u32> {
        let backend = self.backend()?;
        if !kind.is_vendor_compatible() {
            return Err(AttributeError::AttributeNotAvailable);
        }
        let handle = backend.handle(Target::gpu(0))?;
        backend.dispatcher.query_target_count(&handle, kind)
    }

    fn get_int(&self, target: Target, attr: IntAttribute) -> Result<i64> {
        let backend = self.backend()?;
        backend.dispatcher.get_int(&*backend.handle(target)?, attr)
    }

    fn set_int(&self, target: Target, attr: IntAttribute, value: i64) -> Result<()> {
        let backend = self.backend()?;
        backend
            .dispatcher
            .set_int(&*backend.handle(target)?, attr, value)
    }

    fn get_string(&self, target: Target, attr: StringAttribute) -> Result<String> {
        let backend = self.backend()?;
        backend.dispatcher.get_string(&*backend.handle(target)?, attr)
    }

    fn set_string(&self, target: Target, attr: StringAttribute, value: &str) -> Result<()> {
        let backend = self.backend()?;
        backend
            .dispatcher
            .set_string(&*backend.handle(target)?, attr, value)
    }

    fn get_binary(&self, target: Target, attr: BinaryAttribute) -> Result<Vec<u8>> {
        let backend = self.backend()?;
        backend.dispatcher.get_binary(&*backend.handle(target)?, attr)
    }

    fn valid_values(&self, target: Target, attr: IntAttribute) -> Result<ValidValues> {
        let backend = self.backend()?;
        backend
            .dispatcher
            .valid_values(&*backend.handle(target)?, attr)
    }

    fn valid_string_values(&self, target: Target, attr: StringAttribute) -> Result<ValidValues> {
        let backend = self.backend()?;
        backend
            .dispatcher
            .valid_string_values(&*backend.handle(target)?, attr)
    }
}

/// Sources tried in order until one claims the request.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn AttributeSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: AttributeSource + 'static>(mut self, source: S) -> Self {
        self.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn AttributeSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// First non-deferring answer. When every source defers, the last
    /// deferral is returned; an empty chain reports
    /// [`AttributeError::AttributeNotAvailable`].
    fn first_answer<T, F>(&self, request: &str, f: F) -> Result<T>
    where
        F: Fn(&dyn AttributeSource) -> Result<T>,
    {
        let mut last = AttributeError::AttributeNotAvailable;
        for source in &self.sources {
            match f(source.as_ref()) {
                Err(e) if e.defers_to_next_source() => {
                    debug!("{} source deferred {request}: {e}", source.name());
                    last = e;
                }
                answer => return answer,
            }
        }
        Err(last)
    }
}

impl AttributeSource for SourceChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn target_count(&self, kind: TargetKind) -> Result<u32> {
        self.first_answer(&format!("{kind} count"), |s| s.target_count(kind))
    }

    fn get_int(&self, target: Target, attr: IntAttribute) -> Result<i64> {
        self.first_answer(&format!("{attr} of {target}"), |s| s.get_int(target, attr))
    }

    fn set_int(&self, target: Target, attr: IntAttribute, value: i64) -> Result<()> {
        self.first_answer(&format!("{attr} of {target}"), |s| {
            s.set_int(target, attr, value)
        })
    }

    fn get_string(&self, target: Target, attr: StringAttribute) -> Result<String> {
        self.first_answer(&format!("{attr} of {target}"), |s| s.get_string(target, attr))
    }

    fn set_string(&self, target: Target, attr: StringAttribute, value: &str) -> Result<()> {
        self.first_answer(&format!("{attr} of {target}"), |s| {
            s.set_string(target, attr, value)
        })
    }

    fn get_binary(&self, target: Target, attr: BinaryAttribute) -> Result<Vec<u8>> {
        self.first_answer(&format!("{attr} of {target}"), |s| s.get_binary(target, attr))
    }

    fn valid_values(&self, target: Target, attr: IntAttribute) -> Result<ValidValues> {
        self.first_answer(&format!("valid values of {attr} for {target}"), |s| {
            s.valid_values(target, attr)
        })
    }

    fn valid_string_values(&self, target: Target, attr: StringAttribute) -> Result<ValidValues> {
        self.first_answer(&format!("valid values of {attr} for {target}"), |s| {
            s.valid_string_values(target, attr)
        })
    }
}
