//! Parameter registry
//!
//! Owns the current value of every declared parameter. Values are stored as
//! one atomic 32-bit word per parameter, so control-loop readers never take
//! a lock and never observe a partially written value. Writers validate
//! against the descriptor before the single store.
//!
//! # Concurrency
//!
//! - `get`/`read`: one `Acquire` load, no allocation, no blocking
//! - `set`/`reset`: validation, then value word and provenance flag are
//!   written together inside a critical section, so concurrent writers on
//!   one key never interleave
//! - `provenance`/`entry_at`/`enumerate`: value and provenance are read
//!   inside the same critical section and always belong to one write
//! - No cross-parameter consistency: a reader may see a new value for one
//!   key and an old value for another

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::descriptor::{ParamDescriptor, ParamType, ParamValue};
use super::error::ParameterError;
use super::table::ParamTable;
use super::MAX_PARAMS;

/// Whether a parameter still holds its declared default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Never set, or reset since
    Default,
    /// Explicitly set (possibly to the default value)
    Overridden,
}

/// Pre-resolved parameter position for per-cycle reads
///
/// Only valid for the registry that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamHandle(u16);

impl ParamHandle {
    /// Position in declaration order
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One parameter as seen by enumeration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEntry {
    /// Position in declaration order
    pub index: usize,
    /// Static definition
    pub descriptor: &'static ParamDescriptor,
    /// Current value
    pub value: ParamValue,
    /// Default or overridden
    pub provenance: Provenance,
}

/// Outcome of a bulk override load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries accepted by `set`
    pub applied: u16,
    /// Entries rejected (unknown key, wrong type, out of range)
    pub skipped: u16,
}

/// Storage cell for one parameter
struct ParamSlot {
    param_type: ParamType,
    bits: AtomicU32,
    overridden: AtomicBool,
}

impl ParamSlot {
    fn new(descriptor: &ParamDescriptor) -> Self {
        Self {
            param_type: descriptor.param_type,
            bits: AtomicU32::new(descriptor.default.to_bits()),
            overridden: AtomicBool::new(false),
        }
    }

    fn load(&self) -> ParamValue {
        ParamValue::from_bits(self.bits.load(Ordering::Acquire), self.param_type)
    }

    fn provenance(&self) -> Provenance {
        if self.overridden.load(Ordering::Acquire) {
            Provenance::Overridden
        } else {
            Provenance::Default
        }
    }

    /// Caller must hold the registry's write critical section
    fn store(&self, value: ParamValue, overridden: bool) {
        self.bits.store(value.to_bits(), Ordering::Release);
        self.overridden.store(overridden, Ordering::Release);
    }
}

/// Runtime parameter registry
///
/// Built once from a finished [`ParamTable`]; the set of parameters is fixed
/// for the registry's lifetime. All operations take `&self`, so a single
/// instance can be shared between the control loop and tooling.
pub struct ParameterRegistry {
    table: ParamTable,
    slots: heapless::Vec<ParamSlot, MAX_PARAMS>,
    /// Set on every change, cleared by the persistence layer after a save
    dirty: AtomicBool,
}

impl ParameterRegistry {
    /// Create a registry with every parameter at its default
    pub fn new(table: ParamTable) -> Self {
        let mut slots = heapless::Vec::new();
        for descriptor in table.iter() {
            // Same capacity as the table, cannot overflow
            let _ = slots.push(ParamSlot::new(descriptor));
        }

        Self {
            table,
            slots,
            dirty: AtomicBool::new(false),
        }
    }

    /// Get parameter count
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    fn lookup(&self, key: &str) -> Result<(usize, &'static ParamDescriptor), ParameterError> {
        let position = self.table.position(key).ok_or(ParameterError::UnknownKey)?;
        let descriptor = self.table.get(position).ok_or(ParameterError::UnknownKey)?;
        Ok((position, descriptor))
    }

    /// Get descriptor by key
    pub fn descriptor(&self, key: &str) -> Result<&'static ParamDescriptor, ParameterError> {
        self.lookup(key).map(|(_, d)| d)
    }

    /// Get current value by key
    pub fn get(&self, key: &str) -> Result<ParamValue, ParameterError> {
        let (position, _) = self.lookup(key)?;
        Ok(self.slots[position].load())
    }

    /// Get current value of a Float parameter
    pub fn get_f32(&self, key: &str) -> Result<f32, ParameterError> {
        match self.get(key)? {
            ParamValue::Float(v) => Ok(v),
            other => Err(ParameterError::TypeMismatch {
                expected: ParamType::Float,
                found: other.param_type(),
            }),
        }
    }

    /// Get current value of an Int32 parameter
    pub fn get_i32(&self, key: &str) -> Result<i32, ParameterError> {
        match self.get(key)? {
            ParamValue::Int32(v) => Ok(v),
            other => Err(ParameterError::TypeMismatch {
                expected: ParamType::Int32,
                found: other.param_type(),
            }),
        }
    }

    /// Resolve a key once for repeated reads
    pub fn handle(&self, key: &str) -> Result<ParamHandle, ParameterError> {
        self.lookup(key).map(|(position, _)| ParamHandle(position as u16))
    }

    /// Read through a pre-resolved handle
    ///
    /// # Panics
    ///
    /// If the handle came from a registry with fewer parameters.
    pub fn read(&self, handle: ParamHandle) -> ParamValue {
        self.slots[handle.index()].load()
    }

    /// Provenance of a parameter
    pub fn provenance(&self, key: &str) -> Result<Provenance, ParameterError> {
        let (position, _) = self.lookup(key)?;
        Ok(critical_section::with(|_| self.slots[position].provenance()))
    }

    /// Set parameter by key
    ///
    /// On error the stored value is left untouched.
    pub fn set(&self, key: &str, value: ParamValue) -> Result<(), ParameterError> {
        let (position, descriptor) = self.lookup(key)?;
        descriptor.check(value)?;

        critical_section::with(|_| {
            self.slots[position].store(value, true);
            self.dirty.store(true, Ordering::Release);
        });
        Ok(())
    }

    /// Restore the default value and `Default` provenance
    ///
    /// Idempotent. The default is always stored; the registry is only marked
    /// dirty if the parameter was overridden.
    pub fn reset(&self, key: &str) -> Result<(), ParameterError> {
        let (position, descriptor) = self.lookup(key)?;
        self.reset_slot(position, descriptor);
        Ok(())
    }

    /// Reset every parameter to its default
    pub fn reset_all(&self) {
        for (position, descriptor) in self.table.iter().enumerate() {
            self.reset_slot(position, descriptor);
        }
    }

    fn reset_slot(&self, position: usize, descriptor: &'static ParamDescriptor) {
        let slot = &self.slots[position];
        critical_section::with(|_| {
            if slot.provenance() == Provenance::Overridden {
                self.dirty.store(true, Ordering::Release);
            }
            slot.store(descriptor.default, false);
        });
    }

    /// Entry at a position in declaration order
    pub fn entry_at(&self, index: usize) -> Option<ParamEntry> {
        let descriptor = self.table.get(index)?;
        let slot = self.slots.get(index)?;
        let (value, provenance) = critical_section::with(|_| (slot.load(), slot.provenance()));
        Some(ParamEntry {
            index,
            descriptor,
            value,
            provenance,
        })
    }

    /// Enumerate parameters in declaration order
    ///
    /// With `Some(group)` only parameters of that group are yielded. The
    /// iterator reads values lazily and can be cloned to restart.
    pub fn enumerate<'a>(&'a self, group: Option<&'a str>) -> Entries<'a> {
        Entries {
            registry: self,
            group,
            next: 0,
            overridden_only: false,
        }
    }

    /// Enumerate only parameters with `Overridden` provenance
    ///
    /// This is the set a persistence layer needs to save.
    pub fn overrides(&self) -> Entries<'_> {
        Entries {
            registry: self,
            group: None,
            next: 0,
            overridden_only: true,
        }
    }

    /// Apply persisted values; bad entries are skipped, never fatal
    pub fn load_overrides<'k, I>(&self, source: I) -> LoadReport
    where
        I: IntoIterator<Item = (&'k str, ParamValue)>,
    {
        self.load_overrides_with(source, |_, _| {})
    }

    /// Apply persisted values, reporting each skipped entry
    pub fn load_overrides_with<'k, I, F>(&self, source: I, mut on_skip: F) -> LoadReport
    where
        I: IntoIterator<Item = (&'k str, ParamValue)>,
        F: FnMut(&'k str, ParameterError),
    {
        let mut report = LoadReport::default();
        for (key, value) in source {
            match self.set(key, value) {
                Ok(()) => report.applied = report.applied.saturating_add(1),
                Err(err) => {
                    report.skipped = report.skipped.saturating_add(1);
                    on_skip(key, err);
                }
            }
        }
        report
    }

    /// Check if anything changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the dirty flag (called after a successful save)
    pub fn mark_saved(&self) {
        self.dirty.store(false, Ordering::Release);
    }
}

/// Lazy iterator over registry entries
#[derive(Clone)]
pub struct Entries<'a> {
    registry: &'a ParameterRegistry,
    group: Option<&'a str>,
    next: usize,
    overridden_only: bool,
}

impl Iterator for Entries<'_> {
    type Item = ParamEntry;

    fn next(&mut self) -> Option<ParamEntry> {
        while let Some(entry) = self.registry.entry_at(self.next) {
            self.next += 1;

            if let Some(group) = self.group {
                if entry.descriptor.group != group {
                    continue;
                }
            }
            if self.overridden_only && entry.provenance != Provenance::Overridden {
                continue;
            }

            return Some(entry);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.registry.count().saturating_sub(self.next)))
    }
}
