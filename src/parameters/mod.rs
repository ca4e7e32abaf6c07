//! Parameter registry bootstrap
//!
//! Builds the process-wide [`ParameterRegistry`] from every feature group
//! and restores persisted overrides on top of the declared defaults.
//!
//! # Boot sequence
//!
//! ```text
//! declare_all ──► ParamTable ──► ParameterRegistry ──► StaticCell
//!                                        ▲
//!                 persist::restore ──────┘  (snapshot image from storage)
//! ```
//!
//! Control code reads through the returned `&'static` registry (or a
//! [`PrecisionLandParams`](precland_core::parameters::PrecisionLandParams)
//! snapshot). GCS and persistence tasks share the same reference.

pub mod persist;

use precland_core::parameters::{ParamTable, ParameterError, ParameterRegistry, PrecisionLandParams};
use static_cell::StaticCell;

/// Process-wide registry storage
static REGISTRY: StaticCell<ParameterRegistry> = StaticCell::new();

/// Bootstrap failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// `init` was already called in this process
    AlreadyInitialized,
    /// A feature group declared an invalid descriptor
    Declaration(ParameterError),
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::AlreadyInitialized => write!(f, "parameter registry already initialized"),
            InitError::Declaration(err) => write!(f, "parameter declaration failed: {}", err),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InitError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", defmt::Display2Format(self))
    }
}

impl From<ParameterError> for InitError {
    fn from(err: ParameterError) -> Self {
        InitError::Declaration(err)
    }
}

/// Declare every feature group, in boot order
pub fn declare_all(table: &mut ParamTable) -> Result<(), ParameterError> {
    PrecisionLandParams::declare(table)?;
    Ok(())
}

/// Build a registry holding every declared parameter at its default
pub fn build_registry() -> Result<ParameterRegistry, ParameterError> {
    let mut table = ParamTable::new();
    declare_all(&mut table)?;
    Ok(ParameterRegistry::new(table))
}

/// Create the process-wide registry
///
/// Must be called once at boot before any task reads parameters.
///
/// # Errors
///
/// - `Declaration` if a feature group is malformed; the caller should halt
/// - `AlreadyInitialized` on the second and later calls
pub fn init() -> Result<&'static ParameterRegistry, InitError> {
    let registry = build_registry().map_err(|err| {
        crate::log_error!(
            "Parameter declaration failed: {}",
            crate::logging::display(&err)
        );
        InitError::Declaration(err)
    })?;
    let count = registry.count();

    let registry: &'static ParameterRegistry = REGISTRY
        .try_init(registry)
        .ok_or(InitError::AlreadyInitialized)?;

    crate::log_info!("Parameter registry ready: {} parameters", count);
    Ok(registry)
}
