#![cfg_attr(not(test), no_std)]

//! precland - Precision landing parameter registry
//!
//! This library wires the pure `precland_core` types into a process-wide
//! registry: every feature group is declared at boot, the registry lives in
//! a `StaticCell`, and persisted overrides are restored from a snapshot
//! image.

// Logging macros (log_info!, log_warn!, ...)
pub mod logging;

// Registry bootstrap and persistence
pub mod parameters;

pub use precland_core::parameters as core_params;
pub use precland_core::parameters::{
    FallbackMode, ParamValue, ParameterError, ParameterRegistry, PrecisionLandParams, Provenance,
};
