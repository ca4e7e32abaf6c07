//! Parameter management types and utilities
//!
//! This module provides the descriptor table, the runtime registry and the
//! snapshot format used by persistence. Storage backends and GCS transports
//! live outside this crate and talk to the registry through its public API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  Feature groups (static)     │  PRECLAND_PARAMS, ...
//! └──────────────┬───────────────┘
//!                │ declare
//!                ▼
//! ┌──────────────────────────────┐
//! │  ParamTable                  │  ordered, key-indexed, validated
//! └──────────────┬───────────────┘
//!                │ ParameterRegistry::new
//!                ▼
//! ┌──────────────────────────────┐
//! │  ParameterRegistry           │  atomic value slots + provenance
//! └───────┬──────────────┬───────┘
//!         │ get/read     │ set/reset/enumerate/load_overrides
//!         ▼              ▼
//!   Control loop     GCS / persistence (snapshot)
//! ```

pub mod descriptor;
pub mod error;
pub mod precland;
pub mod registry;
pub mod snapshot;
pub mod table;

pub use descriptor::{EnumValue, ParamDescriptor, ParamType, ParamValue, Unit};
pub use error::{DescriptorFault, ParameterError};
pub use precland::{FallbackMode, PrecisionLandParams, PRECLAND_GROUP, PRECLAND_PARAMS};
pub use registry::{Entries, LoadReport, ParamEntry, ParamHandle, ParameterRegistry, Provenance};
pub use snapshot::{Snapshot, SnapshotError, SnapshotRecord, MAX_SNAPSHOT_SIZE};
pub use table::ParamTable;

/// Maximum parameter key length (MAVLink param_id)
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (must be a power of two for the key index)
pub const MAX_PARAMS: usize = 64;
