//! Precision Land Parameter Definitions
//!
//! Tuning parameters for the precision landing state machine: target loss
//! handling, search behaviour, and the fallback landing site used when the
//! target cannot be acquired.
//!
//! # Parameters
//!
//! - `PLD_BTOUT` - Landing target timeout (seconds)
//! - `PLD_HACC_RAD` - Horizontal acceptance radius (meters)
//! - `PLD_FAPPR_ALT` - Final approach altitude (meters)
//! - `PLD_SRCH_ALT` - Search altitude above home (meters)
//! - `PLD_SRCH_TOUT` - Search timeout (seconds)
//! - `PLD_MAX_SRCH` - Maximum number of search attempts
//! - `PLD_LAT` / `PLD_LON` - Safety landing area (deg*1e7)
//! - `PLD_RANGE` - Fence range around the safety landing area (meters)
//! - `PLD_OFFSET_X` / `PLD_OFFSET_Y` - Landing offset for offset mode (meters)
//! - `PLD_MODE` - Fallback mode (0=disabled, 1=offset, 2=safety area)
//!
//! The registry does not enforce the relation between `PLD_MODE` and the
//! offset or safety-area parameters; guidance code picks the ones that apply.

use super::descriptor::{EnumValue, ParamDescriptor, ParamValue, Unit};
use super::error::ParameterError;
use super::registry::ParameterRegistry;
use super::table::ParamTable;

/// Group label shared by every precision land parameter
pub const PRECLAND_GROUP: &str = "Precision Land";

pub const KEY_TARGET_TIMEOUT: &str = "PLD_BTOUT";
pub const KEY_ACCEPT_RADIUS: &str = "PLD_HACC_RAD";
pub const KEY_FINAL_APPROACH_ALT: &str = "PLD_FAPPR_ALT";
pub const KEY_SEARCH_ALT: &str = "PLD_SRCH_ALT";
pub const KEY_SEARCH_TIMEOUT: &str = "PLD_SRCH_TOUT";
pub const KEY_MAX_SEARCHES: &str = "PLD_MAX_SRCH";
pub const KEY_SAFETY_LAT: &str = "PLD_LAT";
pub const KEY_SAFETY_LON: &str = "PLD_LON";
pub const KEY_FENCE_RANGE: &str = "PLD_RANGE";
pub const KEY_OFFSET_X: &str = "PLD_OFFSET_X";
pub const KEY_OFFSET_Y: &str = "PLD_OFFSET_Y";
pub const KEY_MODE: &str = "PLD_MODE";

// --- Defaults ---

const DEFAULT_TARGET_TIMEOUT: f32 = 5.0;
const DEFAULT_ACCEPT_RADIUS: f32 = 0.2;
const DEFAULT_FINAL_APPROACH_ALT: f32 = 0.1;
const DEFAULT_SEARCH_ALT: f32 = 10.0;
const DEFAULT_SEARCH_TIMEOUT: f32 = 10.0;
const DEFAULT_MAX_SEARCHES: i32 = 3;
const DEFAULT_FENCE_RANGE: f32 = 100.0;

/// Lat/lon bound in deg*1e7 (+/-180 degrees)
const COORD_LIMIT: i32 = 1_800_000_000;

const MODE_VALUES: &[EnumValue] = &[
    EnumValue::new(0, "Disabled"),
    EnumValue::new(1, "Offset mode"),
    EnumValue::new(2, "Safety area"),
];

const DESCRIPTORS: [ParamDescriptor; 12] = [
    ParamDescriptor::float(KEY_TARGET_TIMEOUT, DEFAULT_TARGET_TIMEOUT, 0.0, 50.0)
        .unit(Unit::Seconds)
        .decimal(1)
        .increment(0.5)
        .group(PRECLAND_GROUP)
        .doc(
            "Landing Target Timeout",
            "Time after which the landing target is considered lost without any new measurements.",
        ),
    ParamDescriptor::float(KEY_ACCEPT_RADIUS, DEFAULT_ACCEPT_RADIUS, 0.0, 10.0)
        .unit(Unit::Meters)
        .decimal(2)
        .increment(0.1)
        .group(PRECLAND_GROUP)
        .doc(
            "Horizontal acceptance radius",
            "Start descending if closer above landing target than this.",
        ),
    ParamDescriptor::float(KEY_FINAL_APPROACH_ALT, DEFAULT_FINAL_APPROACH_ALT, 0.0, 10.0)
        .unit(Unit::Meters)
        .decimal(2)
        .increment(0.1)
        .group(PRECLAND_GROUP)
        .doc(
            "Final approach altitude",
            "Allow final approach (without horizontal positioning) if losing landing target closer than this to the ground.",
        ),
    ParamDescriptor::float(KEY_SEARCH_ALT, DEFAULT_SEARCH_ALT, 0.0, 100.0)
        .unit(Unit::Meters)
        .decimal(1)
        .increment(0.1)
        .group(PRECLAND_GROUP)
        .doc(
            "Search altitude",
            "Altitude above home to which to climb when searching for the landing target.",
        ),
    ParamDescriptor::float(KEY_SEARCH_TIMEOUT, DEFAULT_SEARCH_TIMEOUT, 0.0, 100.0)
        .unit(Unit::Seconds)
        .decimal(1)
        .increment(0.1)
        .group(PRECLAND_GROUP)
        .doc(
            "Search timeout",
            "Time allowed to search for the landing target before falling back to normal landing.",
        ),
    ParamDescriptor::int32(KEY_MAX_SEARCHES, DEFAULT_MAX_SEARCHES, 0, 100)
        .group(PRECLAND_GROUP)
        .doc(
            "Maximum number of search attempts",
            "Maximum number of times to search for the landing target if it is lost during the precision landing.",
        ),
    ParamDescriptor::int32(KEY_SAFETY_LAT, 0, -COORD_LIMIT, COORD_LIMIT)
        .unit(Unit::DegreesE7)
        .group(PRECLAND_GROUP)
        .doc("Safety landing latitude", "Latitude of the safety landing area."),
    ParamDescriptor::int32(KEY_SAFETY_LON, 0, -COORD_LIMIT, COORD_LIMIT)
        .unit(Unit::DegreesE7)
        .group(PRECLAND_GROUP)
        .doc("Safety landing longitude", "Longitude of the safety landing area."),
    ParamDescriptor::float(KEY_FENCE_RANGE, DEFAULT_FENCE_RANGE, 0.0, 100.0)
        .unit(Unit::Meters)
        .group(PRECLAND_GROUP)
        .doc(
            "Fence range",
            "Allowed operating radius around the safety landing area.",
        ),
    ParamDescriptor::float(KEY_OFFSET_X, 0.0, 0.0, 100.0)
        .unit(Unit::Meters)
        .group(PRECLAND_GROUP)
        .doc("X offset landing", "X offset applied to the landing point in offset mode."),
    ParamDescriptor::float(KEY_OFFSET_Y, 0.0, 0.0, 100.0)
        .unit(Unit::Meters)
        .group(PRECLAND_GROUP)
        .doc("Y offset landing", "Y offset applied to the landing point in offset mode."),
    ParamDescriptor::int32(KEY_MODE, FallbackMode::Disabled as i32, 0, 2)
        .group(PRECLAND_GROUP)
        .values(MODE_VALUES)
        .doc(
            "Safety landing mode",
            "Where to land when the precision landing target is unavailable.",
        ),
];

// Every entry must satisfy min <= default <= max
const _: () = {
    let mut i = 0;
    while i < DESCRIPTORS.len() {
        assert!(DESCRIPTORS[i].fault().is_none());
        i += 1;
    }
};

/// Declaration table, in documentation order
pub static PRECLAND_PARAMS: [ParamDescriptor; 12] = DESCRIPTORS;

/// Fallback behaviour when the landing target is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    /// No fallback, normal landing
    Disabled = 0,
    /// Land at a fixed offset (`PLD_OFFSET_X` / `PLD_OFFSET_Y`)
    Offset = 1,
    /// Land inside the safety area (`PLD_LAT` / `PLD_LON` / `PLD_RANGE`)
    SafetyArea = 2,
}

impl FallbackMode {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(FallbackMode::Disabled),
            1 => Some(FallbackMode::Offset),
            2 => Some(FallbackMode::SafetyArea),
            _ => None,
        }
    }
}

/// Precision land parameters loaded from the registry
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionLandParams {
    /// Time without measurement before the target is lost (s)
    pub target_timeout: f32,
    /// Horizontal distance below which descent begins (m)
    pub acceptance_radius: f32,
    /// Altitude below which a blind final approach is allowed (m)
    pub final_approach_alt: f32,
    /// Climb altitude above home while searching (m)
    pub search_alt: f32,
    /// Maximum time spent searching (s)
    pub search_timeout: f32,
    /// Search retries before giving up
    pub max_searches: u8,
    /// Safety landing latitude (deg*1e7)
    pub safety_lat_e7: i32,
    /// Safety landing longitude (deg*1e7)
    pub safety_lon_e7: i32,
    /// Operating radius around the safety landing area (m)
    pub fence_range: f32,
    /// Landing offset X (m)
    pub offset_x: f32,
    /// Landing offset Y (m)
    pub offset_y: f32,
    /// Fallback mode
    pub mode: FallbackMode,
}

impl Default for PrecisionLandParams {
    fn default() -> Self {
        Self {
            target_timeout: DEFAULT_TARGET_TIMEOUT,
            acceptance_radius: DEFAULT_ACCEPT_RADIUS,
            final_approach_alt: DEFAULT_FINAL_APPROACH_ALT,
            search_alt: DEFAULT_SEARCH_ALT,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            max_searches: DEFAULT_MAX_SEARCHES as u8,
            safety_lat_e7: 0,
            safety_lon_e7: 0,
            fence_range: DEFAULT_FENCE_RANGE,
            offset_x: 0.0,
            offset_y: 0.0,
            mode: FallbackMode::Disabled,
        }
    }
}

impl PrecisionLandParams {
    /// Declare precision land parameters
    ///
    /// # Arguments
    ///
    /// * `table` - Descriptor table to declare into
    ///
    /// # Returns
    ///
    /// Ok if all parameters were declared; the first declaration error otherwise
    pub fn declare(table: &mut ParamTable) -> Result<(), ParameterError> {
        table.declare_all(&PRECLAND_PARAMS)
    }

    /// Load precision land parameters from the registry
    ///
    /// Missing or mistyped entries fall back to defaults.
    pub fn from_registry(registry: &ParameterRegistry) -> Self {
        let defaults = Self::default();

        let float = |key: &str, default: f32| match registry.get(key) {
            Ok(ParamValue::Float(v)) => v,
            _ => default,
        };
        let int = |key: &str, default: i32| match registry.get(key) {
            Ok(ParamValue::Int32(v)) => v,
            _ => default,
        };

        let max_searches = int(KEY_MAX_SEARCHES, DEFAULT_MAX_SEARCHES).clamp(0, 100) as u8;
        let mode = FallbackMode::from_i32(int(KEY_MODE, 0)).unwrap_or(FallbackMode::Disabled);

        Self {
            target_timeout: float(KEY_TARGET_TIMEOUT, defaults.target_timeout),
            acceptance_radius: float(KEY_ACCEPT_RADIUS, defaults.acceptance_radius),
            final_approach_alt: float(KEY_FINAL_APPROACH_ALT, defaults.final_approach_alt),
            search_alt: float(KEY_SEARCH_ALT, defaults.search_alt),
            search_timeout: float(KEY_SEARCH_TIMEOUT, defaults.search_timeout),
            max_searches,
            safety_lat_e7: int(KEY_SAFETY_LAT, defaults.safety_lat_e7),
            safety_lon_e7: int(KEY_SAFETY_LON, defaults.safety_lon_e7),
            fence_range: float(KEY_FENCE_RANGE, defaults.fence_range),
            offset_x: float(KEY_OFFSET_X, defaults.offset_x),
            offset_y: float(KEY_OFFSET_Y, defaults.offset_y),
            mode,
        }
    }

    /// Safety landing area as (latitude, longitude) in degrees
    pub fn safety_area_deg(&self) -> (f64, f64) {
        (
            self.safety_lat_e7 as f64 * 1e-7,
            self.safety_lon_e7 as f64 * 1e-7,
        )
    }

    /// Landing offset (x, y) in meters
    pub fn landing_offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }
}
