//! Parameter descriptor types
//!
//! A [`ParamDescriptor`] is the static definition of one parameter: its key,
//! type, default, bounds and the documentation metadata a GCS or log viewer
//! needs to present it. Descriptors are `'static` and never change after
//! declaration; the current value lives in the registry.

use super::error::{DescriptorFault, ParameterError};
use super::PARAM_NAME_LEN;

/// Parameter type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// 32-bit floating point parameter
    Float,
    /// 32-bit signed integer parameter (also used for modes and flags)
    Int32,
}

/// Parameter value (union of supported types)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Float value
    Float(f32),
    /// Signed integer value
    Int32(i32),
}

impl ParamValue {
    /// Convert parameter value to its 32-bit storage word
    pub const fn to_bits(self) -> u32 {
        match self {
            ParamValue::Float(f) => f.to_bits(),
            ParamValue::Int32(i) => i as u32,
        }
    }

    /// Create parameter value from a storage word and type
    pub const fn from_bits(bits: u32, param_type: ParamType) -> Self {
        match param_type {
            ParamType::Float => ParamValue::Float(f32::from_bits(bits)),
            ParamType::Int32 => ParamValue::Int32(bits as i32),
        }
    }

    /// Get parameter type
    pub const fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Int32(_) => ParamType::Int32,
        }
    }

    /// Float payload, if this is a float value
    pub const fn as_f32(self) -> Option<f32> {
        match self {
            ParamValue::Float(v) => Some(v),
            ParamValue::Int32(_) => None,
        }
    }

    /// Integer payload, if this is an integer value
    pub const fn as_i32(self) -> Option<i32> {
        match self {
            ParamValue::Int32(v) => Some(v),
            ParamValue::Float(_) => None,
        }
    }
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Int32(v) => write!(f, "{}", v),
        }
    }
}

/// Display unit of a parameter
///
/// Units are metadata for tooling only and never take part in validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Dimensionless (counts, modes)
    None,
    /// Seconds
    Seconds,
    /// Meters
    Meters,
    /// Degrees scaled by 1e7 (fixed-point lat/lon)
    DegreesE7,
}

impl Unit {
    /// Unit string as shown in GCS parameter metadata
    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Seconds => "s",
            Unit::Meters => "m",
            Unit::DegreesE7 => "deg*1e7",
        }
    }
}

/// Label for one value of a mode-like integer parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// Raw parameter value
    pub value: i32,
    /// Human-readable meaning
    pub label: &'static str,
}

impl EnumValue {
    pub const fn new(value: i32, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Static parameter definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Parameter key (max 16 characters, MAVLink standard)
    pub key: &'static str,
    /// Parameter type
    pub param_type: ParamType,
    /// Default value
    pub default: ParamValue,
    /// Minimum allowed value (inclusive)
    pub min: ParamValue,
    /// Maximum allowed value (inclusive)
    pub max: ParamValue,
    /// Display unit
    pub unit: Unit,
    /// Number of decimal places to display
    pub decimal: Option<u8>,
    /// Suggested UI step
    pub increment: Option<f32>,
    /// Logical group label
    pub group: &'static str,
    /// Short human-readable name
    pub title: &'static str,
    /// Free-text description
    pub description: &'static str,
    /// Labels for mode-like integers (documentation only)
    pub values: &'static [EnumValue],
}

impl ParamDescriptor {
    /// Create a Float descriptor
    pub const fn float(key: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self::with_values(
            key,
            ParamType::Float,
            ParamValue::Float(default),
            ParamValue::Float(min),
            ParamValue::Float(max),
        )
    }

    /// Create an Int32 descriptor
    pub const fn int32(key: &'static str, default: i32, min: i32, max: i32) -> Self {
        Self::with_values(
            key,
            ParamType::Int32,
            ParamValue::Int32(default),
            ParamValue::Int32(min),
            ParamValue::Int32(max),
        )
    }

    const fn with_values(
        key: &'static str,
        param_type: ParamType,
        default: ParamValue,
        min: ParamValue,
        max: ParamValue,
    ) -> Self {
        Self {
            key,
            param_type,
            default,
            min,
            max,
            unit: Unit::None,
            decimal: None,
            increment: None,
            group: "",
            title: "",
            description: "",
            values: &[],
        }
    }

    pub const fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub const fn decimal(mut self, decimal: u8) -> Self {
        self.decimal = Some(decimal);
        self
    }

    pub const fn increment(mut self, increment: f32) -> Self {
        self.increment = Some(increment);
        self
    }

    pub const fn group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Set title and description
    pub const fn doc(mut self, title: &'static str, description: &'static str) -> Self {
        self.title = title;
        self.description = description;
        self
    }

    pub const fn values(mut self, values: &'static [EnumValue]) -> Self {
        self.values = values;
        self
    }

    /// Check the descriptor's own contract
    ///
    /// Const so that static tables can be verified at compile time.
    pub const fn fault(&self) -> Option<DescriptorFault> {
        if self.key.is_empty() || self.key.len() > PARAM_NAME_LEN {
            return Some(DescriptorFault::InvalidKey);
        }

        match (self.param_type, self.default, self.min, self.max) {
            (
                ParamType::Float,
                ParamValue::Float(default),
                ParamValue::Float(min),
                ParamValue::Float(max),
            ) => {
                if min.is_nan() || max.is_nan() || min > max {
                    Some(DescriptorFault::InvertedBounds)
                } else if default.is_nan() || default < min || default > max {
                    Some(DescriptorFault::DefaultOutOfBounds)
                } else {
                    None
                }
            }
            (
                ParamType::Int32,
                ParamValue::Int32(default),
                ParamValue::Int32(min),
                ParamValue::Int32(max),
            ) => {
                if min > max {
                    Some(DescriptorFault::InvertedBounds)
                } else if default < min || default > max {
                    Some(DescriptorFault::DefaultOutOfBounds)
                } else {
                    None
                }
            }
            _ => Some(DescriptorFault::TypeMismatch),
        }
    }

    /// Validate a candidate value against type and bounds
    pub fn check(&self, value: ParamValue) -> Result<(), ParameterError> {
        if value.param_type() != self.param_type {
            return Err(ParameterError::TypeMismatch {
                expected: self.param_type,
                found: value.param_type(),
            });
        }

        let in_range = match (value, self.min, self.max) {
            (ParamValue::Float(v), ParamValue::Float(min), ParamValue::Float(max)) => {
                v >= min && v <= max
            }
            (ParamValue::Int32(v), ParamValue::Int32(min), ParamValue::Int32(max)) => {
                v >= min && v <= max
            }
            _ => false,
        };

        if in_range {
            Ok(())
        } else {
            Err(ParameterError::OutOfRange { key: self.key })
        }
    }

    /// Label for an enumerated value, if one is documented
    pub fn label_for(&self, value: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.label)
    }
}
