//! Parameter error types
//!
//! Provides error types for parameter declaration and registry operations.

use super::descriptor::ParamType;

/// Reason a descriptor was rejected at declaration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFault {
    /// Key already declared in the table
    DuplicateKey,
    /// Key is empty or longer than 16 characters
    InvalidKey,
    /// Default or bounds do not match the declared type
    TypeMismatch,
    /// `min > max`, or a bound is NaN
    InvertedBounds,
    /// Default outside `[min, max]`
    DefaultOutOfBounds,
}

impl core::fmt::Display for DescriptorFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DescriptorFault::DuplicateKey => write!(f, "duplicate key"),
            DescriptorFault::InvalidKey => write!(f, "key must be 1-16 characters"),
            DescriptorFault::TypeMismatch => write!(f, "default/bounds type mismatch"),
            DescriptorFault::InvertedBounds => write!(f, "min is greater than max"),
            DescriptorFault::DefaultOutOfBounds => write!(f, "default outside [min, max]"),
        }
    }
}

/// Errors from parameter table and registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Key was never declared
    UnknownKey,
    /// Value type disagrees with the descriptor
    TypeMismatch {
        /// Declared type
        expected: ParamType,
        /// Type of the rejected value
        found: ParamType,
    },
    /// Value outside `[min, max]`; the stored value is unchanged
    OutOfRange {
        /// Parameter key
        key: &'static str,
    },
    /// Declaration violated the descriptor contract
    InvalidDescriptor {
        /// Parameter key
        key: &'static str,
        /// What was wrong
        fault: DescriptorFault,
    },
    /// Table capacity exhausted
    TableFull,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::UnknownKey => write!(f, "unknown parameter"),
            ParameterError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {:?}, got {:?}", expected, found)
            }
            ParameterError::OutOfRange { key } => write!(f, "{}: value out of range", key),
            ParameterError::InvalidDescriptor { key, fault } => {
                write!(f, "{}: invalid descriptor ({})", key, fault)
            }
            ParameterError::TableFull => write!(f, "parameter table full"),
        }
    }
}
