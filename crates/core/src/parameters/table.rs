//! Parameter descriptor table
//!
//! The table is the single ordered list of every parameter the process
//! knows about. Feature groups declare into it during initialization; the
//! finished table is handed to [`ParameterRegistry`](super::ParameterRegistry)
//! and never changes afterwards.

use heapless::index_map::FnvIndexMap;

use super::descriptor::ParamDescriptor;
use super::error::{DescriptorFault, ParameterError};
use super::MAX_PARAMS;

/// Ordered, key-indexed descriptor table
pub struct ParamTable {
    /// Descriptors in declaration order
    descriptors: heapless::Vec<&'static ParamDescriptor, MAX_PARAMS>,
    /// Key -> position in `descriptors`
    index: FnvIndexMap<&'static str, u16, MAX_PARAMS>,
}

impl ParamTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            descriptors: heapless::Vec::new(),
            index: FnvIndexMap::new(),
        }
    }

    /// Declare a parameter
    ///
    /// # Errors
    ///
    /// - `InvalidDescriptor` if the key is already declared or the
    ///   descriptor breaks `min <= default <= max`
    /// - `TableFull` if `MAX_PARAMS` descriptors are already declared
    pub fn declare(&mut self, descriptor: &'static ParamDescriptor) -> Result<(), ParameterError> {
        if let Some(fault) = descriptor.fault() {
            return Err(ParameterError::InvalidDescriptor {
                key: descriptor.key,
                fault,
            });
        }

        if self.index.contains_key(descriptor.key) {
            return Err(ParameterError::InvalidDescriptor {
                key: descriptor.key,
                fault: DescriptorFault::DuplicateKey,
            });
        }

        let position = self.descriptors.len() as u16;
        self.descriptors
            .push(descriptor)
            .map_err(|_| ParameterError::TableFull)?;
        if self.index.insert(descriptor.key, position).is_err() {
            self.descriptors.pop();
            return Err(ParameterError::TableFull);
        }

        Ok(())
    }

    /// Declare every descriptor of a group, stopping at the first error
    pub fn declare_all(
        &mut self,
        descriptors: &'static [ParamDescriptor],
    ) -> Result<(), ParameterError> {
        descriptors.iter().try_for_each(|d| self.declare(d))
    }

    /// Position of a key in declaration order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&i| i as usize)
    }

    /// Descriptor at a position
    pub fn get(&self, position: usize) -> Option<&'static ParamDescriptor> {
        self.descriptors.get(position).copied()
    }

    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &'static ParamDescriptor> + '_ {
        self.descriptors.iter().copied()
    }
}

impl Default for ParamTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ALPHA: ParamDescriptor = ParamDescriptor::float("ALPHA", 1.0, 0.0, 10.0);
    static BETA: ParamDescriptor = ParamDescriptor::int32("BETA", 5, 0, 100);
    static ALPHA_AGAIN: ParamDescriptor = ParamDescriptor::int32("ALPHA", 0, 0, 1);
    static BROKEN: ParamDescriptor = ParamDescriptor::float("BROKEN", 20.0, 0.0, 10.0);

    #[test]
    fn test_declare_preserves_order() {
        let mut table = ParamTable::new();
        table.declare(&BETA).unwrap();
        table.declare(&ALPHA).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.position("BETA"), Some(0));
        assert_eq!(table.position("ALPHA"), Some(1));
        assert_eq!(table.get(1).map(|d| d.key), Some("ALPHA"));
        assert!(table.position("alpha").is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table = ParamTable::new();
        table.declare(&ALPHA).unwrap();

        assert_eq!(
            table.declare(&ALPHA_AGAIN),
            Err(ParameterError::InvalidDescriptor {
                key: "ALPHA",
                fault: DescriptorFault::DuplicateKey,
            })
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_default_out_of_bounds_rejected() {
        let mut table = ParamTable::new();
        assert_eq!(
            table.declare(&BROKEN),
            Err(ParameterError::InvalidDescriptor {
                key: "BROKEN",
                fault: DescriptorFault::DefaultOutOfBounds,
            })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_declare_all_stops_at_first_error() {
        static GROUP: [ParamDescriptor; 3] = [
            ParamDescriptor::float("G_ONE", 1.0, 0.0, 2.0),
            ParamDescriptor::float("G_TWO", 3.0, 0.0, 2.0),
            ParamDescriptor::float("G_THREE", 1.0, 0.0, 2.0),
        ];

        let mut table = ParamTable::new();
        assert!(table.declare_all(&GROUP).is_err());
        assert_eq!(table.len(), 1);
        assert!(table.position("G_THREE").is_none());
    }

    #[test]
    fn test_table_full() {
        static MANY: [ParamDescriptor; MAX_PARAMS + 1] = {
            const KEYS: [&str; MAX_PARAMS + 1] = [
                "P00", "P01", "P02", "P03", "P04", "P05", "P06", "P07", "P08", "P09", "P10",
                "P11", "P12", "P13", "P14", "P15", "P16", "P17", "P18", "P19", "P20", "P21",
                "P22", "P23", "P24", "P25", "P26", "P27", "P28", "P29", "P30", "P31", "P32",
                "P33", "P34", "P35", "P36", "P37", "P38", "P39", "P40", "P41", "P42", "P43",
                "P44", "P45", "P46", "P47", "P48", "P49", "P50", "P51", "P52", "P53", "P54",
                "P55", "P56", "P57", "P58", "P59", "P60", "P61", "P62", "P63", "P64",
            ];
            let mut out = [ParamDescriptor::int32("", 0, 0, 0); MAX_PARAMS + 1];
            let mut i = 0;
            while i < KEYS.len() {
                out[i] = ParamDescriptor::int32(KEYS[i], 0, 0, 1);
                i += 1;
            }
            out
        };

        let mut table = ParamTable::new();
        for descriptor in MANY.iter().take(MAX_PARAMS) {
            table.declare(descriptor).unwrap();
        }
        assert_eq!(table.declare(&MANY[MAX_PARAMS]), Err(ParameterError::TableFull));
        assert_eq!(table.len(), MAX_PARAMS);
    }
}
