//! Snapshot persistence
//!
//! Moves overridden values between the registry and a snapshot image. The
//! storage medium (Flash sector, file, ...) is the caller's concern; this
//! module only sees byte buffers.
//!
//! A damaged or missing image is never fatal: the registry keeps its
//! defaults and the vehicle still boots.

use precland_core::parameters::snapshot::{self, SnapshotError};
use precland_core::parameters::{LoadReport, ParameterRegistry};

use crate::logging::display;

/// Restore persisted overrides from a snapshot image
///
/// Decode failures are logged and leave every parameter at its current
/// value. Individual records that no longer fit the schema (removed key,
/// changed type, tightened bounds) or that could not be decoded are skipped
/// and counted. The registry is
/// marked saved afterwards, since its content now matches storage.
pub fn restore(registry: &ParameterRegistry, image: &[u8]) -> LoadReport {
    let snapshot = match snapshot::decode(image) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            crate::log_warn!(
                "Parameter snapshot rejected ({}), using defaults",
                display(&err)
            );
            return LoadReport::default();
        }
    };

    if snapshot.damaged > 0 {
        crate::log_warn!("Dropping {} unreadable snapshot records", snapshot.damaged);
    }

    let mut report = registry.load_overrides_with(snapshot.entries(), |key, err| {
        crate::log_warn!("Skipping persisted {}: {}", key, display(&err));
    });
    report.skipped = report.skipped.saturating_add(snapshot.damaged);
    registry.mark_saved();

    crate::log_info!(
        "Restored {} parameters (seq {}), skipped {}",
        report.applied,
        snapshot.sequence,
        report.skipped
    );
    report
}

/// Save overridden values into `buf`
///
/// Parameters still at their default are not written, so a later change of
/// a default takes effect on the next boot. Clears the dirty flag on
/// success and returns the number of bytes written.
pub fn save(
    registry: &ParameterRegistry,
    sequence: u16,
    buf: &mut [u8],
) -> Result<usize, SnapshotError> {
    let records = registry
        .overrides()
        .map(|entry| (entry.descriptor.key, entry.value));

    match snapshot::encode(records, sequence, buf) {
        Ok(len) => {
            registry.mark_saved();
            crate::log_debug!("Saved parameter snapshot seq {} ({} bytes)", sequence, len);
            Ok(len)
        }
        Err(err) => {
            crate::log_error!("Parameter snapshot encode failed: {}", display(&err));
            Err(err)
        }
    }
}
