//! Final boolean pass: merge accumulated joint solids into the plates.
//!
//! Contour bookkeeping was already updated when the joints were
//! generated, so a failed boolean here leaves the model consistent; the
//! failure is logged and the remaining joints still run. Keys (loose
//! pieces such as dowels) are separate parts and are left on their
//! plates untouched.

use plate_kernel::PlateKernel;
use plate_model::PlateModel;
use tracing::warn;

use crate::types::JoineryError;

/// Union every queued positive into its plate and subtract every queued
/// negative, draining both lists. Returns the number of boolean
/// failures that were recovered by logging and skipping.
pub fn perform_boolean_operations(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
) -> Result<usize, JoineryError> {
    let mut recovered = 0;
    for id in 0..model.plate_count() {
        let target = model.plates[id].solid;

        for (k, tool) in std::mem::take(&mut model.plates[id].joints_positives)
            .into_iter()
            .enumerate()
        {
            match kernel.boolean_union(target, tool) {
                Ok(()) => {}
                Err(first) => match kernel.join_union(target, tool) {
                    Ok(()) => {
                        warn!(plate = id, joint = k, %first, "strict union failed, shells joined");
                        model.warn(format!(
                            "plate {id}: positive joint {k} joined without face merge ({first})"
                        ));
                    }
                    Err(second) => {
                        warn!(plate = id, joint = k, %second, "union skipped");
                        model.warn(format!(
                            "plate {id}: positive joint {k} skipped ({second})"
                        ));
                        recovered += 1;
                    }
                },
            }
        }

        for (k, tool) in std::mem::take(&mut model.plates[id].joints_negatives)
            .into_iter()
            .enumerate()
        {
            if let Err(err) = kernel.boolean_difference(target, tool) {
                warn!(plate = id, joint = k, %err, "difference skipped");
                model.warn(format!("plate {id}: negative joint {k} skipped ({err})"));
                recovered += 1;
            }
        }
    }
    Ok(recovered)
}
