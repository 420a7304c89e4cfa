use keymint_capability::CapabilitySet;
use keymint_common::Timestamp;

use crate::KeyStatus;

/// What `reader` may see of `target` at `now`.
///
/// Only capabilities the reader itself holds are included, with the target's
/// data for them. An expired target shows no capabilities at all, though its
/// expiry and description are still reported.
pub fn project(reader: &CapabilitySet, target: &CapabilitySet, now: Timestamp) -> KeyStatus {
    let capability_set = target
        .grants(now)
        .filter(|capability| reader.holds(capability.name(), now))
        .map(|capability| (capability.name().to_string(), capability.data().clone()))
        .collect();

    KeyStatus {
        expiry: target.expiry(),
        description: target.description().map(str::to_string),
        capability_set,
    }
}
