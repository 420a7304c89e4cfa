use crate::CapabilityData;

/// Fold authority capability data into requested capability data.
///
/// When `overwrite` is set (the authority holds a capability lock) every
/// authority field replaces the requested one, so a delegate can never hold a
/// different value than its authority for a field the authority defines.
/// Otherwise authority fields only fill in the keys the request left out.
///
/// Requested keys the authority does not define are kept either way.
pub fn merge(into: &mut CapabilityData, from: &CapabilityData, overwrite: bool) {
    for (key, value) in from {
        if overwrite {
            into.insert(key.clone(), value.clone());
        } else {
            into.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}
