use keymint_capability::{CapabilitySet, ParserRegistry};
use keymint_common::{Redacted, Timestamp};

use crate::{AuthorityError, CreateRequest, bounded_expiry};

/// The field of the authority's create capability that locks delegation.
pub const CAPABILITY_LOCK: &str = "capabilityLock";

/// Build the capability set for a key minted under `authority`.
///
/// `authority` must already have passed the expiry and create capability
/// checks. The result is named `token`, carries the authority's chain plus the
/// authority itself, and expires no later than the authority.
///
/// Each requested capability is decided on its own:
///
/// - one the authority holds is decoded with the authority's own parser, then
///   the authority's data is merged in. A locked authority's fields override
///   the request; an unlocked authority's fields only fill gaps.
/// - one the authority lacks is decoded with the registry's default parser
///   when the authority is unlocked (and skipped if there is none), and
///   dropped when it is locked.
///
/// Any requested capability whose data is not object shaped fails the whole
/// request.
pub fn delegate(
    authority: &CapabilitySet,
    token: String,
    request: &CreateRequest,
    create_capability: &str,
    parsers: &ParserRegistry,
    now: Timestamp,
) -> Result<CapabilitySet, AuthorityError> {
    let expiry = bounded_expiry(now, request.lifetime, authority.expiry());

    let locked = authority
        .get(create_capability)
        .and_then(|capability| capability.boolean(CAPABILITY_LOCK))
        .unwrap_or(false);

    let mut delegated = CapabilitySet::new(
        token,
        authority.delegated_chain(),
        expiry,
        request.description.clone(),
    );

    for (name, data) in &request.capability_set {
        if !data.is_object() {
            return Err(AuthorityError::invalid(format!(
                "Invalid API key capability set entry '{name}' in request data body"
            )));
        }

        match authority.get(name) {
            Some(held) => {
                let mut capability = held.parser().parse(Some(name.as_str()), data).ok_or_else(|| {
                    AuthorityError::invalid(format!(
                        "Capability data for '{name}' was not accepted"
                    ))
                })?;
                capability.merge(held.data(), locked);
                delegated.insert(capability);
            }
            None if locked => {
                tracing::debug!(
                    authority = %Redacted(authority.token()),
                    capability = %name,
                    "Dropping capability the locked authority does not hold"
                );
            }
            None => match parsers
                .default_parser()
                .and_then(|parser| parser.parse(Some(name.as_str()), data))
            {
                Some(capability) => {
                    delegated.insert(capability);
                }
                None => tracing::debug!(
                    capability = %name,
                    "Skipping capability with no default parser"
                ),
            },
        }
    }

    Ok(delegated)
}
