use serde_json::Value as Json;
use tracing::trace;

use super::{
    claim::DcqlClaim,
    credential_query::DcqlCredentialQuery,
    path::{resolve_json, resolve_mdoc, PathError},
};
use crate::{
    core::credential::{cbor_to_json, ClaimValue, Credential, CredentialClaims},
    utils::NonEmptyVec,
};

pub(crate) type ClaimValues<'q> = Vec<(&'q DcqlClaim, ClaimValue)>;

/// Tries `alternatives` in order and returns the outcome of the first one
/// `attempt` accepts. Later alternatives are never attempted.
pub(crate) fn first_satisfied<A, T>(
    alternatives: impl IntoIterator<Item = A>,
    mut attempt: impl FnMut(A) -> Option<T>,
) -> Option<T> {
    alternatives
        .into_iter()
        .enumerate()
        .find_map(|(index, alternative)| {
            let outcome = attempt(alternative);
            if outcome.is_none() {
                trace!(index, "alternative not satisfied");
            }
            outcome
        })
}

/// Resolves the value a claim addresses in `credential`.
pub fn resolve_claim(credential: &Credential, claim: &DcqlClaim) -> Result<ClaimValue, PathError> {
    match credential.claims() {
        CredentialClaims::MsoMdoc(mdoc) => {
            resolve_mdoc(mdoc, claim.path()).map(|value| ClaimValue::Mdoc(value.clone()))
        }
        CredentialClaims::SdJwtVc(vc) => {
            resolve_json(vc.claims(), claim.path()).map(ClaimValue::Json)
        }
    }
}

/// Whether `value` is one of the `accepted` values. Without accepted values
/// any value is accepted.
///
/// Mdoc values are compared in their JSON form, so the CBOR unsigned integer
/// `1` is accepted by `[1]`.
pub fn filter_value(value: &ClaimValue, accepted: Option<&NonEmptyVec<Json>>) -> bool {
    let Some(accepted) = accepted else {
        return true;
    };
    match value {
        ClaimValue::Mdoc(value) => accepted.contains(&cbor_to_json(value)),
        ClaimValue::Json(value) => accepted.contains(value),
    }
}

fn match_claim<'q>(
    credential: &Credential,
    claim: &'q DcqlClaim,
) -> Option<(&'q DcqlClaim, ClaimValue)> {
    let value = match resolve_claim(credential, claim) {
        Ok(value) => value,
        Err(error) => {
            trace!(credential = credential.id(), path = %claim.path(), %error, "claim not found");
            return None;
        }
    };

    if !filter_value(&value, claim.values()) {
        trace!(credential = credential.id(), path = %claim.path(), "claim value not accepted");
        return None;
    }

    Some((claim, value))
}

fn match_all<'q>(
    credential: &Credential,
    claims: impl IntoIterator<Item = &'q DcqlClaim>,
) -> Option<ClaimValues<'q>> {
    claims
        .into_iter()
        .map(|claim| match_claim(credential, claim))
        .collect()
}

/// Matches one credential against the claims of a Credential Query.
///
/// Without claim sets every claim has to match. Otherwise the claim sets are
/// tried in order and the first one whose claims all match is used.
pub fn match_credential<'q>(
    query: &'q DcqlCredentialQuery,
    credential: &Credential,
) -> Option<ClaimValues<'q>> {
    if query.claim_sets().is_empty() {
        return match_all(credential, query.claims().iter());
    }

    first_satisfied(query.claim_sets(), |claim_set| {
        claim_set
            .claim_ids()
            .iter()
            .map(|id| {
                let Some(claim) = query.claim(id) else {
                    trace!(claim_id = id.as_str(), "claim set references an unknown claim");
                    return None;
                };
                match_claim(credential, claim)
            })
            .collect()
    })
}
