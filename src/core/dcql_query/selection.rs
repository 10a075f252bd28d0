use tracing::debug;

use super::{
    credential_set::DcqlCredentialSetQuery, matcher::first_satisfied, response::CredentialResponse,
    DcqlError,
};

/// Combines the per-query `responses`, given in Credential Query order, into
/// the final result.
///
/// Without Credential Set Queries every Credential Query must be matched. With
/// them, each set contributes the responses of its first satisfied option, in
/// the order the sets were declared, and responses of Credential Queries no
/// set references are dropped.
pub(crate) fn select<'q>(
    responses: Vec<CredentialResponse<'q>>,
    credential_sets: &'q [DcqlCredentialSetQuery],
) -> Result<Vec<CredentialResponse<'q>>, DcqlError> {
    if credential_sets.is_empty() {
        if let Some(unmatched) = responses.iter().find(|response| response.matches().is_empty()) {
            return Err(DcqlError::NoMatchForQuery(
                unmatched.credential_query().id().to_owned(),
            ));
        }
        return Ok(responses);
    }

    let mut selected = vec![];
    for credential_set in credential_sets {
        let chosen = first_satisfied(credential_set.options(), |option| {
            option.is_satisfied(&responses).then_some(option)
        });

        let Some(option) = chosen else {
            if credential_set.is_required() {
                return Err(DcqlError::UnsatisfiedRequiredSet {
                    purpose: credential_set.purpose().clone(),
                });
            }
            debug!(
                purpose = %credential_set.purpose(),
                "optional credential set not satisfied"
            );
            continue;
        };

        for id in option.credential_ids() {
            selected.extend(
                responses
                    .iter()
                    .filter(|response| response.credential_query().id() == id)
                    .map(|response| response.selected_by(credential_set)),
            );
        }
    }

    Ok(selected)
}
