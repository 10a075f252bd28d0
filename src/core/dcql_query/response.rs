use super::{claim::DcqlClaim, credential_query::DcqlCredentialQuery, DcqlCredentialSetQuery};
use crate::core::credential::{ClaimValue, Credential};

/// A credential that satisfies a Credential Query, together with the value of
/// every claim that has to be disclosed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialResponseMatch<'q> {
    credential: Credential,
    claim_values: Vec<(&'q DcqlClaim, ClaimValue)>,
}

impl<'q> CredentialResponseMatch<'q> {
    pub(crate) fn new(
        credential: Credential,
        claim_values: Vec<(&'q DcqlClaim, ClaimValue)>,
    ) -> Self {
        Self {
            credential,
            claim_values,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The requested claims and their values, in the order they were requested.
    pub fn claim_values(&self) -> &[(&'q DcqlClaim, ClaimValue)] {
        &self.claim_values
    }
}

/// The outcome of one Credential Query.
///
/// The holder may own several credentials satisfying the same query, so
/// [`matches`](Self::matches) lists every candidate and the wallet returns
/// one of them, e.g. after asking the user.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialResponse<'q> {
    credential_query: &'q DcqlCredentialQuery,
    credential_set_query: Option<&'q DcqlCredentialSetQuery>,
    matches: Vec<CredentialResponseMatch<'q>>,
}

impl<'q> CredentialResponse<'q> {
    pub(crate) fn new(
        credential_query: &'q DcqlCredentialQuery,
        matches: Vec<CredentialResponseMatch<'q>>,
    ) -> Self {
        Self {
            credential_query,
            credential_set_query: None,
            matches,
        }
    }

    /// A copy of this response attributed to `credential_set_query`.
    pub(crate) fn selected_by(&self, credential_set_query: &'q DcqlCredentialSetQuery) -> Self {
        Self {
            credential_query: self.credential_query,
            credential_set_query: Some(credential_set_query),
            matches: self.matches.clone(),
        }
    }

    pub fn credential_query(&self) -> &'q DcqlCredentialQuery {
        self.credential_query
    }

    /// The Credential Set Query this response was selected under, if the
    /// query declared any.
    pub fn credential_set_query(&self) -> Option<&'q DcqlCredentialSetQuery> {
        self.credential_set_query
    }

    pub fn matches(&self) -> &[CredentialResponseMatch<'q>] {
        &self.matches
    }
}
