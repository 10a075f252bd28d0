use serde::Serialize;
use serde_json::Value as Json;

use super::{response::CredentialResponse, DcqlCredentialQueryId};
use crate::utils::NonEmptyVec;

/// A Credential Set Query object
/// See: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-6.2>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DcqlCredentialSetQuery {
    /// REQUIRED. Describes the purpose of the set to the holder. Opaque to the engine.
    purpose: Json,
    /// OPTIONAL. Defaults to `true` per OID4VP v1.0 §6.2 if not present.
    required: bool,
    /// REQUIRED. Alternative sets of Credential Queries, in order of preference.
    options: NonEmptyVec<DcqlCredentialSetOption>,
}

impl DcqlCredentialSetQuery {
    pub fn new(purpose: Json, options: NonEmptyVec<DcqlCredentialSetOption>) -> Self {
        Self {
            purpose,
            required: true,
            options,
        }
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn purpose(&self) -> &Json {
        &self.purpose
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn options(&self) -> &NonEmptyVec<DcqlCredentialSetOption> {
        &self.options
    }
}

/// One option of a Credential Set Query: every listed Credential Query must
/// be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DcqlCredentialSetOption(NonEmptyVec<DcqlCredentialQueryId>);

impl DcqlCredentialSetOption {
    pub fn new(credential_ids: NonEmptyVec<DcqlCredentialQueryId>) -> Self {
        Self(credential_ids)
    }

    pub fn credential_ids(&self) -> &[DcqlCredentialQueryId] {
        &self.0
    }

    /// Whether each listed Credential Query has at least one match in `responses`.
    pub fn is_satisfied(&self, responses: &[CredentialResponse<'_>]) -> bool {
        self.credential_ids().iter().all(|id| {
            responses.iter().any(|response| {
                response.credential_query().id() == id && !response.matches().is_empty()
            })
        })
    }
}
