//! Digital Credentials Query Language.
//!
//! A [`DcqlQuery`] is built from the verifier's request and then executed
//! against the holder's [`CredentialStore`], producing one
//! [`CredentialResponse`] per selected Credential Query.
//!
//! See: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-6>

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::{debug, trace, warn};

use crate::{config::Config, utils::NonEmptyVec, wallet::CredentialStore};

mod claim;
mod credential_query;
mod credential_set;
mod error;
mod matcher;
mod path;
mod request;
mod response;
mod selection;

pub use claim::{DcqlClaim, DcqlClaimId};
pub use credential_query::{
    DcqlClaimSet, DcqlCredentialMeta, DcqlCredentialQuery, DcqlCredentialQueryId,
    TrustedAuthoritiesQuery, TrustedAuthorityType,
};
pub use credential_set::{DcqlCredentialSetOption, DcqlCredentialSetQuery};
pub use error::DcqlError;
pub use matcher::{filter_value, match_credential, resolve_claim};
pub use path::{resolve_json, resolve_mdoc, ClaimsPathPointer, PathElement, PathError};
pub use response::{CredentialResponse, CredentialResponseMatch};

use request::DcqlQueryRequest;

/// A DCQL query.
///
/// Deserializing a query validates it with the default [`Config`], use
/// [`DcqlQuery::from_json_with_config`] to pick other options.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "DcqlQueryRequest")]
pub struct DcqlQuery {
    credentials: NonEmptyVec<DcqlCredentialQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    credential_sets: Vec<DcqlCredentialSetQuery>,
}

impl DcqlQuery {
    /// # Errors
    /// Returns [`DcqlError::MalformedRequest`] if two Credential Queries share an identifier.
    pub fn new(
        credentials: NonEmptyVec<DcqlCredentialQuery>,
        credential_sets: Vec<DcqlCredentialSetQuery>,
    ) -> Result<Self, DcqlError> {
        for (i, query) in credentials.iter().enumerate() {
            if credentials[..i].iter().any(|other| other.id() == query.id()) {
                return Err(DcqlError::malformed(format!(
                    "more than one credential query with id `{}`",
                    query.id()
                )));
            }
        }

        Ok(Self {
            credentials,
            credential_sets,
        })
    }

    /// Builds a query from the verifier's request with the default [`Config`].
    pub fn from_json(value: Json) -> Result<Self, DcqlError> {
        Self::from_json_with_config(value, &Config::default())
    }

    pub fn from_json_with_config(value: Json, config: &Config) -> Result<Self, DcqlError> {
        DcqlQueryRequest::from_json(value)?.into_query(config)
    }

    pub fn credentials(&self) -> &[DcqlCredentialQuery] {
        &self.credentials
    }

    pub fn credential_sets(&self) -> &[DcqlCredentialSetQuery] {
        &self.credential_sets
    }

    pub fn credential_query(&self, id: &str) -> Option<&DcqlCredentialQuery> {
        self.credentials.iter().find(|query| query.id() == id)
    }

    /// Evaluates every Credential Query against `store`, in order, and
    /// selects the responses according to the Credential Set Queries.
    ///
    /// # Errors
    /// - [`DcqlError::NoMatchForQuery`] if no Credential Set Queries are
    ///   present and a Credential Query has no match.
    /// - [`DcqlError::UnsatisfiedRequiredSet`] if a required Credential Set
    ///   Query has no satisfied option.
    /// - [`DcqlError::Store`] if the store fails.
    pub async fn execute<S>(&self, store: &S) -> Result<Vec<CredentialResponse<'_>>, DcqlError>
    where
        S: CredentialStore + ?Sized,
    {
        let mut responses = Vec::with_capacity(self.credentials.len());
        for credential_query in self.credentials.iter() {
            let response = evaluate(credential_query, store).await?;
            debug!(
                credential_query = credential_query.id(),
                matches = response.matches().len(),
                "evaluated credential query"
            );
            responses.push(response);
        }

        selection::select(responses, &self.credential_sets)
    }
}

impl TryFrom<Json> for DcqlQuery {
    type Error = DcqlError;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

/// Collects every stored credential of the requested type whose claims
/// satisfy `query`.
async fn evaluate<'q, S>(
    query: &'q DcqlCredentialQuery,
    store: &S,
) -> Result<CredentialResponse<'q>, DcqlError>
where
    S: CredentialStore + ?Sized,
{
    if !query.format().is_supported() {
        warn!(
            credential_query = query.id(),
            format = %query.format(),
            "unsupported credential format, no credential can match"
        );
        return Ok(CredentialResponse::new(query, vec![]));
    }

    let mut matches = vec![];
    for id in store.list_credentials().await? {
        let Some(credential) = store.lookup_credential(&id).await? else {
            trace!(credential = id.as_str(), "credential disappeared from the store");
            continue;
        };
        if !query.meta().accepts(&credential) {
            continue;
        }
        match match_credential(query, &credential) {
            Some(claim_values) => {
                matches.push(CredentialResponseMatch::new(credential, claim_values))
            }
            None => trace!(
                credential_query = query.id(),
                credential = credential.id(),
                "credential does not satisfy the requested claims"
            ),
        }
    }

    Ok(CredentialResponse::new(query, matches))
}
