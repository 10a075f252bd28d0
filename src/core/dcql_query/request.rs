//! Wire form of a DCQL query and its conversion into the validated model.

use serde::Deserialize;
use serde_json::{Map, Value as Json};
use tracing::warn;

use super::{
    claim::DcqlClaim,
    credential_query::{
        DcqlClaimSet, DcqlCredentialMeta, DcqlCredentialQuery, TrustedAuthoritiesQuery,
    },
    credential_set::{DcqlCredentialSetOption, DcqlCredentialSetQuery},
    path::ClaimsPathPointer,
    DcqlError, DcqlQuery,
};
use crate::{config::Config, core::credential_format::ClaimFormatDesignation, utils::NonEmptyVec};

#[derive(Debug, Deserialize)]
pub(crate) struct DcqlQueryRequest {
    credentials: Option<Vec<CredentialQueryRequest>>,
    credential_sets: Option<Vec<CredentialSetQueryRequest>>,
}

#[derive(Debug, Deserialize)]
struct CredentialQueryRequest {
    id: String,
    format: String,
    meta: Option<Map<String, Json>>,
    claims: Option<Vec<ClaimRequest>>,
    claim_sets: Option<Vec<Vec<String>>>,
    trusted_authorities: Option<Vec<TrustedAuthoritiesQuery>>,
    require_cryptographic_holder_binding: Option<bool>,
    multiple: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ClaimRequest {
    id: Option<String>,
    path: ClaimsPathPointer,
    values: Option<Vec<Json>>,
    intent_to_retain: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CredentialSetQueryRequest {
    purpose: Json,
    required: Option<bool>,
    options: Vec<Vec<String>>,
}

impl DcqlQueryRequest {
    pub(crate) fn from_json(value: Json) -> Result<Self, DcqlError> {
        serde_json::from_value(value).map_err(|e| DcqlError::malformed(e.to_string()))
    }

    pub(crate) fn into_query(self, config: &Config) -> Result<DcqlQuery, DcqlError> {
        let credentials = self.credentials.unwrap_or_default();
        if credentials.is_empty() {
            return Err(DcqlError::malformed("`credentials` must be a non-empty array"));
        }

        let credentials = credentials
            .into_iter()
            .map(|query| query.into_credential_query(config))
            .collect::<Result<Vec<_>, _>>()?;

        let credential_sets = self
            .credential_sets
            .unwrap_or_default()
            .into_iter()
            .map(CredentialSetQueryRequest::into_credential_set_query)
            .collect::<Result<Vec<_>, _>>()?;

        DcqlQuery::new(non_empty(credentials, "credentials")?, credential_sets)
    }
}

impl TryFrom<DcqlQueryRequest> for DcqlQuery {
    type Error = DcqlError;

    fn try_from(request: DcqlQueryRequest) -> Result<Self, Self::Error> {
        request.into_query(&Config::default())
    }
}

impl CredentialQueryRequest {
    fn into_credential_query(self, config: &Config) -> Result<DcqlCredentialQuery, DcqlError> {
        let id = self.id;
        let format = if config.accept_legacy_sd_jwt_format {
            ClaimFormatDesignation::from_name_lenient(&self.format)
        } else {
            ClaimFormatDesignation::from(self.format)
        };

        let meta = self
            .meta
            .ok_or_else(|| DcqlError::malformed(format!("credential query `{id}` has no `meta`")))?;
        let meta = parse_meta(&id, &format, meta)?;

        let claims = self.claims.unwrap_or_default();
        if claims.is_empty() {
            return Err(DcqlError::malformed(format!(
                "credential query `{id}` must have a non-empty `claims` array"
            )));
        }
        let claims = claims
            .into_iter()
            .map(|claim| claim.into_claim(&id, &format))
            .collect::<Result<Vec<_>, _>>()?;

        let claim_sets = self
            .claim_sets
            .unwrap_or_default()
            .into_iter()
            .map(|claim_ids| {
                NonEmptyVec::maybe_new(claim_ids)
                    .map(DcqlClaimSet::new)
                    .ok_or_else(|| {
                        DcqlError::malformed(format!(
                            "credential query `{id}` has an empty claim set"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let trusted_authorities = match self.trusted_authorities {
            Some(authorities) => Some(non_empty(authorities, "trusted_authorities")?),
            None => None,
        };

        let mut query = DcqlCredentialQuery::new(
            id,
            format,
            meta,
            non_empty(claims, "claims")?,
            claim_sets,
        )?;
        query.set_trusted_authorities(trusted_authorities);
        query.set_require_cryptographic_holder_binding(self.require_cryptographic_holder_binding);
        query.set_multiple(self.multiple);
        Ok(query)
    }
}

fn parse_meta(
    id: &str,
    format: &ClaimFormatDesignation,
    mut meta: Map<String, Json>,
) -> Result<DcqlCredentialMeta, DcqlError> {
    match format {
        ClaimFormatDesignation::MsoMDoc => match meta.remove("doctype_value") {
            Some(Json::String(doctype_value)) => Ok(DcqlCredentialMeta::MsoMdoc { doctype_value }),
            _ => Err(DcqlError::malformed(format!(
                "credential query `{id}` must have a string `meta.doctype_value`"
            ))),
        },
        ClaimFormatDesignation::DcSdJwt => {
            let vct_values = match meta.remove("vct_values") {
                Some(Json::Array(values)) => values
                    .into_iter()
                    .map(|value| match value {
                        Json::String(vct) => Some(vct),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                    .and_then(NonEmptyVec::maybe_new),
                _ => None,
            };
            vct_values
                .map(|vct_values| DcqlCredentialMeta::SdJwtVc { vct_values })
                .ok_or_else(|| {
                    DcqlError::malformed(format!(
                        "credential query `{id}` must have a non-empty string array \
                         `meta.vct_values`"
                    ))
                })
        }
        ClaimFormatDesignation::Other(name) => {
            warn!(credential_query = id, format = name.as_str(), "unsupported credential format");
            Ok(DcqlCredentialMeta::Other(meta))
        }
    }
}

impl ClaimRequest {
    fn into_claim(
        self,
        query_id: &str,
        format: &ClaimFormatDesignation,
    ) -> Result<DcqlClaim, DcqlError> {
        let mut claim = DcqlClaim::new(self.path);
        if let Some(id) = self.id {
            claim = claim.set_id(id);
        }
        if let Some(values) = self.values {
            claim = claim.set_values(NonEmptyVec::maybe_new(values).ok_or_else(|| {
                DcqlError::malformed(format!(
                    "credential query `{query_id}` has a claim with empty `values`"
                ))
            })?);
        }
        match (self.intent_to_retain, format) {
            (Some(intent_to_retain), ClaimFormatDesignation::MsoMDoc) => {
                claim = claim.set_intent_to_retain(intent_to_retain);
            }
            (Some(_), _) => {
                warn!(
                    credential_query = query_id,
                    path = %claim.path(),
                    "ignoring `intent_to_retain` outside of mso_mdoc"
                );
            }
            (None, _) => {}
        }
        Ok(claim)
    }
}

impl CredentialSetQueryRequest {
    fn into_credential_set_query(self) -> Result<DcqlCredentialSetQuery, DcqlError> {
        let options = self
            .options
            .into_iter()
            .map(|ids| {
                NonEmptyVec::maybe_new(ids)
                    .map(DcqlCredentialSetOption::new)
                    .ok_or_else(|| DcqlError::malformed("credential set option must not be empty"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(
            DcqlCredentialSetQuery::new(self.purpose, non_empty(options, "options")?)
                .set_required(self.required.unwrap_or(true)),
        )
    }
}

fn non_empty<T: Clone>(items: Vec<T>, field: &str) -> Result<NonEmptyVec<T>, DcqlError> {
    NonEmptyVec::maybe_new(items)
        .ok_or_else(|| DcqlError::malformed(format!("`{field}` must not be empty")))
}
