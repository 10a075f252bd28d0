use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use super::{
    claim::{DcqlClaim, DcqlClaimId},
    DcqlError,
};
use crate::{
    core::{
        credential::{Credential, CredentialClaims},
        credential_format::ClaimFormatDesignation,
    },
    utils::NonEmptyVec,
};

pub type DcqlCredentialQueryId = String;

/// A Credential Query object
/// See: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-6.1>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DcqlCredentialQuery {
    /// REQUIRED. A string identifying the Credential in the response.
    /// The value MUST be unique within a DCQL query.
    id: DcqlCredentialQueryId,

    /// REQUIRED. The requested format of the Credential.
    format: ClaimFormatDesignation,

    /// REQUIRED. Format specific constraints on the Credential's metadata.
    meta: DcqlCredentialMeta,

    /// The claims requested from the Credential.
    claims: NonEmptyVec<DcqlClaim>,

    /// OPTIONAL. Alternative combinations of claims, tried in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    claim_sets: Vec<DcqlClaimSet>,

    /// OPTIONAL. Expected trust frameworks of the Credential's issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    trusted_authorities: Option<NonEmptyVec<TrustedAuthoritiesQuery>>,

    /// OPTIONAL. Defaults to `true` if not present.
    #[serde(skip_serializing_if = "Option::is_none")]
    require_cryptographic_holder_binding: Option<bool>,

    /// OPTIONAL. Defaults to `false` if not present.
    #[serde(skip_serializing_if = "Option::is_none")]
    multiple: Option<bool>,

    #[serde(skip)]
    claims_by_id: HashMap<DcqlClaimId, usize>,
}

impl DcqlCredentialQuery {
    /// Creates a Credential Query, indexing its claims by identifier.
    ///
    /// # Errors
    /// Returns [`DcqlError::MalformedRequest`] if `meta` does not belong to
    /// `format` or if two claims share an identifier.
    pub fn new(
        id: impl Into<DcqlCredentialQueryId>,
        format: ClaimFormatDesignation,
        meta: DcqlCredentialMeta,
        claims: NonEmptyVec<DcqlClaim>,
        claim_sets: Vec<DcqlClaimSet>,
    ) -> Result<Self, DcqlError> {
        let id = id.into();
        if !meta.is_for(&format) {
            return Err(DcqlError::malformed(format!(
                "credential query `{id}` has `meta` that does not apply to format `{format}`"
            )));
        }

        let mut claims_by_id = HashMap::new();
        for (index, claim) in claims.iter().enumerate() {
            let Some(claim_id) = claim.id() else {
                continue;
            };
            if claims_by_id.insert(claim_id.to_owned(), index).is_some() {
                return Err(DcqlError::malformed(format!(
                    "credential query `{id}` has more than one claim with id `{claim_id}`"
                )));
            }
        }

        Ok(Self {
            id,
            format,
            meta,
            claims,
            claim_sets,
            trusted_authorities: None,
            require_cryptographic_holder_binding: None,
            multiple: None,
            claims_by_id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn format(&self) -> &ClaimFormatDesignation {
        &self.format
    }

    pub fn meta(&self) -> &DcqlCredentialMeta {
        &self.meta
    }

    pub fn claims(&self) -> &NonEmptyVec<DcqlClaim> {
        &self.claims
    }

    pub fn claim_sets(&self) -> &[DcqlClaimSet] {
        &self.claim_sets
    }

    /// Looks up a claim by its identifier.
    pub fn claim(&self, id: &str) -> Option<&DcqlClaim> {
        self.claims_by_id.get(id).map(|&index| &self.claims[index])
    }

    pub fn trusted_authorities(&self) -> Option<&NonEmptyVec<TrustedAuthoritiesQuery>> {
        self.trusted_authorities.as_ref()
    }

    pub fn set_trusted_authorities(
        &mut self,
        trusted_authorities: Option<NonEmptyVec<TrustedAuthoritiesQuery>>,
    ) {
        self.trusted_authorities = trusted_authorities;
    }

    /// Returns `true` if cryptographic holder binding is required.
    /// Defaults to `true` per Section 6.1 if not explicitly set.
    pub fn require_cryptographic_holder_binding(&self) -> bool {
        self.require_cryptographic_holder_binding.unwrap_or(true)
    }

    pub fn set_require_cryptographic_holder_binding(
        &mut self,
        require_cryptographic_holder_binding: Option<bool>,
    ) {
        self.require_cryptographic_holder_binding = require_cryptographic_holder_binding;
    }

    /// Returns `true` if multiple Credentials may be returned for this query.
    /// Defaults to `false` per Section 6.1 if not explicitly set.
    pub fn multiple(&self) -> bool {
        self.multiple.unwrap_or(false)
    }

    pub fn set_multiple(&mut self, multiple: Option<bool>) {
        self.multiple = multiple;
    }
}

/// The `meta` constraint of a Credential Query, by format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DcqlCredentialMeta {
    /// `mso_mdoc`: the exact doctype of the mdoc.
    MsoMdoc { doctype_value: String },
    /// `dc+sd-jwt`: the accepted `vct` values.
    SdJwtVc { vct_values: NonEmptyVec<String> },
    /// Metadata of a format that cannot be matched.
    Other(Map<String, Json>),
}

impl DcqlCredentialMeta {
    /// Whether this constraint has the shape `format` defines.
    pub fn is_for(&self, format: &ClaimFormatDesignation) -> bool {
        matches!(
            (self, format),
            (Self::MsoMdoc { .. }, ClaimFormatDesignation::MsoMDoc)
                | (Self::SdJwtVc { .. }, ClaimFormatDesignation::DcSdJwt)
                | (Self::Other(_), ClaimFormatDesignation::Other(_))
        )
    }

    /// Whether `credential` has the format and type this constraint asks for.
    pub fn accepts(&self, credential: &Credential) -> bool {
        match (self, credential.claims()) {
            (Self::MsoMdoc { doctype_value }, CredentialClaims::MsoMdoc(mdoc)) => {
                mdoc.doc_type() == doctype_value
            }
            (Self::SdJwtVc { vct_values }, CredentialClaims::SdJwtVc(vc)) => {
                vct_values.iter().any(|vct| vct == vc.vct())
            }
            (Self::MsoMdoc { .. }, CredentialClaims::SdJwtVc(_))
            | (Self::SdJwtVc { .. }, CredentialClaims::MsoMdoc(_))
            | (Self::Other(_), _) => false,
        }
    }
}

/// One alternative combination of claim identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DcqlClaimSet(NonEmptyVec<DcqlClaimId>);

impl DcqlClaimSet {
    pub fn new(claim_ids: NonEmptyVec<DcqlClaimId>) -> Self {
        Self(claim_ids)
    }

    pub fn claim_ids(&self) -> &[DcqlClaimId] {
        &self.0
    }
}

/// A Trusted Authorities Query object
/// See: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-6.1.1>
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TrustedAuthoritiesQuery {
    /// REQUIRED. The type of trust framework.
    #[serde(rename = "type")]
    authority_type: TrustedAuthorityType,

    /// REQUIRED. Trust framework specific identification data.
    values: NonEmptyVec<String>,
}

impl TrustedAuthoritiesQuery {
    pub fn new(authority_type: TrustedAuthorityType, values: NonEmptyVec<String>) -> Self {
        Self {
            authority_type,
            values,
        }
    }

    pub fn authority_type(&self) -> &TrustedAuthorityType {
        &self.authority_type
    }

    pub fn values(&self) -> &NonEmptyVec<String> {
        &self.values
    }
}

/// Trusted Authority types
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrustedAuthorityType {
    /// Authority Key Identifier of an X.509 certificate, base64url encoded.
    Aki,
    /// ETSI Trusted List identifier.
    EtsiTl,
    /// OpenID Federation Entity Identifier of a Trust Anchor.
    OpenidFederation,
    #[serde(untagged)]
    Other(String),
}
